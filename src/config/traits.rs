use anyhow::Result;

/// A configuration section loaded from TOML.
pub(crate) trait ConfigEntity {
    /// Fill in derived values and normalize what the user wrote.
    fn finalize(&mut self) -> Result<()>;
    /// Reject values the server cannot start with. Runs after `finalize`.
    fn validate(&self) -> Result<()>;
}
