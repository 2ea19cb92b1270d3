use crate::config::server::ServerConfig;
use crate::config::traits::ConfigEntity;
use crate::config::vnstat::VnstatConfig;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

mod server;
mod traits;
mod vnstat;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub vnstat: VnstatConfig,
}

impl ConfigEntity for AppConfig {
    fn finalize(&mut self) -> Result<()> {
        self.server.finalize()?;
        self.vnstat.finalize()?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.vnstat.validate()?;

        Ok(())
    }
}

pub fn load_config(file_path: &str) -> Result<AppConfig> {
    // Check if the file exists.
    if !Path::new(file_path).exists() {
        bail!("File `{}` does not exist.", file_path);
    }

    // Read the file content into a string.
    let config_content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read `{}`", file_path))?;

    parse_config(&config_content)
}

pub fn parse_config(config_content: &str) -> Result<AppConfig> {
    // Parse the TOML content into an AppConfig object.
    let mut config: AppConfig = toml::from_str(config_content)?;

    // Finalize the configuration to ensure all values are initialized.
    config.finalize()?;

    // Validate the configuration to ensure all values are correct.
    config.validate()?;

    // Return the fully validated configuration.
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_executable() -> String {
        std::env::current_exe()
            .unwrap()
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn parses_full_config() {
        let content = format!(
            r#"
            [server]
            listen = "localhost"
            port = 8080
            path_prefix = "/api/vnstat/"

            [vnstat]
            executable = "{}"
            "#,
            existing_executable()
        );

        let config = parse_config(&content).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.path_prefix, "/api/vnstat");
        assert_eq!(config.vnstat.executable, existing_executable());
    }

    #[test]
    fn server_section_defaults() {
        let content = format!("[vnstat]\nexecutable = \"{}\"\n", existing_executable());

        let config = parse_config(&content).unwrap();
        assert_eq!(config.server.listen, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.path_prefix, "/vnstat");
    }

    #[test]
    fn rejects_missing_executable() {
        let err = parse_config("[vnstat]\nexecutable = \"/nonexistent/vnstat\"\n").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn rejects_invalid_listen_address() {
        let content = format!(
            "[server]\nlisten = \"nowhere\"\n[vnstat]\nexecutable = \"{}\"\n",
            existing_executable()
        );
        assert!(parse_config(&content).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_config("/nonexistent/config.toml").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
