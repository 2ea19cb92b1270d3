use crate::granularity::QueryProfile;
use crate::model::traffic::TrafficReport;
use crate::model::vnstat::{CollectorUnit, VnstatData};
use crate::traffic::{self, TrafficError};
use crate::validation::{Payload, ValidationErrors};
use anyhow::{Context, Result, bail};
use cached::proc_macro::cached;
use log::{debug, warn};
use std::ffi::OsString;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

static EXECUTABLE: OnceLock<OsString> = OnceLock::new();

pub fn set_vnstat_executable(executable: impl AsRef<std::ffi::OsStr>) -> Result<()> {
    EXECUTABLE
        .set(executable.as_ref().to_os_string())
        .map_err(|_| anyhow::anyhow!("vnStat executable already set"))
}

fn get_vnstat_executable() -> Result<&'static OsString> {
    EXECUTABLE
        .get()
        .context("vnStat executable not set (call set_vnstat_executable first)")
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("failed to get vnStat data: {0:#}")]
    Collector(anyhow::Error),

    #[error(transparent)]
    Data(#[from] TrafficError),
}

#[cached(size = 3, time = 60, time_refresh = true, result = true)]
pub async fn fetch_vnstat_data(unit: CollectorUnit) -> Result<VnstatData> {
    let executable = get_vnstat_executable()?;
    debug!("Running {:?} --json {}", executable, unit.mode());

    let output = tokio::process::Command::new(executable)
        .arg("--json")
        .arg(unit.mode())
        .output()
        .await
        .context("failed to execute vnStat")?;

    if !output.status.success() {
        bail!(
            "vnStat exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    parse_vnstat_output(&output.stdout)
}

fn parse_vnstat_output(stdout: &[u8]) -> Result<VnstatData> {
    let json_str =
        std::str::from_utf8(stdout).context("failed to parse vnStat response as UTF-8")?;

    serde_json::from_str(json_str).context("failed to deserialize vnStat JSON response")
}

/// Validate the payload, then bucket the matching vnstat series.
///
/// vnStat is only invoked once the payload passed validation.
pub async fn query_traffic(
    profile: &QueryProfile,
    payload: &Payload,
) -> Result<TrafficReport, QueryError> {
    if let Err(errors) = profile.constraints.validate(payload) {
        debug!(
            "{} query rejected on {:?}: {}",
            profile.granularity,
            errors.fields().collect::<Vec<_>>(),
            errors
        );
        return Err(QueryError::Validation(errors));
    }

    let unit = profile.granularity.collector_unit();
    let data = fetch_vnstat_data(unit).await.map_err(|e| {
        warn!("Failed to fetch vnStat {} data: {:#}", unit, e);
        QueryError::Collector(e)
    })?;

    Ok(traffic::build_report(profile, payload, &data)?)
}
