//! Scheduled job status probe backed by systemd.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{Probe, ProbeError, ProbeResult};

/// Properties queried from `systemctl show`.
const SHOW_PROPERTIES: &str = "LoadState,UnitFileState,ActiveState,Result,ExecMainExitTimestamp";

/// Probes the state of a systemd unit, typically a timer-driven service.
///
/// State mapping: unit not found is unhealthy; a disabled or masked unit and
/// a failed last run are degraded; everything else is healthy. The last-run
/// timestamp is embedded in the message.
pub struct JobProbe {
    unit: String,
    host: Option<String>,
}

impl JobProbe {
    /// Create a probe for the given unit on the local machine.
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            host: None,
        }
    }

    /// Query a remote machine via systemd's `--host user@machine` transport.
    ///
    /// The value is an opaque credential: it is handed to `systemctl`
    /// verbatim and never logged or echoed into probe output.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

#[async_trait]
impl Probe for JobProbe {
    async fn execute(&self, _budget: Duration) -> Result<ProbeResult, ProbeError> {
        let mut command = Command::new("systemctl");
        command
            .arg("show")
            .arg(&self.unit)
            .arg("--property")
            .arg(SHOW_PROPERTIES)
            .arg("--no-pager");
        if let Some(host) = &self.host {
            command.arg("--host").arg(host);
        }
        // Reap the child if the aggregator's deadline cancels this task.
        command.kill_on_drop(true);

        let output = command.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Exec(format!(
                "systemctl exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(evaluate(&parse_show_output(&stdout)))
    }
}

/// Parse `Key=Value` lines from `systemctl show` output.
fn parse_show_output(output: &str) -> HashMap<&str, &str> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .collect()
}

/// Apply the state ladder to the queried unit properties.
fn evaluate(properties: &HashMap<&str, &str>) -> ProbeResult {
    let last_run = properties
        .get("ExecMainExitTimestamp")
        .copied()
        .filter(|ts| !ts.is_empty() && *ts != "n/a")
        .unwrap_or("never");

    if properties.get("LoadState").copied() == Some("not-found") {
        return ProbeResult::unhealthy("unit not found");
    }

    if matches!(
        properties.get("UnitFileState").copied(),
        Some("disabled") | Some("masked")
    ) {
        return ProbeResult::degraded(format!("unit is disabled, last run {}", last_run));
    }

    let last_run_failed = properties
        .get("Result")
        .map(|r| !r.is_empty() && *r != "success")
        .unwrap_or(false)
        || properties.get("ActiveState").copied() == Some("failed");

    if last_run_failed {
        ProbeResult::degraded(format!("last run failed at {}", last_run))
    } else {
        ProbeResult::healthy().with_description(format!("last run succeeded at {}", last_run))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Status;

    fn props(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_parse_show_output() {
        let parsed = parse_show_output(
            "LoadState=loaded\nUnitFileState=enabled\nResult=success\nExecMainExitTimestamp=Mon 2026-08-03 04:12:11 UTC\n",
        );
        assert_eq!(parsed.get("LoadState").copied(), Some("loaded"));
        assert_eq!(
            parsed.get("ExecMainExitTimestamp").copied(),
            Some("Mon 2026-08-03 04:12:11 UTC")
        );
    }

    #[test]
    fn test_unknown_unit_is_unhealthy() {
        let result = evaluate(&props(&[("LoadState", "not-found")]));
        assert_eq!(result.status, Status::Unhealthy);
        assert_eq!(result.description.as_deref(), Some("unit not found"));
    }

    #[test]
    fn test_disabled_unit_is_degraded() {
        let result = evaluate(&props(&[
            ("LoadState", "loaded"),
            ("UnitFileState", "disabled"),
            ("Result", "success"),
            ("ExecMainExitTimestamp", "Mon 2026-08-03 04:12:11 UTC"),
        ]));
        assert_eq!(result.status, Status::Degraded);
        assert_eq!(
            result.description.as_deref(),
            Some("unit is disabled, last run Mon 2026-08-03 04:12:11 UTC")
        );
    }

    #[test]
    fn test_failed_last_run_is_degraded() {
        let result = evaluate(&props(&[
            ("LoadState", "loaded"),
            ("UnitFileState", "enabled"),
            ("Result", "exit-code"),
            ("ExecMainExitTimestamp", "Mon 2026-08-03 04:12:11 UTC"),
        ]));
        assert_eq!(result.status, Status::Degraded);
        assert_eq!(
            result.description.as_deref(),
            Some("last run failed at Mon 2026-08-03 04:12:11 UTC")
        );
    }

    #[test]
    fn test_healthy_unit_reports_last_run() {
        let result = evaluate(&props(&[
            ("LoadState", "loaded"),
            ("UnitFileState", "enabled"),
            ("ActiveState", "inactive"),
            ("Result", "success"),
            ("ExecMainExitTimestamp", "Mon 2026-08-03 04:12:11 UTC"),
        ]));
        assert_eq!(result.status, Status::Healthy);
        assert_eq!(
            result.description.as_deref(),
            Some("last run succeeded at Mon 2026-08-03 04:12:11 UTC")
        );
    }

    #[test]
    fn test_never_run_unit_is_healthy() {
        let result = evaluate(&props(&[
            ("LoadState", "loaded"),
            ("UnitFileState", "enabled"),
            ("Result", ""),
            ("ExecMainExitTimestamp", ""),
        ]));
        assert_eq!(result.status, Status::Healthy);
        assert_eq!(
            result.description.as_deref(),
            Some("last run succeeded at never")
        );
    }
}
