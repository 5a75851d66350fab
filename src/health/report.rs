//! Aggregated health report.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::probe::{ProbeDescriptor, ProbeResult, Status};

/// Description used for probes cut off by a timeout.
pub(crate) const TIMED_OUT: &str = "timed out";

/// One probe's entry in a [`Report`].
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// Registered probe name.
    pub name: String,
    /// Status of this probe.
    pub status: Status,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Captured fault text when the probe itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Structured payload reported by the probe.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, serde_json::Value>,
    /// Execution time of this probe in milliseconds.
    pub duration_ms: u64,
}

impl ReportEntry {
    /// Entry for a probe that completed and returned a result.
    pub fn from_result(name: impl Into<String>, result: ProbeResult, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: result.status,
            description: result.description,
            error: None,
            data: result.data,
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Entry for a probe that faulted; reported at its configured failure status.
    pub fn fault(descriptor: &ProbeDescriptor, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: descriptor.name.clone(),
            status: descriptor.failure_status,
            description: None,
            error: Some(error.into()),
            data: BTreeMap::new(),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Entry for a probe that overran its budget or the overall deadline.
    pub fn timed_out(descriptor: &ProbeDescriptor, duration: Duration) -> Self {
        Self {
            name: descriptor.name.clone(),
            status: descriptor.failure_status,
            description: Some(TIMED_OUT.to_string()),
            error: None,
            data: BTreeMap::new(),
            duration_ms: duration.as_millis() as u64,
        }
    }
}

/// Aggregated outcome of running a probe selection for one request.
///
/// Built fresh per request, never cached: health must reflect "now".
#[derive(Debug, Serialize)]
pub struct Report {
    /// Maximum severity over all entries, healthy when empty.
    pub status: Status,
    /// Wall-clock time of the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Entries in selection order, independent of completion order.
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Assemble a report, computing the overall status from the entries.
    pub fn new(entries: Vec<ReportEntry>, total_duration: Duration) -> Self {
        let status = entries
            .iter()
            .map(|entry| entry.status)
            .max()
            .unwrap_or(Status::Healthy);
        Self {
            status,
            total_duration_ms: total_duration.as_millis() as u64,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, status: Status) -> ReportEntry {
        ReportEntry::from_result(name, ProbeResult::new(status), Duration::from_millis(5))
    }

    #[test]
    fn test_overall_is_max_severity() {
        let report = Report::new(
            vec![
                entry("a", Status::Healthy),
                entry("b", Status::Degraded),
                entry("c", Status::Healthy),
            ],
            Duration::from_millis(12),
        );
        assert_eq!(report.status, Status::Degraded);

        let report = Report::new(
            vec![entry("a", Status::Degraded), entry("b", Status::Unhealthy)],
            Duration::from_millis(12),
        );
        assert_eq!(report.status, Status::Unhealthy);
    }

    #[test]
    fn test_empty_report_is_healthy() {
        let report = Report::new(Vec::new(), Duration::ZERO);
        assert_eq!(report.status, Status::Healthy);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_fault_entry_uses_failure_status() {
        let descriptor = ProbeDescriptor::new("flaky").with_failure_status(Status::Degraded);
        let entry = ReportEntry::fault(&descriptor, "boom", Duration::from_millis(3));

        assert_eq!(entry.status, Status::Degraded);
        assert_eq!(entry.error.as_deref(), Some("boom"));
        assert!(entry.description.is_none());
    }

    #[test]
    fn test_timed_out_entry() {
        let descriptor = ProbeDescriptor::new("slow");
        let entry = ReportEntry::timed_out(&descriptor, Duration::from_millis(100));

        assert_eq!(entry.status, Status::Unhealthy);
        assert_eq!(entry.description.as_deref(), Some(TIMED_OUT));
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let report = Report::new(
            vec![entry("disk", Status::Healthy)],
            Duration::from_millis(7),
        );
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "healthy");
        assert_eq!(value["total_duration_ms"], 7);
        assert_eq!(value["entries"][0]["name"], "disk");
        assert_eq!(value["entries"][0]["duration_ms"], 5);
        // Optional fields are omitted entirely, not serialized as null.
        assert!(value["entries"][0].get("error").is_none());
        assert!(value["entries"][0].get("data").is_none());
    }
}
