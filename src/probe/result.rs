//! Probe status and result value types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Health status of a single probe or of an aggregated report.
///
/// Ordered by severity: `Healthy < Degraded < Unhealthy`. Aggregation takes
/// the maximum severity over all executed probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Dependency is fully operational.
    Healthy,
    /// Dependency is impaired but the service can still operate.
    Degraded,
    /// Dependency is down.
    Unhealthy,
}

impl Status {
    /// Wire form of the status, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Healthy => "healthy",
            Status::Degraded => "degraded",
            Status::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single probe execution. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// Status reported by the probe.
    pub status: Status,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional structured payload (e.g. the observed HTTP status code).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl ProbeResult {
    /// Create a result with the given status and no detail.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            description: None,
            data: BTreeMap::new(),
        }
    }

    /// Create a healthy result.
    pub fn healthy() -> Self {
        Self::new(Status::Healthy)
    }

    /// Create a degraded result with a description.
    pub fn degraded(description: impl Into<String>) -> Self {
        Self::new(Status::Degraded).with_description(description)
    }

    /// Create an unhealthy result with a description.
    pub fn unhealthy(description: impl Into<String>) -> Self {
        Self::new(Status::Unhealthy).with_description(description)
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a structured data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}
