//! Probe manifest configuration.
//!
//! Probe registrations are structured, so they come from a JSON manifest
//! (`PROBES_FILE`) rather than individual environment variables:
//!
//! ```json
//! [
//!   {"name": "export-dir", "tags": ["server"], "kind": {"type": "dir", "path": "/srv/export"}},
//!   {"name": "webnet", "tags": ["url"], "failure_status": "degraded",
//!    "timeout": "5s", "kind": {"type": "url", "url": "https://webnet.fr/"}}
//! ]
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::parse::parse_duration;
use super::ConfigError;
use crate::probe::{
    EvenSecondProbe, JobProbe, PathProbe, Probe, ProbeDescriptor, ProbeRegistry, Status, UrlProbe,
};

/// One entry of the probe manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSpec {
    /// Unique probe name.
    pub name: String,
    /// Tags for sub-endpoint selection.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Status reported when the probe faults or times out.
    #[serde(default = "default_failure_status")]
    pub failure_status: Status,
    /// Duration string, e.g. "5s". Defaults to the registry default.
    #[serde(default)]
    pub timeout: Option<String>,
    /// Probe-specific parameters.
    pub kind: ProbeKind,
}

fn default_failure_status() -> Status {
    Status::Unhealthy
}

/// Probe variant and its parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeKind {
    /// A regular file must exist.
    File { path: String },
    /// A directory must exist.
    Dir { path: String },
    /// A URL must answer an HTTP GET.
    Url { url: String },
    /// A systemd unit must be present, enabled and not failed.
    /// `host` is systemd's `user@machine` transport, held opaquely.
    Job {
        unit: String,
        #[serde(default)]
        host: Option<String>,
    },
    /// Synthetic clock-parity probe.
    EvenSecond,
}

/// Read and parse the probe manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<ProbeSpec>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
        path: path.display().to_string(),
        error,
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Invalid {
        key: "PROBES_FILE".into(),
        message: e.to_string(),
    })
}

/// Fallback registration used when no manifest is configured: a single
/// synthetic probe, so the endpoint is demonstrable out of the box.
pub fn default_specs() -> Vec<ProbeSpec> {
    vec![ProbeSpec {
        name: "even_second".to_string(),
        tags: Vec::new(),
        failure_status: Status::Unhealthy,
        timeout: None,
        kind: ProbeKind::EvenSecond,
    }]
}

/// Build the registry from manifest entries.
///
/// Duplicate names, malformed URLs and malformed timeouts are fatal here,
/// before the listener ever binds.
pub fn build_registry(specs: &[ProbeSpec]) -> Result<ProbeRegistry, ConfigError> {
    let mut registry = ProbeRegistry::new();
    let mut client = None;

    for spec in specs {
        let mut descriptor = ProbeDescriptor::new(&spec.name)
            .with_tags(spec.tags.iter().cloned())
            .with_failure_status(spec.failure_status);

        if let Some(raw) = &spec.timeout {
            let key = format!("probes[{}].timeout", spec.name);
            let timeout = parse_duration(raw)
                .map_err(|message| ConfigError::Invalid {
                    key: key.clone(),
                    message,
                })?
                .ok_or_else(|| ConfigError::Invalid {
                    key,
                    message: "probe timeout cannot be disabled".into(),
                })?;
            descriptor = descriptor.with_timeout(timeout);
        }

        let probe: Arc<dyn Probe> = match &spec.kind {
            ProbeKind::File { path } => Arc::new(PathProbe::file(path)),
            ProbeKind::Dir { path } => Arc::new(PathProbe::directory(path)),
            ProbeKind::Url { url } => {
                let url = url
                    .parse::<reqwest::Url>()
                    .map_err(|e| ConfigError::Invalid {
                        key: format!("probes[{}].url", spec.name),
                        message: e.to_string(),
                    })?;
                Arc::new(UrlProbe::new(http_client(&mut client)?, url))
            }
            ProbeKind::Job { unit, host } => {
                let mut probe = JobProbe::new(unit);
                if let Some(host) = host {
                    probe = probe.with_host(host);
                }
                Arc::new(probe)
            }
            ProbeKind::EvenSecond => Arc::new(EvenSecondProbe),
        };

        registry
            .register(descriptor, probe)
            .map_err(|e| ConfigError::Invalid {
                key: "probes".into(),
                message: e.to_string(),
            })?;
    }

    Ok(registry)
}

/// Build the shared HTTP client on first use; URL probes all reuse it.
fn http_client(slot: &mut Option<reqwest::Client>) -> Result<reqwest::Client, ConfigError> {
    if let Some(client) = slot {
        return Ok(client.clone());
    }
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| ConfigError::Invalid {
            key: "probes".into(),
            message: format!("failed to build HTTP client: {}", e),
        })?;
    *slot = Some(client.clone());
    Ok(client)
}
