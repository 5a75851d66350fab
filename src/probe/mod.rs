//! Probe contract and built-in probes.
//!
//! A probe evaluates one dependency's health within a bounded time budget.
//! Probes are registered once at startup in a [`ProbeRegistry`] and executed
//! concurrently per request by the aggregator.
//!
//! Built-in probes:
//! - [`PathProbe`]: a file or directory exists
//! - [`UrlProbe`]: a remote URL answers an HTTP GET
//! - [`JobProbe`]: a scheduled systemd unit is present and its last run succeeded
//! - [`EvenSecondProbe`]: synthetic clock-parity probe for exercising the pipeline

mod file;
mod job;
mod registry;
mod result;
mod synthetic;
mod url;

pub use file::{PathKind, PathProbe};
pub use job::JobProbe;
pub use registry::{ProbeDescriptor, ProbeRegistry, RegistryError, DEFAULT_TIMEOUT};
pub use result::{ProbeResult, Status};
pub use synthetic::EvenSecondProbe;
pub use url::UrlProbe;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Fault raised by a probe while checking its dependency.
///
/// Faults never escape the aggregator: each one is converted into a result
/// carrying the probe's configured failure status.
#[derive(Debug)]
pub enum ProbeError {
    /// I/O error while inspecting the dependency.
    Io(std::io::Error),

    /// HTTP transport error from the URL probe.
    Http(reqwest::Error),

    /// External command failed or produced unusable output.
    Exec(String),

    /// Any other probe failure.
    Failed(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Io(e) => write!(f, "I/O error: {}", e),
            ProbeError::Http(e) => write!(f, "HTTP error: {}", e),
            ProbeError::Exec(msg) => write!(f, "execution error: {}", msg),
            ProbeError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Io(e) => Some(e),
            ProbeError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(e: std::io::Error) -> Self {
        ProbeError::Io(e)
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        ProbeError::Http(e)
    }
}

impl From<String> for ProbeError {
    fn from(msg: String) -> Self {
        ProbeError::Failed(msg)
    }
}

impl From<&str> for ProbeError {
    fn from(msg: &str) -> Self {
        ProbeError::Failed(msg.to_string())
    }
}

/// A unit of work evaluating one dependency's health.
///
/// `budget` is the probe's configured timeout. Implementations should pass it
/// on to any in-flight I/O they start so cancellation is cooperative, but the
/// aggregator enforces the deadline either way: a probe that ignores the
/// budget is cut off and reported with its failure status.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Evaluate the dependency and report its state.
    ///
    /// Expected failure states of the dependency (file missing, remote down)
    /// are `Ok` results with the appropriate [`Status`]; `Err` means the
    /// probe itself could not complete its check.
    async fn execute(&self, budget: Duration) -> Result<ProbeResult, ProbeError>;
}
