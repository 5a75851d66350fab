//! Filesystem existence probes.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::{Probe, ProbeError, ProbeResult};

/// What a [`PathProbe`] expects to find at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// Probes for the existence of a file or directory.
///
/// The path is checked with a metadata lookup on each execution; absence
/// maps to unhealthy, any other I/O failure is a probe fault.
pub struct PathProbe {
    path: PathBuf,
    kind: PathKind,
}

impl PathProbe {
    /// Probe that expects a regular file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: PathKind::File,
        }
    }

    /// Probe that expects a directory at `path`.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: PathKind::Directory,
        }
    }

    fn missing_message(&self) -> &'static str {
        match self.kind {
            PathKind::File => "file is missing",
            PathKind::Directory => "directory is missing",
        }
    }

    fn wrong_kind_message(&self) -> &'static str {
        match self.kind {
            PathKind::File => "path exists but is not a file",
            PathKind::Directory => "path exists but is not a directory",
        }
    }
}

#[async_trait]
impl Probe for PathProbe {
    async fn execute(&self, _budget: Duration) -> Result<ProbeResult, ProbeError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => {
                let matches = match self.kind {
                    PathKind::File => metadata.is_file(),
                    PathKind::Directory => metadata.is_dir(),
                };
                if matches {
                    Ok(ProbeResult::healthy())
                } else {
                    Ok(ProbeResult::unhealthy(self.wrong_kind_message()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(ProbeResult::unhealthy(self.missing_message()))
            }
            Err(e) => Err(ProbeError::Io(e)),
        }
    }
}
