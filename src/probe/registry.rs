//! Named, tagged probe collection.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{Probe, Status};

/// Per-probe timeout applied when a registration does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Registration metadata for one probe.
#[derive(Debug, Clone)]
pub struct ProbeDescriptor {
    /// Unique name within the registry.
    pub name: String,
    /// Tags grouping probes for sub-endpoint selection.
    pub tags: Vec<String>,
    /// Status reported when the probe faults, panics or times out.
    pub failure_status: Status,
    /// Time budget for one execution.
    pub timeout: Duration,
}

impl ProbeDescriptor {
    /// Create a descriptor with default failure status (unhealthy) and timeout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            failure_status: Status::Unhealthy,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the status reported on fault or timeout.
    pub fn with_failure_status(mut self, status: Status) -> Self {
        self.failure_status = status;
        self
    }

    /// Set the execution time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check whether this probe carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Error raised during probe registration.
#[derive(Debug)]
pub enum RegistryError {
    /// A probe with this name is already registered.
    DuplicateName(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateName(name) => {
                write!(f, "duplicate probe name: {}", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Append-only collection of registered probes.
///
/// Populated once during startup, then shared via `Arc` and read by every
/// request without locking.
pub struct ProbeRegistry {
    probes: Vec<(ProbeDescriptor, Arc<dyn Probe>)>,
    names: HashSet<String>,
}

impl ProbeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            probes: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a probe under its descriptor.
    pub fn register(
        &mut self,
        descriptor: ProbeDescriptor,
        probe: Arc<dyn Probe>,
    ) -> Result<(), RegistryError> {
        if !self.names.insert(descriptor.name.clone()) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }
        self.probes.push((descriptor, probe));
        Ok(())
    }

    /// Number of registered probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Select probes matching a predicate, in registration order.
    pub fn select<F>(&self, predicate: F) -> Vec<(ProbeDescriptor, Arc<dyn Probe>)>
    where
        F: Fn(&ProbeDescriptor) -> bool,
    {
        self.probes
            .iter()
            .filter(|(descriptor, _)| predicate(descriptor))
            .map(|(descriptor, probe)| (descriptor.clone(), Arc::clone(probe)))
            .collect()
    }

    /// Select every registered probe.
    pub fn select_all(&self) -> Vec<(ProbeDescriptor, Arc<dyn Probe>)> {
        self.select(|_| true)
    }

    /// Select probes carrying the given tag.
    pub fn select_tagged(&self, tag: &str) -> Vec<(ProbeDescriptor, Arc<dyn Probe>)> {
        self.select(|descriptor| descriptor.has_tag(tag))
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
