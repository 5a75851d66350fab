//! Concurrent probe execution and report assembly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinError;
use tokio::time::error::Elapsed;
use tracing::{debug, warn};

use super::report::{Report, ReportEntry};
use crate::probe::{Probe, ProbeDescriptor, ProbeError, ProbeResult};

/// What a spawned probe task resolves to: the bounded execution outcome plus
/// the measured execution time.
type TaskOutcome = (Result<Result<ProbeResult, ProbeError>, Elapsed>, Duration);

/// Runs selections of probes concurrently and aggregates their results.
///
/// Each probe executes in its own task under its own timeout; one slow or
/// failing probe never blocks or fails the others. No fault, panic or
/// timeout propagates out of [`Aggregator::run`].
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    overall_timeout: Option<Duration>,
}

impl Aggregator {
    /// Create an aggregator with no overall deadline.
    pub fn new() -> Self {
        Self {
            overall_timeout: None,
        }
    }

    /// Bound the whole run: probes still unfinished at the deadline are
    /// aborted and reported as timed out.
    pub fn with_overall_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.overall_timeout = timeout;
        self
    }

    /// Execute every selected probe concurrently and collect a report.
    ///
    /// Entries appear in selection order regardless of completion order. An
    /// empty selection yields an empty, healthy report.
    pub async fn run(&self, selected: Vec<(ProbeDescriptor, Arc<dyn Probe>)>) -> Report {
        let started = Instant::now();
        let deadline = self
            .overall_timeout
            .map(|timeout| tokio::time::Instant::now() + timeout);

        let mut handles = Vec::with_capacity(selected.len());
        for (descriptor, probe) in selected {
            let budget = descriptor.timeout;
            let handle = tokio::spawn(async move {
                let begun = Instant::now();
                let outcome = tokio::time::timeout(budget, probe.execute(budget)).await;
                (outcome, begun.elapsed())
            });
            handles.push((descriptor, handle));
        }

        // Awaiting in selection order keeps the report deterministic; the
        // tasks themselves already run concurrently.
        let mut entries = Vec::with_capacity(handles.len());
        for (descriptor, mut handle) in handles {
            let entry = match deadline {
                Some(at) => match tokio::time::timeout_at(at, &mut handle).await {
                    Ok(joined) => entry_from_join(&descriptor, joined),
                    Err(_) => {
                        handle.abort();
                        warn!(probe = %descriptor.name, "probe aborted by overall deadline");
                        ReportEntry::timed_out(&descriptor, started.elapsed())
                    }
                },
                None => entry_from_join(&descriptor, handle.await),
            };
            entries.push(entry);
        }

        Report::new(entries, started.elapsed())
    }
}

/// Convert one joined probe task into a report entry, downgrading faults,
/// timeouts and panics to the probe's configured failure status.
fn entry_from_join(
    descriptor: &ProbeDescriptor,
    joined: Result<TaskOutcome, JoinError>,
) -> ReportEntry {
    match joined {
        Ok((Ok(Ok(result)), elapsed)) => {
            ReportEntry::from_result(&descriptor.name, result, elapsed)
        }
        Ok((Ok(Err(fault)), elapsed)) => {
            debug!(probe = %descriptor.name, error = %fault, "probe faulted");
            ReportEntry::fault(descriptor, fault.to_string(), elapsed)
        }
        Ok((Err(_), elapsed)) => {
            debug!(probe = %descriptor.name, "probe exceeded its budget");
            ReportEntry::timed_out(descriptor, elapsed)
        }
        Err(join_error) => {
            warn!(probe = %descriptor.name, error = %join_error, "probe task failed");
            ReportEntry::fault(
                descriptor,
                format!("probe panicked: {}", join_error),
                Duration::ZERO,
            )
        }
    }
}
