//! Remote URL reachability probe.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Probe, ProbeError, ProbeResult};

/// Probes a remote URL with an HTTP GET.
///
/// A success-class response maps to healthy; any other response class maps to
/// degraded with the status code captured in the result. Transport failures
/// (DNS, connect, TLS) are probe faults handled by the aggregator.
pub struct UrlProbe {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl UrlProbe {
    /// Create a probe for `url` using a shared HTTP client.
    pub fn new(client: reqwest::Client, url: reqwest::Url) -> Self {
        Self { client, url }
    }

    /// The probed URL.
    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

#[async_trait]
impl Probe for UrlProbe {
    async fn execute(&self, budget: Duration) -> Result<ProbeResult, ProbeError> {
        // The request timeout mirrors the budget so the transfer is aborted
        // cooperatively; the aggregator still enforces the outer deadline.
        let response = self
            .client
            .get(self.url.clone())
            .timeout(budget)
            .send()
            .await?;

        Ok(classify(response.status()))
    }
}

/// Map a response status to a probe result.
fn classify(status: StatusCode) -> ProbeResult {
    let code = status.as_u16();
    if status.is_success() {
        ProbeResult::healthy().with_data("status_code", serde_json::json!(code))
    } else {
        ProbeResult::degraded(format!("responded with status {}", code))
            .with_data("status_code", serde_json::json!(code))
    }
}
