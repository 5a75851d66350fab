//! Health endpoint composition.
//!
//! Ties the access gate, registry selection and aggregator together into a
//! single request handler. The ordering matters: the gate is consulted for
//! every path under the health prefix, before any probe runs.

use std::net::IpAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use tracing::{debug, warn};

use crate::access::IpAccessGate;
use crate::health::{Aggregator, Report};
use crate::probe::{ProbeRegistry, Status};

/// Request handler for the health surface.
pub struct HealthEndpoint {
    route_prefix: String,
    gate: IpAccessGate,
    registry: Arc<ProbeRegistry>,
    aggregator: Aggregator,
}

impl HealthEndpoint {
    /// Compose an endpoint. `route_prefix` must be an absolute path,
    /// e.g. `/health`.
    pub fn new(
        route_prefix: String,
        gate: IpAccessGate,
        registry: Arc<ProbeRegistry>,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            route_prefix,
            gate,
            registry,
            aggregator,
        }
    }

    /// The configured route prefix.
    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// Handle one request.
    ///
    /// `client` must already be the canonical client address per the
    /// server's trusted-proxy policy. Routes: the prefix itself selects all
    /// probes, `{prefix}-{tag}` selects probes carrying that tag. Paths
    /// outside the prefix bypass the gate entirely and get 404.
    pub async fn handle(&self, path: &str, client: IpAddr) -> Response<Full<Bytes>> {
        let Some(rest) = path.strip_prefix(self.route_prefix.as_str()) else {
            return not_found();
        };

        if !self.gate.is_allowed(client) {
            warn!(client = %client, path = path, "health request denied");
            return forbidden();
        }

        let selected = if rest.is_empty() {
            self.registry.select_all()
        } else if let Some(tag) = rest.strip_prefix('-').filter(|tag| !tag.is_empty()) {
            self.registry.select_tagged(tag)
        } else {
            return not_found();
        };

        let report = self.aggregator.run(selected).await;
        debug!(
            status = %report.status,
            entries = report.entries.len(),
            duration_ms = report.total_duration_ms,
            "health report built"
        );
        report_response(&report)
    }
}

/// Serialize a report with its status-derived HTTP code.
///
/// Degraded deliberately maps to 200: orchestration liveness checks should
/// not restart an instance over partial degradation.
fn report_response(report: &Report) -> Response<Full<Bytes>> {
    let code = match report.status {
        Status::Healthy | Status::Degraded => StatusCode::OK,
        Status::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    let body = serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(code)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-store, no-cache")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Denied requests get no report body at all.
fn forbidden() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::FORBIDDEN)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn not_found() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Not Found")))
        .unwrap()
}
