//! vitals - IP-gated health probe endpoint built on Tokio and Hyper.
//!
//! This crate runs a set of heterogeneous health probes (filesystem, remote
//! URL, scheduled job, synthetic) concurrently under per-probe timeouts,
//! aggregates their results into a single report and serves it as JSON over
//! HTTP. The report is visible only to clients whose address falls inside
//! configured IP ranges.
//!
//! # Architecture
//!
//! - [`probe`] - the probe contract, the registry and the built-in probes
//! - [`health`] - concurrent execution and report assembly
//! - [`access`] - IP range parsing and the allow-list gate
//! - [`server`] - the hyper accept loop and endpoint composition
//! - [`config`] - environment and manifest configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitals::access::IpAccessGate;
//! use vitals::health::Aggregator;
//! use vitals::probe::{PathProbe, ProbeDescriptor, ProbeRegistry};
//! use vitals::server::{HealthEndpoint, Server};
//!
//! let mut registry = ProbeRegistry::new();
//! registry.register(
//!     ProbeDescriptor::new("export-dir").with_tags(["server"]),
//!     Arc::new(PathProbe::directory("/srv/export")),
//! )?;
//!
//! let endpoint = HealthEndpoint::new(
//!     "/health".to_string(),
//!     IpAccessGate::parse(&["10.0.0.0/24"])?,
//!     Arc::new(registry),
//!     Aggregator::new(),
//! );
//!
//! let server = Server::bind("0.0.0.0:8080".parse()?, endpoint, false).await?;
//! server.run().await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod access;
pub mod config;
pub mod health;
pub mod probe;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use server::{HealthEndpoint, Server};
