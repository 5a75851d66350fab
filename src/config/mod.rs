//! Configuration module for vitals.
//!
//! Scalar settings come from environment variables; the probe manifest,
//! being structured, comes from a JSON file referenced by `PROBES_FILE`.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitals::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! println!("Probes: {}", config.probes.len());
//! ```

mod access;
mod error;
mod logging;
mod parse;
mod probes;
mod server;

pub use access::AccessConfig;
pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use probes::{build_registry, default_specs, load_manifest, ProbeKind, ProbeSpec};
pub use server::{OverallTimeout, ServerConfig};

use std::path::Path;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Access-control configuration.
    pub access: AccessConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Probe registrations.
    pub probes: Vec<ProbeSpec>,
}

impl Config {
    /// Load configuration from environment variables and the probe manifest.
    pub fn from_env() -> Result<Self, ConfigError> {
        let probes = match parse::env_opt("PROBES_FILE") {
            Some(path) => probes::load_manifest(Path::new(&path))?,
            None => probes::default_specs(),
        };

        Ok(Self {
            server: ServerConfig::from_env()?,
            access: AccessConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
            probes,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Health route: {}", self.server.route_prefix);
        info!("  Allowed ranges: {}", self.access.allow.len());

        if self.server.overall_timeout.is_enabled() {
            info!(
                "  Overall timeout: {}s",
                self.server.overall_timeout.as_secs()
            );
        } else {
            info!("  Overall timeout: disabled");
        }

        if self.server.trust_forwarded {
            info!("  Trusting X-Forwarded-For");
        }

        // Probe parameters stay out of the log: a job probe's host entry is
        // a credential.
        let names: Vec<&str> = self.probes.iter().map(|p| p.name.as_str()).collect();
        info!("  Probes: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        // Clear all env vars that might affect the test
        std::env::remove_var("LISTEN_ADDR");
        std::env::remove_var("HEALTH_ROUTE");
        std::env::remove_var("ALLOW_IPS");
        std::env::remove_var("OVERALL_TIMEOUT");
        std::env::remove_var("TRUST_FORWARDED");
        std::env::remove_var("PROBES_FILE");

        let config = Config::from_env().expect("Should load config");

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.server.route_prefix, "/health");
        assert!(!config.server.trust_forwarded);
        assert_eq!(config.server.overall_timeout.as_secs(), 30);
        assert_eq!(config.access.allow, vec!["127.0.0.1", "::1"]);
        assert_eq!(config.probes.len(), 1);
        assert_eq!(config.probes[0].name, "even_second");
    }
}
