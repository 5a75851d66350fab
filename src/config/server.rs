//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use super::parse::{env_bool, env_duration, env_or};
use super::ConfigError;

/// Overall health-run deadline configuration.
#[derive(Clone, Debug)]
pub struct OverallTimeout(pub Option<Duration>);

impl OverallTimeout {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    #[inline]
    pub fn as_secs(&self) -> u64 {
        self.0.map(|d| d.as_secs()).unwrap_or(0)
    }

    #[inline]
    pub fn as_duration(&self) -> Option<Duration> {
        self.0
    }
}

impl Default for OverallTimeout {
    fn default() -> Self {
        Self(Some(Duration::from_secs(30)))
    }
}

/// Server configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:8080).
    pub listen_addr: SocketAddr,
    /// Route prefix for the health surface (default: /health).
    pub route_prefix: String,
    /// Deadline for one whole health run.
    pub overall_timeout: OverallTimeout,
    /// Trust the first X-Forwarded-For entry as the client address.
    pub trust_forwarded: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse listen address
        let listen_addr: SocketAddr = env_or("LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .map_err(|e| ConfigError::Parse {
                key: "LISTEN_ADDR".into(),
                value: env_or("LISTEN_ADDR", "0.0.0.0:8080"),
                error: format!("{}", e),
            })?;

        let route_prefix = env_or("HEALTH_ROUTE", "/health");
        if !route_prefix.starts_with('/') || route_prefix.len() < 2 {
            return Err(ConfigError::Invalid {
                key: "HEALTH_ROUTE".into(),
                message: format!("'{}' is not an absolute path", route_prefix),
            });
        }

        Ok(Self {
            listen_addr,
            route_prefix,
            overall_timeout: OverallTimeout(env_duration("OVERALL_TIMEOUT", "30s")?),
            trust_forwarded: env_bool("TRUST_FORWARDED", false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_timeout_accessors() {
        let timeout = OverallTimeout(Some(Duration::from_secs(45)));
        assert!(timeout.is_enabled());
        assert_eq!(timeout.as_secs(), 45);
        assert_eq!(timeout.as_duration(), Some(Duration::from_secs(45)));

        let disabled = OverallTimeout(None);
        assert!(!disabled.is_enabled());
        assert_eq!(disabled.as_secs(), 0);
    }
}
