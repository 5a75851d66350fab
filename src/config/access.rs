//! Access-control configuration.

use super::parse::env_or;
use super::ConfigError;

/// Allow-list configuration loaded from environment.
///
/// Holds the textual range specifications; parsing and validation happen
/// when the access gate is built, so a malformed entry still fails startup.
#[derive(Clone, Debug)]
pub struct AccessConfig {
    /// Allowed client ranges: single IPs, CIDR blocks or dash ranges.
    pub allow: Vec<String>,
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// `ALLOW_IPS` is a comma-separated list; it defaults to loopback only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let allow = split_entries(&env_or("ALLOW_IPS", "127.0.0.1,::1"));

        if allow.is_empty() {
            return Err(ConfigError::Invalid {
                key: "ALLOW_IPS".into(),
                message: "allow-list cannot be empty".into(),
            });
        }

        Ok(Self { allow })
    }
}

/// Split a comma-separated range list, trimming whitespace and dropping
/// empty entries.
fn split_entries(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_and_trims_entries() {
        let entries = split_entries(" 10.0.0.0/24 , 192.168.1.5 ,::1");
        assert_eq!(entries, vec!["10.0.0.0/24", "192.168.1.5", "::1"]);
    }

    #[test]
    fn test_drops_empty_entries() {
        let entries = split_entries("127.0.0.1,,  ,::1,");
        assert_eq!(entries, vec!["127.0.0.1", "::1"]);
    }

    #[test]
    fn test_all_empty_is_empty() {
        assert!(split_entries(", ,").is_empty());
    }
}
