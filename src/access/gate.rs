//! Allow-list gate for the health surface.

use std::net::IpAddr;

use tracing::trace;

use super::range::{InvalidRange, IpRange};

/// Immutable set of allowed client address ranges.
///
/// Built once at startup; the first malformed entry fails the whole
/// construction so a typo never silently shrinks the allow-list.
#[derive(Debug, Clone)]
pub struct AllowList {
    ranges: Vec<IpRange>,
}

impl AllowList {
    /// Parse every configured range specification.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self, InvalidRange> {
        let ranges = specs
            .iter()
            .map(|spec| IpRange::parse(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { ranges })
    }

    /// True iff `addr` falls within any configured range.
    pub fn contains(&self, addr: IpAddr) -> bool {
        self.ranges.iter().any(|range| range.contains(addr))
    }

    /// Number of configured ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if no ranges are configured.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Decides whether a client address may see health data.
///
/// Holds no mutable state after construction; safe for unbounded concurrent
/// reads. The caller hands it the canonical client address resolved per the
/// server's trusted-proxy policy.
#[derive(Debug, Clone)]
pub struct IpAccessGate {
    allow: AllowList,
}

impl IpAccessGate {
    /// Build a gate over an already-parsed allow-list.
    pub fn new(allow: AllowList) -> Self {
        Self { allow }
    }

    /// Parse range specifications and build the gate in one step.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self, InvalidRange> {
        Ok(Self::new(AllowList::parse(specs)?))
    }

    /// True iff `client` falls within any allowed range.
    ///
    /// IPv4-mapped IPv6 addresses are canonicalized first so a v4 client
    /// behind a dual-stack listener still matches its v4 ranges.
    pub fn is_allowed(&self, client: IpAddr) -> bool {
        let canonical = client.to_canonical();
        let allowed = self.allow.contains(canonical);
        trace!(client = %canonical, allowed, "access gate decision");
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_allows_inside_any_range() {
        let gate = IpAccessGate::parse(&["127.0.0.1", "10.0.0.0/24", "fd00::/8"]).unwrap();

        assert!(gate.is_allowed(ip("127.0.0.1")));
        assert!(gate.is_allowed(ip("10.0.0.255")));
        assert!(gate.is_allowed(ip("fd42::7")));
    }

    #[test]
    fn test_denies_outside_all_ranges() {
        let gate = IpAccessGate::parse(&["127.0.0.1", "10.0.0.0/24"]).unwrap();

        assert!(!gate.is_allowed(ip("10.0.1.0")));
        assert!(!gate.is_allowed(ip("192.168.1.1")));
        assert!(!gate.is_allowed(ip("::1")));
    }

    #[test]
    fn test_empty_allow_list_denies_everyone() {
        let gate = IpAccessGate::parse::<&str>(&[]).unwrap();
        assert!(!gate.is_allowed(ip("127.0.0.1")));
    }

    #[test]
    fn test_v4_mapped_v6_matches_v4_ranges() {
        let gate = IpAccessGate::parse(&["10.0.0.0/24"]).unwrap();
        assert!(gate.is_allowed(ip("::ffff:10.0.0.17")));
        assert!(!gate.is_allowed(ip("::ffff:10.0.1.17")));
    }

    #[test]
    fn test_malformed_entry_fails_construction() {
        let result = AllowList::parse(&["127.0.0.1", "10.0.0.0/64"]);
        assert!(result.is_err());
    }
}
