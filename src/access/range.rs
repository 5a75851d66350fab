//! IP range parsing and matching.

use std::fmt;
use std::net::IpAddr;

/// Error produced when an allow-list entry cannot be parsed.
#[derive(Debug)]
pub struct InvalidRange {
    /// The textual specification that failed to parse.
    pub spec: String,
    /// Why it failed.
    pub reason: String,
}

impl InvalidRange {
    fn new(spec: &str, reason: impl Into<String>) -> Self {
        Self {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for InvalidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid IP range '{}': {}", self.spec, self.reason)
    }
}

impl std::error::Error for InvalidRange {}

/// A contiguous range of addresses within one IP family.
///
/// Parsed from a single address (`10.1.2.3`, `::1`), CIDR notation
/// (`10.0.0.0/24`, `fd00::/8`) or a dash range (`10.0.0.5-10.0.0.20`).
/// Matching is an integer interval check on the address bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpRange {
    V4 { start: u32, end: u32 },
    V6 { start: u128, end: u128 },
}

impl IpRange {
    /// Parse one range specification.
    pub fn parse(spec: &str) -> Result<Self, InvalidRange> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(InvalidRange::new(spec, "empty specification"));
        }

        if let Some((addr, prefix)) = trimmed.split_once('/') {
            Self::parse_cidr(trimmed, addr, prefix)
        } else if let Some((start, end)) = trimmed.split_once('-') {
            Self::parse_bounds(trimmed, start, end)
        } else {
            let addr: IpAddr = trimmed
                .parse()
                .map_err(|e| InvalidRange::new(trimmed, format!("{}", e)))?;
            Ok(Self::single(addr))
        }
    }

    /// Range covering exactly one address.
    pub fn single(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => {
                let bits = u32::from(v4);
                IpRange::V4 {
                    start: bits,
                    end: bits,
                }
            }
            IpAddr::V6(v6) => {
                let bits = u128::from(v6);
                IpRange::V6 {
                    start: bits,
                    end: bits,
                }
            }
        }
    }

    fn parse_cidr(spec: &str, addr: &str, prefix: &str) -> Result<Self, InvalidRange> {
        let addr: IpAddr = addr
            .trim()
            .parse()
            .map_err(|e| InvalidRange::new(spec, format!("{}", e)))?;
        let prefix: u8 = prefix
            .trim()
            .parse()
            .map_err(|_| InvalidRange::new(spec, "prefix length is not a number"))?;

        match addr {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return Err(InvalidRange::new(spec, "prefix length exceeds 32"));
                }
                let base = u32::from(v4);
                let mask = if prefix == 0 {
                    0
                } else {
                    u32::MAX << (32 - prefix)
                };
                Ok(IpRange::V4 {
                    start: base & mask,
                    end: (base & mask) | !mask,
                })
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return Err(InvalidRange::new(spec, "prefix length exceeds 128"));
                }
                let base = u128::from(v6);
                let mask = if prefix == 0 {
                    0
                } else {
                    u128::MAX << (128 - prefix)
                };
                Ok(IpRange::V6 {
                    start: base & mask,
                    end: (base & mask) | !mask,
                })
            }
        }
    }

    fn parse_bounds(spec: &str, start: &str, end: &str) -> Result<Self, InvalidRange> {
        let start: IpAddr = start
            .trim()
            .parse()
            .map_err(|e| InvalidRange::new(spec, format!("start address: {}", e)))?;
        let end: IpAddr = end
            .trim()
            .parse()
            .map_err(|e| InvalidRange::new(spec, format!("end address: {}", e)))?;

        match (start, end) {
            (IpAddr::V4(a), IpAddr::V4(b)) => {
                let (start, end) = (u32::from(a), u32::from(b));
                if start > end {
                    return Err(InvalidRange::new(spec, "start address is after end address"));
                }
                Ok(IpRange::V4 { start, end })
            }
            (IpAddr::V6(a), IpAddr::V6(b)) => {
                let (start, end) = (u128::from(a), u128::from(b));
                if start > end {
                    return Err(InvalidRange::new(spec, "start address is after end address"));
                }
                Ok(IpRange::V6 { start, end })
            }
            _ => Err(InvalidRange::new(spec, "mixed address families")),
        }
    }

    /// True iff `addr` falls within this range. Families never cross-match.
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self, addr) {
            (IpRange::V4 { start, end }, IpAddr::V4(v4)) => {
                let bits = u32::from(v4);
                *start <= bits && bits <= *end
            }
            (IpRange::V6 { start, end }, IpAddr::V6(v6)) => {
                let bits = u128::from(v6);
                *start <= bits && bits <= *end
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_single_address() {
        let range = IpRange::parse("10.1.2.3").unwrap();
        assert!(range.contains(ip("10.1.2.3")));
        assert!(!range.contains(ip("10.1.2.4")));

        let range = IpRange::parse("::1").unwrap();
        assert!(range.contains(ip("::1")));
        assert!(!range.contains(ip("::2")));
    }

    #[test]
    fn test_cidr_v4_boundaries() {
        let range = IpRange::parse("10.0.0.0/24").unwrap();
        assert!(range.contains(ip("10.0.0.0")));
        assert!(range.contains(ip("10.0.0.255")));
        assert!(!range.contains(ip("10.0.1.0")));
        assert!(!range.contains(ip("9.255.255.255")));
    }

    #[test]
    fn test_cidr_v4_host_bits_are_masked() {
        // A base address with host bits set still denotes the whole block.
        let range = IpRange::parse("192.168.1.77/24").unwrap();
        assert!(range.contains(ip("192.168.1.1")));
        assert!(range.contains(ip("192.168.1.255")));
        assert!(!range.contains(ip("192.168.2.1")));
    }

    #[test]
    fn test_cidr_extremes() {
        let all = IpRange::parse("0.0.0.0/0").unwrap();
        assert!(all.contains(ip("255.255.255.255")));
        assert!(all.contains(ip("0.0.0.0")));

        let one = IpRange::parse("172.16.5.9/32").unwrap();
        assert!(one.contains(ip("172.16.5.9")));
        assert!(!one.contains(ip("172.16.5.8")));
    }

    #[test]
    fn test_cidr_v6() {
        let range = IpRange::parse("fd00::/8").unwrap();
        assert!(range.contains(ip("fd12:3456::1")));
        assert!(!range.contains(ip("fe80::1")));

        let loopback = IpRange::parse("::1/128").unwrap();
        assert!(loopback.contains(ip("::1")));
        assert!(!loopback.contains(ip("::2")));
    }

    #[test]
    fn test_dash_range() {
        let range = IpRange::parse("10.0.0.5-10.0.0.20").unwrap();
        assert!(range.contains(ip("10.0.0.5")));
        assert!(range.contains(ip("10.0.0.12")));
        assert!(range.contains(ip("10.0.0.20")));
        assert!(!range.contains(ip("10.0.0.4")));
        assert!(!range.contains(ip("10.0.0.21")));
    }

    #[test]
    fn test_families_never_cross_match() {
        let v4 = IpRange::parse("0.0.0.0/0").unwrap();
        assert!(!v4.contains(ip("::1")));

        let v6 = IpRange::parse("::/0").unwrap();
        assert!(!v6.contains(ip("127.0.0.1")));
    }

    #[test]
    fn test_malformed_specs_fail() {
        assert!(IpRange::parse("").is_err());
        assert!(IpRange::parse("not-an-ip").is_err());
        assert!(IpRange::parse("10.0.0.0/33").is_err());
        assert!(IpRange::parse("fd00::/129").is_err());
        assert!(IpRange::parse("10.0.0.0/abc").is_err());
        assert!(IpRange::parse("10.0.0.20-10.0.0.5").is_err());
        assert!(IpRange::parse("10.0.0.1-::1").is_err());
    }

    #[test]
    fn test_error_carries_spec_and_reason() {
        let err = IpRange::parse("10.0.0.0/33").unwrap_err();
        assert_eq!(err.spec, "10.0.0.0/33");
        assert!(err.to_string().contains("prefix length exceeds 32"));
    }
}
