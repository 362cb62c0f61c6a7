//! Target host parsing and resolution.
//!
//! Supports:
//! - IPv4 addresses ("127.0.0.1")
//! - Hostnames ("localhost", "scanme.example.org")
//!
//! IPv6 targets are rejected; the probes only speak IPv4.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// A scan target that has been resolved to an IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved address.
    pub ip: Ipv4Addr,
}

impl ScanTarget {
    /// Create a new scan target.
    pub fn new(original: impl Into<String>, ip: Ipv4Addr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: {0}")]
    InvalidFormat(String),
    #[error("IPv6 targets are not supported: {0}")]
    Ipv6Unsupported(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    ResolutionFailed(String, String),
    #[error("no IPv4 addresses found for hostname '{0}'")]
    NoIpv4Address(String),
}

/// A target specification as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A literal IPv4 address.
    Address(Ipv4Addr),
    /// A hostname to be resolved.
    Hostname(String),
}

impl TargetSpec {
    /// Parse a target specification from a string.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();

        match s.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => return Ok(Self::Address(ip)),
            Ok(IpAddr::V6(_)) => return Err(TargetError::Ipv6Unsupported(s.to_string())),
            Err(_) => {}
        }

        if is_valid_hostname(s) {
            return Ok(Self::Hostname(s.to_string()));
        }

        Err(TargetError::InvalidFormat(s.to_string()))
    }

    /// Resolve this specification to a single IPv4 target.
    ///
    /// Hostnames go through the system resolver (so `/etc/hosts` entries such
    /// as `localhost` resolve without network access); the first IPv4 address
    /// wins.
    pub async fn resolve(&self) -> Result<ScanTarget, TargetError> {
        match self {
            Self::Address(ip) => Ok(ScanTarget::new(ip.to_string(), *ip)),
            Self::Hostname(hostname) => {
                let addrs = tokio::net::lookup_host((hostname.as_str(), 0))
                    .await
                    .map_err(|e| TargetError::ResolutionFailed(hostname.clone(), e.to_string()))?;

                addrs
                    .filter_map(|addr| match addr {
                        SocketAddr::V4(v4) => Some(*v4.ip()),
                        SocketAddr::V6(_) => None,
                    })
                    .next()
                    .map(|ip| ScanTarget::new(hostname.clone(), ip))
                    .ok_or_else(|| TargetError::NoIpv4Address(hostname.clone()))
            }
        }
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(ip) => write!(f, "{}", ip),
            Self::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

/// Check if a string is a valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // Each label must be 1-63 characters
    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().last().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        let spec = TargetSpec::parse("192.168.1.1").unwrap();
        assert_eq!(spec, TargetSpec::Address(Ipv4Addr::new(192, 168, 1, 1)));
    }

    #[test]
    fn test_parse_ipv6_rejected() {
        let result = TargetSpec::parse("::1");
        assert!(matches!(result, Err(TargetError::Ipv6Unsupported(_))));
    }

    #[test]
    fn test_parse_hostname() {
        let spec = TargetSpec::parse("localhost").unwrap();
        assert!(matches!(spec, TargetSpec::Hostname(_)));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            TargetSpec::parse("not a host!"),
            Err(TargetError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_valid_hostname() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("my-server"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-invalid.com"));
    }

    #[tokio::test]
    async fn test_resolve_literal_keeps_original() {
        let target = TargetSpec::parse("127.0.0.1").unwrap().resolve().await.unwrap();
        assert_eq!(target.ip, Ipv4Addr::LOCALHOST);
        assert_eq!(target.to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_resolve_localhost() {
        let target = TargetSpec::parse("localhost").unwrap().resolve().await.unwrap();
        assert!(target.ip.is_loopback());
        assert_eq!(target.original, "localhost");
    }
}
