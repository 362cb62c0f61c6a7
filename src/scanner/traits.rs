//! Probe trait abstraction.
//!
//! Defines the common interface both liveness probes implement, so the
//! scheduler can drive them (or instrumented stand-ins) interchangeably.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Transport protocol a probe speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// Liveness verdict for one `(protocol, port)`.
///
/// There is no unknown state: every probe resolves to one of these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    Open,
    Closed,
}

impl ProbeOutcome {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A probe outcome tagged with the port and protocol it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub port: Port,
    pub protocol: Protocol,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn new(port: Port, protocol: Protocol, outcome: ProbeOutcome) -> Self {
        Self {
            port,
            protocol,
            outcome,
        }
    }

    pub fn is_open(&self) -> bool {
        self.outcome.is_open()
    }
}

/// How the scheduler walks the range.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// One port at a time: TCP probe, then UDP probe.
    Sequential,
    /// Both probes across the whole range on a bounded worker pool.
    #[default]
    Concurrent,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(Self::Sequential),
            "concurrent" | "parallel" => Ok(Self::Concurrent),
            _ => Err(format!("unknown scan mode: {}", s)),
        }
    }
}

/// Trait for single-port liveness probes.
///
/// Implementations own any socket they open for the duration of one call
/// and must release it before returning. Failures never escape: they are
/// folded into the returned [`ProbeOutcome`].
#[async_trait]
pub trait Probe: Send + Sync {
    /// Protocol this probe speaks.
    fn protocol(&self) -> Protocol;

    /// Host being probed.
    fn target(&self) -> Ipv4Addr;

    /// Probe a single port.
    async fn probe(&self, port: Port) -> ProbeOutcome;
}
