//! TCP connect probe.
//!
//! Completes the full handshake through the operating system's socket API.
//! A single attempt at a fixed timeout is authoritative: refused, timed out
//! and unreachable all collapse to `Closed`, so jitter on a slow link can
//! produce false negatives.

use crate::scanner::traits::{Probe, ProbeOutcome, Protocol};
use crate::types::Port;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect probe.
///
/// Does not require elevated privileges.
pub struct TcpProbe {
    target: Ipv4Addr,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a new TCP probe.
    ///
    /// # Arguments
    /// * `target` - Target address to probe
    /// * `timeout` - Handshake timeout per port
    pub fn new(target: Ipv4Addr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Probe for TcpProbe {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    fn target(&self) -> Ipv4Addr {
        self.target
    }

    async fn probe(&self, port: Port) -> ProbeOutcome {
        let addr = SocketAddr::V4(SocketAddrV4::new(self.target, port.as_u16()));

        // The stream (or the pending connect future, on timeout) is dropped
        // before returning, which closes the socket on every path.
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                trace!(%port, "tcp handshake completed");
                ProbeOutcome::Open
            }
            Ok(Err(e)) => {
                trace!(%port, error = %e, "tcp connect failed");
                ProbeOutcome::Closed
            }
            Err(_) => {
                trace!(%port, "tcp connect timed out");
                ProbeOutcome::Closed
            }
        }
    }
}
