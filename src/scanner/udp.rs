//! UDP probe.
//!
//! UDP has no handshake, so liveness is inferred from what comes back after
//! a single datagram:
//!
//! 1. **Reply datagram**: port is open
//! 2. **ICMP port unreachable** (surfaced by the kernel as an error on the
//!    connected socket): port is closed
//! 3. **Silence until the timeout**: port is treated as closed
//! 4. **Any other socket error**: port is treated as open
//!
//! Rule 4 is a weak heuristic. It most likely reflects platform-specific
//! error codes rather than a real liveness signal, but nothing stronger is
//! available without raw-socket ICMP inspection, so it is kept as-is.

use crate::scanner::traits::{Probe, ProbeOutcome, Protocol};
use crate::types::Port;
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

/// Payload sent when none is configured.
pub const DEFAULT_PAYLOAD: &[u8] = b"data";

const RECV_BUFFER_SIZE: usize = 1024;

/// What the transport layer observed for one UDP probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UdpReply {
    /// A datagram came back.
    Replied,
    /// The kernel reported ICMP port unreachable.
    ExplicitUnreachable,
    /// Some other error surfaced while sending or waiting.
    OtherError(io::ErrorKind),
    /// Nothing arrived before the timeout.
    TimedOut,
}

impl UdpReply {
    /// Classify an error raised by `connect`, `send` or `recv`.
    ///
    /// Linux reports port unreachable as `ECONNREFUSED`, Windows as
    /// `WSAECONNRESET`.
    pub fn from_error(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
                Self::ExplicitUnreachable
            }
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::TimedOut,
            kind => Self::OtherError(kind),
        }
    }

    /// Map the observation onto an open/closed verdict.
    pub fn outcome(self) -> ProbeOutcome {
        match self {
            Self::Replied => ProbeOutcome::Open,
            Self::ExplicitUnreachable | Self::TimedOut => ProbeOutcome::Closed,
            // Known correctness gap: an unrecognised error is not proof of a
            // listener, but it is reported as open for compatibility.
            Self::OtherError(_) => ProbeOutcome::Open,
        }
    }
}

/// UDP probe for detecting open UDP ports.
pub struct UdpProbe {
    target: Ipv4Addr,
    timeout: Duration,
    payload: Vec<u8>,
}

impl UdpProbe {
    /// Create a new UDP probe.
    ///
    /// # Arguments
    /// * `target` - Target address
    /// * `timeout` - How long to wait for a reply
    /// * `payload` - Datagram sent to every port
    pub fn new(target: Ipv4Addr, timeout: Duration, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            target,
            timeout,
            payload: payload.into(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Send the payload and observe what comes back.
    ///
    /// Returns `None` when no local socket could be bound, which says
    /// nothing about the target.
    pub async fn exchange(&self, port: Port) -> Option<UdpReply> {
        let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await {
            Ok(socket) => socket,
            Err(e) => {
                warn!(%port, error = %e, "failed to bind local udp socket");
                return None;
            }
        };

        // Connecting lets the kernel deliver ICMP errors to this socket.
        let addr = SocketAddrV4::new(self.target, port.as_u16());
        if let Err(e) = socket.connect(addr).await {
            return Some(UdpReply::from_error(&e));
        }
        if let Err(e) = socket.send(&self.payload).await {
            return Some(UdpReply::from_error(&e));
        }

        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let reply = match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(Ok(_)) => UdpReply::Replied,
            Ok(Err(e)) => UdpReply::from_error(&e),
            Err(_) => UdpReply::TimedOut,
        };
        Some(reply)
    }
}

#[async_trait]
impl Probe for UdpProbe {
    fn protocol(&self) -> Protocol {
        Protocol::Udp
    }

    fn target(&self) -> Ipv4Addr {
        self.target
    }

    async fn probe(&self, port: Port) -> ProbeOutcome {
        match self.exchange(port).await {
            Some(reply) => {
                if let UdpReply::OtherError(kind) = reply {
                    debug!(%port, ?kind, "unrecognised udp error, reporting port as open");
                } else {
                    trace!(%port, ?reply, "udp probe finished");
                }
                reply.outcome()
            }
            None => ProbeOutcome::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> UdpProbe {
        UdpProbe::new(Ipv4Addr::LOCALHOST, Duration::from_millis(200), DEFAULT_PAYLOAD)
    }

    #[test]
    fn test_probe_creation() {
        let probe = probe();
        assert_eq!(probe.protocol(), Protocol::Udp);
        assert_eq!(probe.target(), Ipv4Addr::LOCALHOST);
        assert_eq!(probe.payload(), b"data");
    }

    #[test]
    fn test_reply_classification() {
        assert_eq!(UdpReply::Replied.outcome(), ProbeOutcome::Open);
        assert_eq!(UdpReply::ExplicitUnreachable.outcome(), ProbeOutcome::Closed);
        assert_eq!(UdpReply::TimedOut.outcome(), ProbeOutcome::Closed);
        assert_eq!(
            UdpReply::OtherError(io::ErrorKind::PermissionDenied).outcome(),
            ProbeOutcome::Open
        );
    }

    #[test]
    fn test_error_classification() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);

        assert_eq!(UdpReply::from_error(&refused), UdpReply::ExplicitUnreachable);
        assert_eq!(UdpReply::from_error(&reset), UdpReply::ExplicitUnreachable);
        assert_eq!(UdpReply::from_error(&timed_out), UdpReply::TimedOut);
        assert_eq!(
            UdpReply::from_error(&denied),
            UdpReply::OtherError(io::ErrorKind::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_echo_listener_is_open() {
        let server = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = Port::new(server.local_addr().unwrap().port());
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            while let Ok((n, peer)) = server.recv_from(&mut buf).await {
                let _ = server.send_to(&buf[..n], peer).await;
            }
        });

        assert_eq!(probe().exchange(port).await, Some(UdpReply::Replied));
        assert_eq!(probe().probe(port).await, ProbeOutcome::Open);
    }

    #[tokio::test]
    async fn test_unbound_port_is_closed() {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = Port::new(socket.local_addr().unwrap().port());
        drop(socket);

        // Loopback normally answers with port unreachable; if that is
        // suppressed the probe times out, which is also closed.
        assert_eq!(probe().probe(port).await, ProbeOutcome::Closed);
    }

    #[tokio::test]
    async fn test_silent_listener_is_closed() {
        let silent = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = Port::new(silent.local_addr().unwrap().port());

        assert_eq!(probe().exchange(port).await, Some(UdpReply::TimedOut));
        assert_eq!(probe().probe(port).await, ProbeOutcome::Closed);
        drop(silent);
    }
}
