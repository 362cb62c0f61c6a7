//! Result aggregation.
//!
//! Folds tagged probe results into two ascending open-port lists. Arrival
//! order is irrelevant: each result carries its own port, and the lists are
//! ordered by port number once everything has been collected.

use crate::scanner::traits::{ProbeResult, Protocol};
use crate::types::{Port, PortRange};
use serde::Serialize;
use tracing::warn;

/// Open ports found in one scan, per protocol, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub open_tcp_ports: Vec<Port>,
    pub open_udp_ports: Vec<Port>,
}

impl ScanReport {
    /// Build a report from probe results in any order.
    ///
    /// Only `Open` results inside `range` are kept.
    pub fn from_results<I>(range: PortRange, results: I) -> Self
    where
        I: IntoIterator<Item = ProbeResult>,
    {
        let mut aggregator = Aggregator::new(range);
        aggregator.extend(results);
        aggregator.finish()
    }

    pub fn open_ports(&self, protocol: Protocol) -> &[Port] {
        match protocol {
            Protocol::Tcp => &self.open_tcp_ports,
            Protocol::Udp => &self.open_udp_ports,
        }
    }

    /// True when neither protocol found an open port.
    pub fn is_empty(&self) -> bool {
        self.open_tcp_ports.is_empty() && self.open_udp_ports.is_empty()
    }
}

/// Incremental builder for a [`ScanReport`].
#[derive(Debug)]
pub struct Aggregator {
    range: PortRange,
    tcp: Vec<Port>,
    udp: Vec<Port>,
}

impl Aggregator {
    pub fn new(range: PortRange) -> Self {
        Self {
            range,
            tcp: Vec::new(),
            udp: Vec::new(),
        }
    }

    /// Record one probe result.
    pub fn push(&mut self, result: ProbeResult) {
        if !result.is_open() {
            return;
        }
        if !self.range.contains(result.port) {
            warn!(port = %result.port, range = %self.range, "dropping result outside scan range");
            return;
        }
        match result.protocol {
            Protocol::Tcp => self.tcp.push(result.port),
            Protocol::Udp => self.udp.push(result.port),
        }
    }

    /// Sort and seal the collected ports.
    pub fn finish(mut self) -> ScanReport {
        self.tcp.sort_unstable();
        self.udp.sort_unstable();
        ScanReport {
            open_tcp_ports: self.tcp,
            open_udp_ports: self.udp,
        }
    }
}

impl Extend<ProbeResult> for Aggregator {
    fn extend<T: IntoIterator<Item = ProbeResult>>(&mut self, iter: T) {
        for result in iter {
            self.push(result);
        }
    }
}
