//! Scanner module - probes and the scheduler that drives them.
//!
//! Both probes run over the whole range, either one port at a time or on a
//! bounded pool of concurrent tasks on the tokio runtime. Every task result
//! is tagged with its port, so the report never depends on completion order.

pub mod aggregate;
pub mod tcp;
pub mod traits;
pub mod udp;

use crate::types::{Port, PortRange};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

pub use aggregate::{Aggregator, ScanReport};
pub use tcp::TcpProbe;
pub use traits::{Probe, ProbeOutcome, ProbeResult, Protocol, ScanMode};
pub use udp::{UdpProbe, UdpReply, DEFAULT_PAYLOAD};

/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10);

/// Default worker-pool capacity.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Immutable configuration for one scan, shared by the probes and the scheduler.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Target address.
    pub target: Ipv4Addr,
    /// Target as the user typed it.
    pub target_hostname: String,
    /// Connect / reply timeout per probe.
    pub timeout: Duration,
    /// Maximum probes in flight across both protocols.
    pub concurrency: usize,
    /// UDP datagram payload.
    pub payload: Vec<u8>,
    /// Show a progress bar while scanning.
    pub verbose: bool,
}

impl ScanConfig {
    /// Create a new scan configuration with default tuning.
    pub fn new(target: Ipv4Addr) -> Self {
        Self {
            target,
            target_hostname: target.to_string(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            payload: DEFAULT_PAYLOAD.to_vec(),
            verbose: false,
        }
    }

    /// Set the target hostname.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.target_hostname = hostname.into();
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the pool capacity. Zero is raised to one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the UDP payload.
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Enable the progress bar.
    pub fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn tcp_probe(&self) -> TcpProbe {
        TcpProbe::new(self.target, self.timeout)
    }

    pub fn udp_probe(&self) -> UdpProbe {
        UdpProbe::new(self.target, self.timeout, self.payload.clone())
    }
}

/// Complete scan results: the report plus what produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResults {
    pub target: String,
    pub ip_address: String,
    pub mode: ScanMode,
    pub first_port: Port,
    pub last_port: Port,
    pub ports_scanned: usize,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub report: ScanReport,
}

/// Execute a complete scan of `range` in the given mode.
pub async fn run_scan(config: &ScanConfig, range: PortRange, mode: ScanMode) -> ScanResults {
    let start_time = Instant::now();
    let tcp = config.tcp_probe();
    let udp = config.udp_probe();

    info!(
        host = %tcp.target(),
        first = %range.first(),
        last = %range.last(),
        %mode,
        capacity = config.concurrency,
        timeout_ms = config.timeout.as_millis() as u64,
        "starting scan"
    );

    let report = match mode {
        ScanMode::Sequential => scan_sequential(&tcp, &udp, range).await,
        ScanMode::Concurrent => {
            let progress = config.verbose.then(|| progress_bar(range.len() as u64 * 2));
            let report =
                scan_concurrent(&tcp, &udp, range, config.concurrency, progress.as_ref()).await;
            if let Some(pb) = progress {
                pb.finish_with_message("Scan complete");
            }
            report
        }
    };

    let duration = start_time.elapsed();
    info!(
        open_tcp = report.open_tcp_ports.len(),
        open_udp = report.open_udp_ports.len(),
        duration_ms = duration.as_millis() as u64,
        "scan finished"
    );

    ScanResults {
        target: config.target_hostname.clone(),
        ip_address: config.target.to_string(),
        mode,
        first_port: range.first(),
        last_port: range.last(),
        ports_scanned: range.len(),
        duration_ms: duration.as_millis() as u64,
        report,
    }
}

/// Probe every port in ascending order, TCP then UDP, one call at a time.
pub async fn scan_sequential<T, U>(tcp: &T, udp: &U, range: PortRange) -> ScanReport
where
    T: Probe + ?Sized,
    U: Probe + ?Sized,
{
    let mut aggregator = Aggregator::new(range);
    for port in range.iter() {
        let outcome = tcp.probe(port).await;
        aggregator.push(ProbeResult::new(port, tcp.protocol(), outcome));

        let outcome = udp.probe(port).await;
        aggregator.push(ProbeResult::new(port, udp.protocol(), outcome));
    }
    aggregator.finish()
}

/// Probe every port with both probes on a pool of `capacity` slots.
///
/// The TCP and UDP passes run side by side and draw from the same
/// semaphore, so no more than `capacity` probes are ever in flight.
pub async fn scan_concurrent<T, U>(
    tcp: &T,
    udp: &U,
    range: PortRange,
    capacity: usize,
    progress: Option<&ProgressBar>,
) -> ScanReport
where
    T: Probe + ?Sized,
    U: Probe + ?Sized,
{
    let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Semaphore::new(capacity);

    let (tcp_results, udp_results) = tokio::join!(
        probe_range(tcp, range, capacity, &semaphore, progress),
        probe_range(udp, range, capacity, &semaphore, progress),
    );

    ScanReport::from_results(range, tcp_results.into_iter().chain(udp_results))
}

/// Run one probe across the range with bounded concurrency.
async fn probe_range<P>(
    probe: &P,
    range: PortRange,
    capacity: usize,
    semaphore: &Semaphore,
    progress: Option<&ProgressBar>,
) -> Vec<ProbeResult>
where
    P: Probe + ?Sized,
{
    let protocol = probe.protocol();

    stream::iter(range.iter())
        .map(move |port| async move {
            // The semaphore is owned by the enclosing scan and never closed.
            let _permit = semaphore.acquire().await.ok();

            let outcome = probe.probe(port).await;

            if let Some(pb) = progress {
                pb.inc(1);
                if outcome.is_open() {
                    pb.set_message(format!("Found open {} port: {}", protocol, port));
                }
            }

            ProbeResult::new(port, protocol, outcome)
        })
        .buffer_unordered(capacity)
        .collect()
        .await
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
