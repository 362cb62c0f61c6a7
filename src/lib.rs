//! # portsift - concurrent TCP/UDP port-range scanner
//!
//! portsift walks an inclusive port range on one IPv4 host and reports which
//! ports accept a TCP connection and which answer a UDP datagram.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsift::scanner::{run_scan, ScanConfig, ScanMode};
//! use portsift::types::validate_range;
//! use std::net::Ipv4Addr;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScanConfig::new(Ipv4Addr::LOCALHOST);
//!     let range = validate_range(8000, 8100).unwrap();
//!
//!     let results = run_scan(&config, range, ScanMode::Concurrent).await;
//!     println!("open tcp: {:?}", results.report.open_tcp_ports);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - `Port`, `PortRange` and target resolution
//! - [`scanner`] - the TCP and UDP probes, the scheduler and the aggregator
//! - [`config`] - optional settings file
//! - [`cli`] - argument parsing and command execution
//! - [`output`] - plain, JSON and CSV report formatting
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError};
pub use scanner::{
    run_scan, Probe, ProbeOutcome, ProbeResult, Protocol, ScanConfig, ScanMode, ScanReport,
    ScanResults,
};
pub use types::{Port, PortRange, ScanTarget, TargetSpec};
