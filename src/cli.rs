//! Command-line interface definitions for portsift.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file, then to built-in defaults.

use crate::config::AppSettings;
use crate::error::{CliResult, ConfigResult};
use crate::output;
use crate::scanner::{run_scan, ScanConfig, ScanMode, ScanResults};
use crate::types::{validate_range, PortError, PortRange, TargetSpec};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Scan a port range on one host for open TCP and UDP ports.
#[derive(Parser, Debug)]
#[command(name = "portsift")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent TCP connect and UDP port-range scanner", long_about = None)]
pub struct Args {
    /// First and last port of the range to scan (inclusive, 0-65535)
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["FIRST", "LAST"],
        required = true,
        allow_negative_numbers = true
    )]
    pub ports: Vec<i64>,

    /// IPv4 address or hostname to scan [default: localhost]
    #[arg(short = 'a', long = "addr", value_name = "HOST")]
    pub addr: Option<String>,

    /// Execution mode [default: concurrent]
    #[arg(short, long, value_enum)]
    pub mode: Option<ScanMode>,

    /// Maximum number of probes in flight [default: 50]
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-probe timeout in milliseconds [default: 10]
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Text sent in every UDP probe datagram [default: data]
    #[arg(long)]
    pub payload: Option<String>,

    /// Output format for results [default: plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logs and scanning progress)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Everything a scan needs, after merging flags with settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub host: String,
    pub range: PortRange,
    pub mode: ScanMode,
    pub concurrency: usize,
    pub timeout: Duration,
    pub payload: Vec<u8>,
    pub output: OutputFormat,
    pub verbose: bool,
}

impl Args {
    /// Validate the two `--ports` endpoints.
    pub fn port_range(&self) -> Result<PortRange, PortError> {
        match self.ports.as_slice() {
            [first, last] => validate_range(*first, *last),
            other => Err(PortError::MissingBounds(other.len())),
        }
    }

    /// Load the settings file named by `--config`, or the default one.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path),
            None => AppSettings::load(),
        }
    }

    /// Merge flags over `settings`.
    pub fn scan_options(&self, settings: &AppSettings) -> Result<ScanOptions, PortError> {
        Ok(ScanOptions {
            host: self
                .addr
                .clone()
                .unwrap_or_else(|| settings.default_host.clone()),
            range: self.port_range()?,
            mode: self.mode.unwrap_or(settings.default_mode),
            concurrency: self.concurrency.unwrap_or(settings.default_concurrency),
            timeout: Duration::from_millis(self.timeout.unwrap_or(settings.default_timeout_ms)),
            payload: self
                .payload
                .as_deref()
                .unwrap_or(&settings.udp_payload)
                .as_bytes()
                .to_vec(),
            output: self.output.unwrap_or(settings.default_output_format),
            verbose: self.verbose,
        })
    }

    /// Run the scan described by these arguments and print the report.
    pub async fn execute(&self) -> CliResult<ScanResults> {
        let settings = self.load_settings()?;
        let options = self.scan_options(&settings)?;

        let target = TargetSpec::parse(&options.host)?.resolve().await?;

        if options.range.is_empty() {
            output::print_warning(&format!(
                "first port is greater than last port ({}), nothing to scan",
                options.range
            ));
        }

        if options.output == OutputFormat::Plain {
            output::print_scan_header(&target.to_string(), options.range, options.mode);
        }

        let mut config = ScanConfig::new(target.ip)
            .with_hostname(&target.original)
            .with_timeout(options.timeout)
            .with_concurrency(options.concurrency)
            .with_payload(options.payload);
        if options.verbose {
            config = config.with_verbose();
        }

        let results = run_scan(&config, options.range, options.mode).await;
        output::print_results(&results, options.output)?;

        Ok(results)
    }
}
