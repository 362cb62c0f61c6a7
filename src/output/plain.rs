//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{ScanMode, ScanResults};
use crate::types::PortRange;
use console::style;
use std::io::{self, Write};

const COLUMN_WIDTH: usize = 31;

/// Write results as two aligned columns of open ports.
pub fn write_plain<W: Write>(out: &mut W, results: &ScanResults) -> io::Result<()> {
    let report = &results.report;

    writeln!(
        out,
        "{} {} - {}",
        style("Interval:").bold(),
        results.first_port,
        results.last_port
    )?;
    writeln!(
        out,
        "{} {} ({:.2}s)",
        style("Mode:").bold(),
        results.mode,
        results.duration_ms as f64 / 1000.0
    )?;

    if report.is_empty() {
        writeln!(
            out,
            "{}",
            style(format!(
                "No open TCP or UDP ports in the range {} - {}.",
                results.first_port, results.last_port
            ))
            .dim()
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "{} {} TCP, {} UDP",
        style("Open ports:").bold(),
        style(report.open_tcp_ports.len()).green().bold(),
        style(report.open_udp_ports.len()).green().bold()
    )?;
    writeln!(out)?;
    writeln!(out, "{:<width$} {}", "TCP", "UDP", width = COLUMN_WIDTH)?;

    let rows = report.open_tcp_ports.len().max(report.open_udp_ports.len());
    for row in 0..rows {
        let tcp = report
            .open_tcp_ports
            .get(row)
            .map(ToString::to_string)
            .unwrap_or_default();
        let udp = report
            .open_udp_ports
            .get(row)
            .map(ToString::to_string)
            .unwrap_or_default();
        writeln!(out, "{:<width$} {}", tcp, udp, width = COLUMN_WIDTH)?;
    }

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, range: PortRange, mode: ScanMode) {
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsift").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Scanning {}",
        style("•").dim(),
        style(target).white().bold()
    );
    println!(
        "{} Ports {} ({} mode)",
        style("•").dim(),
        style(range).white().bold(),
        style(mode).yellow()
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
