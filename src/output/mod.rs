//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan results.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_scan_header, print_warning, write_plain};

use crate::cli::OutputFormat;
use crate::scanner::ScanResults;
use std::io::{self, Write};

/// Format and print scan results according to the specified format.
pub fn print_results(results: &ScanResults, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, results, format)?;
    out.flush()
}

/// Format scan results into any writer.
pub fn write_results<W: Write>(
    out: &mut W,
    results: &ScanResults,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, results),
        OutputFormat::Json => write_json(out, results),
        OutputFormat::Csv => write_csv(out, results),
    }
}
