//! JSON output formatting.

use crate::scanner::ScanResults;
use std::io::{self, Write};

/// Write results as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, results: &ScanResults) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)
}
