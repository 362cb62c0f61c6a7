//! CSV output formatting.

use crate::scanner::{Protocol, ScanResults};
use std::io::{self, Write};

/// Write one `protocol,port` row per open port, TCP first.
pub fn write_csv<W: Write>(out: &mut W, results: &ScanResults) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["protocol", "port"])?;

    for protocol in [Protocol::Tcp, Protocol::Udp] {
        for port in results.report.open_ports(protocol) {
            wtr.write_record([protocol.to_string(), port.to_string()])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
