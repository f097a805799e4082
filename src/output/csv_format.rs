//! CSV output formatting.

use super::ScanReport;
use std::io::{self, Write};

/// Write one row per reported host.
pub fn write_csv<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["address", "port", "reachable", "response_time_ms"])?;

    for result in &report.results {
        wtr.write_record([
            &result.address.to_string(),
            &result.port.to_string(),
            &result.reachable.to_string(),
            &result.response_time_ms.map_or(String::new(), |t| t.to_string()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_csv_rows() {
        let report = super::super::fixtures::report(true).await;
        let mut buf = Vec::new();
        write_csv(&mut buf, &report).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "address,port,reachable,response_time_ms");
        assert_eq!(lines[1], "192.168.1.0,22,false,");
        assert_eq!(lines[2], "192.168.1.1,22,true,4");
    }
}
