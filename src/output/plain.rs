//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::ScanReport;
use crate::types::NetworkBlock;
use console::{style, Style};
use std::io::{self, Write};
use std::net::Ipv4Addr;

const RULE: &str = "───────────────────────────────────────────────";

/// Write the report in human-readable form.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} {} hosts on port {} in {:.2}s",
        style("Searched").bold(),
        report.hosts_scanned,
        report.port,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "  {} {} reachable",
        style("Found").bold(),
        style(report.hosts_reachable).green().bold()
    )?;
    writeln!(out)?;

    if report.results.is_empty() {
        writeln!(out, "  {}", style("No hosts to display.").dim())?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "  {}", style(RULE).dim())?;
    writeln!(
        out,
        "  {:<16}  {:>6}  {:^8}  {:>8}",
        style("ADDRESS").bold(),
        style("PORT").bold(),
        style("STATE").bold(),
        style("RTT").bold()
    )?;
    writeln!(out, "  {}", style(RULE).dim())?;

    for result in &report.results {
        let (state, state_style) = if result.reachable {
            ("open", Style::new().green().bold())
        } else {
            ("closed", Style::new().red())
        };
        let rtt = result
            .response_time_ms
            .map(|t| format!("{}ms", t))
            .unwrap_or_default();

        writeln!(
            out,
            "  {:<16}  {:>6}  {:^8}  {:>8}",
            result.address.to_string(),
            result.port,
            state_style.apply_to(state),
            style(rtt).dim()
        )?;
    }

    writeln!(out, "  {}", style(RULE).dim())?;
    writeln!(out)?;
    Ok(())
}

/// Print the run header once the subnet is known.
pub fn print_scan_header(outbound: Ipv4Addr, network: &NetworkBlock, port: impl std::fmt::Display, hosts: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("lanscan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Current outbound IP address: {}",
        style("•").dim(),
        style(outbound).white().bold()
    );
    println!(
        "{} Searching subnet {} for hosts on port {}",
        style("•").dim(),
        style(network).yellow(),
        style(port).white().bold()
    );
    println!(
        "{} {} has {} addresses",
        style("•").dim(),
        network,
        style(hosts).white().bold()
    );
}

/// Print whether `addr` falls inside `network`.
pub fn print_membership(network: &NetworkBlock, label: &str, addr: Ipv4Addr) {
    let verdict = if network.contains(addr) {
        style("yes").green()
    } else {
        style("no").red()
    };
    println!(
        "{} {} address {} in {}: {}",
        style("•").dim(),
        label,
        addr,
        network,
        verdict
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_lists_reachable_hosts() {
        let report = super::super::fixtures::report(false).await;
        let mut buf = Vec::new();
        write_plain(&mut buf, &report).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("192.168.1.1 "));
        assert!(text.contains("192.168.1.3 "));
        assert!(!text.contains("192.168.1.2 "));
        assert!(text.contains("open"));
    }

    #[tokio::test]
    async fn test_plain_without_hosts() {
        let mut report = super::super::fixtures::report(false).await;
        report.results.clear();
        let mut buf = Vec::new();
        write_plain(&mut buf, &report).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("No hosts to display."));
    }
}
