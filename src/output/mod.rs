//! Output formatting module.
//!
//! Turns a finished scan into a [`ScanReport`] and renders it as plain text,
//! JSON, or CSV. Plain text also carries the progress lines printed while a
//! run is being set up.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{
    print_error, print_info, print_membership, print_scan_header, print_warning, write_plain,
};

use crate::cli::OutputFormat;
use crate::scanner::{ProbeResult, ScanOutcome};
use crate::types::{NetworkBlock, Port};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Everything the reporters need to describe one run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub outbound_ip: Ipv4Addr,
    pub network: NetworkBlock,
    pub port: Port,
    pub timeout_ms: u64,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub hosts_scanned: usize,
    pub hosts_reachable: usize,
    /// Reachable hosts only, unless the report was built with `show_all`.
    pub results: Vec<ProbeResult>,
}

impl ScanReport {
    pub fn new(
        outbound_ip: Ipv4Addr,
        network: NetworkBlock,
        port: Port,
        timeout: Duration,
        started_at: DateTime<Utc>,
        outcome: ScanOutcome,
        show_all: bool,
    ) -> Self {
        let hosts_scanned = outcome.len();
        let hosts_reachable = outcome.reachable_count();
        let duration_ms = outcome.duration().as_millis() as u64;
        let results = outcome
            .into_results()
            .into_iter()
            .filter(|r| show_all || r.reachable)
            .collect();

        Self {
            outbound_ip,
            network,
            port,
            timeout_ms: timeout.as_millis() as u64,
            started_at,
            duration_ms,
            hosts_scanned,
            hosts_reachable,
            results,
        }
    }
}

/// Render a report to `out` in the requested format.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, report),
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, report),
    }
}

/// Format and print a report on stdout.
pub fn print_results(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format)?;
    out.flush()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::scanner::{Prober, ScanCoordinator};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Hosts .1 and .3 answer; the rest do not.
    struct OddHosts;

    #[async_trait]
    impl Prober for OddHosts {
        async fn probe(&self, address: Ipv4Addr, port: Port) -> ProbeResult {
            if matches!(address.octets()[3], 1 | 3) {
                ProbeResult::reachable(address, port).with_response_time(4)
            } else {
                ProbeResult::unreachable(address, port)
            }
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(10)
        }
    }

    pub(crate) async fn report(show_all: bool) -> ScanReport {
        let network: NetworkBlock = "192.168.1.0/29".parse().unwrap();
        let port = Port::new(22).unwrap();
        let addresses = crate::subnet::enumerate(&network).unwrap();
        let outcome = ScanCoordinator::new(Arc::new(OddHosts))
            .scan(&addresses, port)
            .await;

        ScanReport::new(
            Ipv4Addr::new(192, 168, 1, 5),
            network,
            port,
            Duration::from_secs(2),
            Utc::now(),
            outcome,
            show_all,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_report_keeps_only_reachable_hosts() {
        let report = fixtures::report(false).await;
        assert_eq!(report.hosts_scanned, 8);
        assert_eq!(report.hosts_reachable, 2);
        let addresses: Vec<_> = report.results.iter().map(|r| r.address).collect();
        assert_eq!(
            addresses,
            vec![Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 3)]
        );
        assert_eq!(report.timeout_ms, 2000);
    }

    #[tokio::test]
    async fn test_report_show_all() {
        let report = fixtures::report(true).await;
        assert_eq!(report.results.len(), 8);
        assert_eq!(report.hosts_reachable, 2);
    }
}
