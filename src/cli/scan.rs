//! The scan run: resolve the subnet, enumerate it, probe it, report.

use crate::cli::{Cli, OutputFormat};
use crate::config::AppSettings;
use crate::error::{CliResult, ConfigError, ScanError};
use crate::output::{self, ScanReport};
use crate::scanner::{ScanCoordinator, ScanPhase, TcpConnectProber};
use crate::subnet::{self, SubnetOverride};
use crate::types::{first_address, last_address, Port};
use chrono::Utc;
use clap::ValueEnum;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Above this many hosts an uncapped scan opens a lot of sockets at once.
const LARGE_FAN_OUT: usize = 4096;

/// Scan options after merging command-line flags over settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub remote: SocketAddr,
    pub subnet: Option<SubnetOverride>,
    pub port: Port,
    pub timeout: Duration,
    pub concurrency: usize,
    pub output: OutputFormat,
    pub show_all: bool,
}

impl ScanOptions {
    /// Flags win over settings; settings win over built-in defaults.
    pub fn merge(cli: &Cli, settings: &AppSettings) -> CliResult<Self> {
        let remote = cli.remote.unwrap_or(settings.remote);
        let remote_port = cli.remote_port.unwrap_or(settings.remote_port);

        let subnet = cli
            .subnet
            .as_deref()
            .map(str::parse::<SubnetOverride>)
            .transpose()?;

        let timeout_ms = cli.timeout.unwrap_or(settings.timeout_ms);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("timeout must be greater than 0".to_string()).into());
        }

        let output = match cli.output {
            Some(format) => format,
            None => OutputFormat::from_str(&settings.output_format, true).map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "unknown output format '{}'",
                    settings.output_format
                ))
            })?,
        };

        Ok(Self {
            remote: SocketAddr::from((remote, remote_port)),
            subnet,
            port: cli.port.unwrap_or(settings.port),
            timeout: Duration::from_millis(timeout_ms),
            concurrency: cli.concurrency.unwrap_or(settings.concurrency),
            output,
            show_all: cli.show_all || settings.show_all,
        })
    }
}

impl Cli {
    /// Load settings and run one scan.
    pub async fn execute(&self) -> CliResult<()> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };
        let options = ScanOptions::merge(self, &settings)?;
        debug!(?options, "scan options");

        run(&options, self.verbose, self.quiet).await
    }
}

async fn run(options: &ScanOptions, verbose: bool, quiet: bool) -> CliResult<()> {
    let chatty = !quiet && options.output == OutputFormat::Plain;

    let outbound = subnet::outbound_ipv4(options.remote).await?;
    info!(%outbound, remote = %options.remote, "detected outbound address");

    let interfaces = match options.subnet {
        Some(_) => Vec::new(),
        None => subnet::local_interface_addresses(),
    };
    let block = subnet::resolve_subnet(outbound, options.subnet, &interfaces)?;

    info!(phase = %ScanPhase::Enumerating, %block, "enumerating subnet");
    let addresses = subnet::enumerate(&block)?;
    let (first, last) = match (addresses.first(), addresses.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => {
            return Err(ScanError::RangeMismatch {
                expected: last_address(&block),
                actual: None,
            }
            .into())
        }
    };

    if chatty {
        output::print_scan_header(outbound, &block, options.port, addresses.len());
        output::print_membership(&block, "first", first_address(&block));
        output::print_membership(&block, "last", last_address(&block));
        output::print_info(&format!("scanning {} to {}", first, last));
        if options.concurrency == 0 && addresses.len() > LARGE_FAN_OUT {
            output::print_warning(&format!(
                "{} probes will run at once; consider --concurrency",
                addresses.len()
            ));
        }
    }

    let prober = Arc::new(TcpConnectProber::new(options.timeout));
    let mut coordinator = ScanCoordinator::new(prober).with_concurrency(options.concurrency);
    if verbose && chatty {
        coordinator = coordinator.with_progress();
    }

    let started_at = Utc::now();
    let outcome = coordinator.scan(&addresses, options.port).await;

    let report = ScanReport::new(
        outbound,
        block,
        options.port,
        options.timeout,
        started_at,
        outcome,
        options.show_all,
    );
    output::print_results(&report, options.output)?;

    Ok(())
}
