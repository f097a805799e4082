//! Command-line interface definitions for lanscan.
//!
//! Uses `clap` derive macros for declarative argument parsing. Every scan
//! option is optional on the command line so the settings file can supply it.

mod scan;

pub use scan::ScanOptions;

use crate::types::Port;
use clap::Parser;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// lanscan - find hosts on the local subnet that accept TCP connections.
///
/// The subnet defaults to the one configured on the interface that routes
/// toward `--remote`; `--subnet` replaces it with a suffix (`/24`) or a
/// full CIDR block (`10.0.0.0/24`).
#[derive(Parser, Debug)]
#[command(name = "lanscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find hosts on the local subnet with a TCP port open", long_about = None)]
pub struct Cli {
    /// Remote address used to detect the outbound interface (never scanned)
    #[arg(short, long, value_name = "IP")]
    pub remote: Option<Ipv4Addr>,

    /// Port paired with --remote when detecting the outbound interface
    #[arg(long, value_name = "PORT")]
    pub remote_port: Option<u16>,

    /// Subnet to search: a suffix such as "/30" or a block such as "10.0.0.0/24"
    #[arg(short, long, value_name = "CIDR")]
    pub subnet: Option<String>,

    /// Port to check on every host [default: 22]
    #[arg(short, long)]
    pub port: Option<Port>,

    /// Connection timeout in milliseconds [default: 2000]
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Maximum number of probes in flight, 0 for one per host [default: 0]
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Output format for results [default: plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Also list hosts that did not answer
    #[arg(long)]
    pub show_all: bool,

    /// Enable verbose output (debug logs and a progress bar)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
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
