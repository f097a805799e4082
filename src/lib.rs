//! # lanscan - find hosts on the local subnet with a TCP port open
//!
//! lanscan works out the machine's outbound IPv4 address, picks the subnet
//! it belongs to (or one given by the operator), lists every address in that
//! subnet and tries a TCP connection to each of them concurrently.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use lanscan::scanner::{run_scan, ScanCoordinator, TcpConnectProber};
//! use lanscan::types::{NetworkBlock, Port};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let block: NetworkBlock = "192.168.1.0/24".parse().unwrap();
//!     let prober = Arc::new(TcpConnectProber::new(Duration::from_secs(2)));
//!     let coordinator = ScanCoordinator::new(prober);
//!
//!     let outcome = run_scan(&block, Port::new(22).unwrap(), &coordinator).await.unwrap();
//!     for host in outcome.reachable() {
//!         println!("{}", host);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Network blocks, ports and address arithmetic
//! - [`subnet`] - Outbound address detection, subnet selection, enumeration
//! - [`scanner`] - The TCP prober and the fan-out coordinator
//! - [`config`] - Settings file handling
//! - [`output`] - Reports in plain text, JSON and CSV
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod subnet;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ProbeError, ScanError};
pub use scanner::{ProbeResult, Prober, ScanCoordinator, ScanOutcome};
pub use types::{NetworkBlock, Port};
