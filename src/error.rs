//! Error types for lanscan.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan run before any probe is launched.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("unable to detect the outbound IPv4 address: {0}")]
    OutboundDetection(String),

    #[error("unable to resolve the subnet to scan: {0}")]
    SubnetResolution(String),

    #[error(
        "last subnet address {expected} does not equal the last enumerated address {}",
        display_actual(.actual)
    )]
    RangeMismatch {
        expected: Ipv4Addr,
        actual: Option<Ipv4Addr>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_actual(actual: &Option<Ipv4Addr>) -> String {
    match actual {
        Some(addr) => addr.to_string(),
        None => "<none>".to_string(),
    }
}

/// Why a single connection attempt failed.
///
/// Never escalated past the prober; every variant becomes `reachable = false`.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connection timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("host unreachable")]
    HostUnreachable,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Errors raised while locating or reading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid setting: {0}")]
    InvalidValue(String),
}

/// Errors surfaced by the command-line driver.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for the command-line driver.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_mismatch_message() {
        let err = ScanError::RangeMismatch {
            expected: Ipv4Addr::new(10, 0, 0, 3),
            actual: Some(Ipv4Addr::new(10, 0, 0, 0)),
        };
        assert_eq!(
            err.to_string(),
            "last subnet address 10.0.0.3 does not equal the last enumerated address 10.0.0.0"
        );

        let empty = ScanError::RangeMismatch {
            expected: Ipv4Addr::new(10, 0, 0, 3),
            actual: None,
        };
        assert!(empty.to_string().ends_with("<none>"));
    }
}
