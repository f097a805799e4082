//! Prober trait abstraction.
//!
//! Defines the seam between the scan coordinator and the mechanism that
//! checks a single host, so the coordinator can be driven by a fake in tests.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Outcome of probing one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The address that was probed.
    pub address: Ipv4Addr,
    /// The port that was probed.
    pub port: Port,
    /// Whether a connection was established within the timeout.
    pub reachable: bool,
    /// Time to establish the connection, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl ProbeResult {
    /// A host that accepted the connection.
    pub fn reachable(address: Ipv4Addr, port: Port) -> Self {
        Self {
            address,
            port,
            reachable: true,
            response_time_ms: None,
        }
    }

    /// A host that did not accept the connection, for whatever reason.
    pub fn unreachable(address: Ipv4Addr, port: Port) -> Self {
        Self {
            address,
            port,
            reachable: false,
            response_time_ms: None,
        }
    }

    /// Set the response time.
    pub fn with_response_time(mut self, time_ms: u64) -> Self {
        self.response_time_ms = Some(time_ms);
        self
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.reachable { "open" } else { "closed" };
        write!(f, "{}:{} {}", self.address, self.port, state)
    }
}

/// Trait for single-host reachability checks.
///
/// Implementations never fail: every error on the way to a connection is
/// folded into `reachable = false`.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one address on one port.
    async fn probe(&self, address: Ipv4Addr, port: Port) -> ProbeResult;

    /// Upper bound on how long a single probe may take.
    fn timeout(&self) -> Duration;
}
