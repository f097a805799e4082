//! TCP connect prober.
//!
//! Completes the TCP handshake with the operating system's socket API and
//! closes the connection straight away. No payload is sent or read: a
//! finished handshake is the whole signal.

use crate::error::ProbeError;
use crate::scanner::traits::{ProbeResult, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Probe timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// TCP connect prober.
///
/// Does not require elevated privileges.
pub struct TcpConnectProber {
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a prober whose connection attempts give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt to connect to the target address.
    async fn attempt_connect(&self, addr: SocketAddr) -> Result<TcpStream, ProbeError> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => {
                let error_str = e.to_string().to_lowercase();
                if error_str.contains("refused") {
                    Err(ProbeError::ConnectionRefused)
                } else if error_str.contains("unreachable") {
                    if error_str.contains("host") {
                        Err(ProbeError::HostUnreachable)
                    } else {
                        Err(ProbeError::NetworkUnreachable(e.to_string()))
                    }
                } else {
                    Err(ProbeError::ConnectionFailed(e.to_string()))
                }
            }
            Err(_) => Err(ProbeError::Timeout),
        }
    }
}

impl Default for TcpConnectProber {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, address: Ipv4Addr, port: Port) -> ProbeResult {
        let addr = SocketAddr::from((address, port.as_u16()));
        let start = Instant::now();

        match self.attempt_connect(addr).await {
            Ok(stream) => {
                let response_time = start.elapsed().as_millis() as u64;
                drop(stream);
                debug!(%addr, response_time, "connection established");
                ProbeResult::reachable(address, port).with_response_time(response_time)
            }
            Err(e) => {
                debug!(%addr, reason = %e, "probe failed");
                ProbeResult::unreachable(address, port)
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
