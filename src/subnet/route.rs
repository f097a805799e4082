//! Working out which subnet to scan.
//!
//! The outbound address is learned from the routing table by "connecting" a
//! UDP socket toward a remote address; nothing is sent. The prefix length
//! comes from the local interface that owns that address, unless the
//! operator overrides it.

use crate::error::{ScanError, ScanResult};
use crate::types::NetworkBlock;
use pnet::datalink;
use pnet::ipnetwork::IpNetwork;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tokio::net::UdpSocket;
use tracing::debug;

/// An IPv4 address configured on a local interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    /// Interface name (e.g., "eth0", "en0").
    pub name: String,
    pub addr: Ipv4Addr,
    pub prefix: u8,
}

/// Operator-supplied replacement for the interface's own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetOverride {
    /// A bare suffix such as `/24`, applied to the outbound address.
    Suffix(u8),
    /// A complete block such as `10.0.0.0/24`.
    Cidr(NetworkBlock),
}

impl FromStr for SubnetOverride {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ScanError::SubnetResolution(format!("invalid subnet override '{}'", s));

        if let Some(suffix) = s.strip_prefix('/') {
            let prefix: u8 = suffix.parse().map_err(|_| invalid())?;
            if prefix > 32 {
                return Err(invalid());
            }
            return Ok(Self::Suffix(prefix));
        }

        s.parse::<NetworkBlock>()
            .map(Self::Cidr)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for SubnetOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suffix(prefix) => write!(f, "/{}", prefix),
            Self::Cidr(block) => write!(f, "{}", block),
        }
    }
}

/// Discover the local IPv4 address used to reach `remote`.
pub async fn outbound_ipv4(remote: SocketAddr) -> ScanResult<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| ScanError::OutboundDetection(e.to_string()))?;
    socket
        .connect(remote)
        .await
        .map_err(|e| ScanError::OutboundDetection(format!("route to {}: {}", remote, e)))?;

    match socket.local_addr()?.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => Ok(ip),
        other => Err(ScanError::OutboundDetection(format!(
            "local address {} is not a usable IPv4 address",
            other
        ))),
    }
}

/// All IPv4 addresses configured on local interfaces.
pub fn local_interface_addresses() -> Vec<InterfaceAddress> {
    datalink::interfaces()
        .into_iter()
        .flat_map(|iface| {
            let name = iface.name;
            iface
                .ips
                .into_iter()
                .filter_map(move |net| match net {
                    IpNetwork::V4(v4) => Some(InterfaceAddress {
                        name: name.clone(),
                        addr: v4.ip(),
                        prefix: v4.prefix(),
                    }),
                    IpNetwork::V6(_) => None,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// The block configured on the interface that owns `outbound`.
///
/// Matches the address exactly, so 10.0.0.1 never picks up 10.0.0.12.
pub fn host_network(outbound: Ipv4Addr, interfaces: &[InterfaceAddress]) -> ScanResult<NetworkBlock> {
    let owner = interfaces
        .iter()
        .find(|candidate| candidate.addr == outbound)
        .ok_or_else(|| {
            ScanError::SubnetResolution(format!("no local interface has address {}", outbound))
        })?;

    debug!(interface = %owner.name, "outbound address {}/{}", owner.addr, owner.prefix);

    NetworkBlock::new(owner.addr, owner.prefix)
        .map_err(|e| ScanError::SubnetResolution(e.to_string()))
}

/// Pick the block to scan: the override when given, otherwise the
/// interface's own configuration.
pub fn resolve_subnet(
    outbound: Ipv4Addr,
    subnet: Option<SubnetOverride>,
    interfaces: &[InterfaceAddress],
) -> ScanResult<NetworkBlock> {
    match subnet {
        Some(SubnetOverride::Suffix(prefix)) => NetworkBlock::new(outbound, prefix)
            .map_err(|e| ScanError::SubnetResolution(e.to_string())),
        Some(SubnetOverride::Cidr(block)) => Ok(block),
        None => host_network(outbound, interfaces),
    }
}
