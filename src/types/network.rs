//! IPv4 network blocks in CIDR form.

use ipnetwork::Ipv4Network;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Error type for network block construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("invalid prefix length: /{0} (expected 0-32)")]
    InvalidPrefix(u8),
}

/// An IPv4 network: a canonical base address plus a prefix length.
///
/// The base address always equals itself once masked. Constructors accept any
/// host address inside the block and canonicalise it, the same way CIDR
/// parsing treats `192.168.1.17/24` as `192.168.1.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkBlock {
    base: Ipv4Addr,
    prefix: u8,
}

impl NetworkBlock {
    /// Build the block of `prefix` bits containing `addr`.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, NetworkError> {
        if prefix > 32 {
            return Err(NetworkError::InvalidPrefix(prefix));
        }
        let mask = prefix_to_mask(prefix);
        Ok(Self {
            base: Ipv4Addr::from(u32::from(addr) & mask),
            prefix,
        })
    }

    /// The canonical network address.
    #[inline]
    pub const fn base(&self) -> Ipv4Addr {
        self.base
    }

    #[inline]
    pub const fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The netmask, e.g. `255.255.255.0` for a /24.
    #[inline]
    pub fn mask(&self) -> Ipv4Addr {
        Ipv4Addr::from(prefix_to_mask(self.prefix))
    }

    /// Number of addresses in the block, network and broadcast included.
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix))
    }

    /// Whether `addr`, once masked, equals the base address.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & prefix_to_mask(self.prefix) == u32::from(self.base)
    }
}

/// Netmask for a prefix length in host byte order. `prefix` must be <= 32.
pub(crate) fn prefix_to_mask(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p)),
    }
}

impl From<Ipv4Network> for NetworkBlock {
    fn from(network: Ipv4Network) -> Self {
        let mask = prefix_to_mask(network.prefix());
        Self {
            base: Ipv4Addr::from(u32::from(network.ip()) & mask),
            prefix: network.prefix(),
        }
    }
}

impl FromStr for NetworkBlock {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.contains('/') {
            return Err(NetworkError::InvalidCidr(s.to_string()));
        }
        let network: Ipv4Network = s
            .parse()
            .map_err(|_| NetworkError::InvalidCidr(s.to_string()))?;
        Ok(network.into())
    }
}

impl fmt::Display for NetworkBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

impl Serialize for NetworkBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
