//! Port newtype with validation.
//!
//! The `Port` newtype ensures values are always valid connection targets
//! (1-65535); port 0 cannot be dialled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated TCP port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Port probed when none is configured (SSH).
    pub const DEFAULT_TARGET: Port = Port(22);

    /// Create a new Port from a u16, returning None for 0.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port == 0 {
            None
        } else {
            Some(Self(port))
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::Zero)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s
            .trim()
            .parse()
            .map_err(|_| PortError::InvalidFormat(s.to_string()))?;
        Self::try_from(value)
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port 0 cannot be probed")]
    Zero,
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert_eq!(Port::new(22).map(Port::as_u16), Some(22));
        assert_eq!(Port::new(65535).map(Port::as_u16), Some(65535));
    }

    #[test]
    fn test_port_parse() {
        assert_eq!("8080".parse::<Port>().unwrap().as_u16(), 8080);
        assert_eq!("0".parse::<Port>(), Err(PortError::Zero));
        assert!(matches!(
            "70000".parse::<Port>(),
            Err(PortError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_port_serde() {
        let port: Port = serde_json::from_str("443").unwrap();
        assert_eq!(port.as_u16(), 443);
        assert!(serde_json::from_str::<Port>("0").is_err());
        assert_eq!(serde_json::to_string(&port).unwrap(), "443");
    }
}
