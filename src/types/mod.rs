//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep network blocks canonical and ports dialable, so the
//! enumerator and the prober never see an invalid input.

pub mod address;
mod network;
mod port;

pub use address::{first_address, last_address, successor};
pub use network::{NetworkBlock, NetworkError};
pub use port::{Port, PortError};
