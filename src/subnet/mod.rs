//! Subnet selection and address enumeration.

mod range;
mod route;

pub use range::{enumerate, MAX_SCAN_ADDRESSES};
pub use route::{
    host_network, local_interface_addresses, outbound_ipv4, resolve_subnet, InterfaceAddress,
    SubnetOverride,
};
