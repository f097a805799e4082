//! Ordered enumeration of every address in a network block.

use crate::error::{ScanError, ScanResult};
use crate::types::{first_address, last_address, successor, NetworkBlock};
use std::net::Ipv4Addr;

/// Largest block the scanner will enumerate (a /16).
pub const MAX_SCAN_ADDRESSES: u64 = 65_536;

/// List every address of `block`, first to last inclusive.
///
/// The network and broadcast addresses are part of the sequence. The result
/// is checked against the independently computed last address and a
/// disagreement is reported as [`ScanError::RangeMismatch`].
pub fn enumerate(block: &NetworkBlock) -> ScanResult<Vec<Ipv4Addr>> {
    if block.size() > MAX_SCAN_ADDRESSES {
        return Err(ScanError::SubnetResolution(format!(
            "{} has {} addresses, more than the {} a scan allows",
            block,
            block.size(),
            MAX_SCAN_ADDRESSES
        )));
    }

    walk(
        first_address(block),
        last_address(block),
        block.base(),
        block.mask(),
        block.size() as usize,
    )
}

/// Walk from `first` while `cursor & mask == base`, then verify the final
/// element against `last`.
fn walk(
    first: Ipv4Addr,
    last: Ipv4Addr,
    base: Ipv4Addr,
    mask: Ipv4Addr,
    capacity: usize,
) -> ScanResult<Vec<Ipv4Addr>> {
    let base = u32::from(base);
    let mask = u32::from(mask);
    let contains = |addr: Ipv4Addr| u32::from(addr) & mask == base;

    let mut addresses = Vec::with_capacity(capacity);
    let mut cursor = first;
    while contains(cursor) {
        addresses.push(cursor);
        if cursor == Ipv4Addr::BROADCAST {
            break;
        }
        cursor = successor(cursor);
    }

    let tail = addresses.last().copied();
    if tail == Some(last) {
        Ok(addresses)
    } else {
        Err(ScanError::RangeMismatch {
            expected: last,
            actual: tail,
        })
    }
}
