//! IPv4 address arithmetic over network blocks.
//!
//! Addresses are `Ipv4Addr` values, which are `Copy`: every operation here
//! returns a fresh address instead of mutating its input.

use super::NetworkBlock;
use std::net::Ipv4Addr;

/// First address of the block: the base address ANDed with the mask, per byte.
pub fn first_address(block: &NetworkBlock) -> Ipv4Addr {
    let base = block.base().octets();
    let mask = block.mask().octets();
    let mut first = [0u8; 4];
    for i in 0..4 {
        first[i] = base[i] & mask[i];
    }
    Ipv4Addr::from(first)
}

/// Last (broadcast) address of the block: the base address ORed with the
/// inverted mask, per byte.
pub fn last_address(block: &NetworkBlock) -> Ipv4Addr {
    let base = block.base().octets();
    let mask = block.mask().octets();
    let mut last = [0u8; 4];
    for i in 0..4 {
        last[i] = base[i] | !mask[i];
    }
    Ipv4Addr::from(last)
}

/// The next address, treating the four octets as a big-endian counter.
///
/// The carry runs from octet 3 toward octet 0. Incrementing
/// `255.255.255.255` is outside the contract of this function; it wraps to
/// `0.0.0.0` and callers must not depend on that.
pub fn successor(addr: Ipv4Addr) -> Ipv4Addr {
    let mut octets = addr.octets();
    for i in (0..4).rev() {
        if octets[i] < u8::MAX {
            octets[i] += 1;
            break;
        }
        octets[i] = 0;
    }
    Ipv4Addr::from(octets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(s: &str) -> NetworkBlock {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_and_last_of_slash_30() {
        let b = block("192.168.1.0/30");
        assert_eq!(first_address(&b), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(last_address(&b), Ipv4Addr::new(192, 168, 1, 3));
    }

    #[test]
    fn test_first_and_last_of_host_block() {
        let b = block("10.0.0.5/32");
        assert_eq!(first_address(&b), Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(last_address(&b), Ipv4Addr::new(10, 0, 0, 5));
    }

    #[test]
    fn test_first_and_last_across_octets() {
        let b = block("172.16.0.0/12");
        assert_eq!(first_address(&b), Ipv4Addr::new(172, 16, 0, 0));
        assert_eq!(last_address(&b), Ipv4Addr::new(172, 31, 255, 255));
    }

    #[test]
    fn test_successor_within_octet() {
        let mut addr = Ipv4Addr::new(10, 1, 2, 0);
        for _ in 0..255 {
            addr = successor(addr);
        }
        assert_eq!(addr, Ipv4Addr::new(10, 1, 2, 255));
        assert_eq!(successor(addr), Ipv4Addr::new(10, 1, 3, 0));
    }

    #[test]
    fn test_successor_carries_through_every_octet() {
        assert_eq!(
            successor(Ipv4Addr::new(10, 255, 255, 255)),
            Ipv4Addr::new(11, 0, 0, 0)
        );
        assert_eq!(
            successor(Ipv4Addr::new(192, 168, 255, 255)),
            Ipv4Addr::new(192, 169, 0, 0)
        );
    }

    #[test]
    fn test_successor_near_top_of_space() {
        assert_eq!(
            successor(Ipv4Addr::new(255, 255, 255, 254)),
            Ipv4Addr::new(255, 255, 255, 255)
        );
    }

    #[test]
    fn test_successor_leaves_input_untouched() {
        let addr = Ipv4Addr::new(10, 0, 0, 1);
        let next = successor(addr);
        assert_eq!(addr, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(next, Ipv4Addr::new(10, 0, 0, 2));
    }
}
