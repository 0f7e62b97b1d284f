//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] for representing a subnet CIDR block, along with the
//! mask arithmetic needed to check gateway placement.

use std::net::Ipv4Addr;
use thiserror::Error;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Errors produced while parsing or manipulating CIDR blocks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CidrError {
    #[error("invalid CIDR format: {0}")]
    Format(String),
    #[error("invalid address: {0}")]
    Address(String),
    #[error("network length is too long: {0}")]
    Length(u8),
}

/// Convert a CIDR prefix length to a subnet mask as u32.
pub fn get_cidr_mask(len: u8) -> Result<u32, CidrError> {
    if len > MAX_LENGTH {
        Err(CidrError::Length(len))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, CidrError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, CidrError> {
    let mask = get_cidr_mask(len)?;
    let network_bits = u32::from(addr) & mask;
    Ok(Ipv4Addr::from(network_bits | !mask))
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, CidrError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| CidrError::Format(addr_cidr.to_string()))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| CidrError::Address(addr.to_string()))?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| CidrError::Format(addr_cidr.to_string()))?;
        if mask > MAX_LENGTH {
            return Err(CidrError::Length(mask));
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Lowest (network) address in the block.
    pub fn lo(&self) -> Ipv4Addr {
        // mask is bounded by MAX_LENGTH on every constructor
        cut_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// Highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// True when `addr` falls inside this block, network and broadcast included.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.lo() <= addr && addr <= self.hi()
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
