//! IPv4 network prefixes and the address membership test
//!
//! Prefixes are parsed from CIDR text (`192.168.0.0/16`); a bare address is
//! treated as a `/32` host route. Host bits below the prefix length are kept
//! as written but ignored by [`Ipv4Network::contains`].
//!
//! ```
//! use geoipmap::network::{parse_address, Ipv4Network};
//!
//! let net: Ipv4Network = "10.0.0.0/8".parse()?;
//! assert!(net.contains(parse_address("10.20.30.40").unwrap()));
//! assert!(parse_address("not-an-ip").is_none());
//! # Ok::<(), geoipmap::GeoIpMapError>(())
//! ```

use crate::error::GeoIpMapError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// An IPv4 network in CIDR notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Network {
    addr: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Network {
    /// Create a network from a base address and prefix length (0-32)
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, GeoIpMapError> {
        if prefix_len > 32 {
            return Err(GeoIpMapError::InvalidNetwork(format!(
                "prefix length {} exceeds 32",
                prefix_len
            )));
        }
        Ok(Self { addr, prefix_len })
    }

    /// Address as written, host bits included
    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// Prefix length in bits
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Netmask as a 32-bit value
    pub fn mask(&self) -> u32 {
        // Shifting a u32 by 32 overflows, so /0 is special-cased
        if self.prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - self.prefix_len)
        }
    }

    /// Network address with host bits cleared
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(ipv4_to_bits(self.addr) & self.mask())
    }

    /// True if `addr` falls inside this prefix
    #[inline]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let mask = self.mask();
        ipv4_to_bits(addr) & mask == ipv4_to_bits(self.addr) & mask
    }
}

/// Decimal prefix length with no sign and no leading zeros
fn parse_prefix_len(p: &str) -> Option<u8> {
    let canonical = !p.is_empty()
        && p.bytes().all(|b| b.is_ascii_digit())
        && (p == "0" || !p.starts_with('0'));
    if canonical {
        p.parse().ok()
    } else {
        None
    }
}

impl FromStr for Ipv4Network {
    type Err = GeoIpMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_str, prefix_str) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let addr = match addr_str.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => addr,
            Ok(IpAddr::V6(_)) => {
                return Err(GeoIpMapError::InvalidNetwork(format!(
                    "'{}' is an IPv6 network; only IPv4 is supported",
                    s
                )))
            }
            Err(_) => {
                return Err(GeoIpMapError::InvalidNetwork(format!(
                    "'{}' is not an IPv4 address",
                    addr_str
                )))
            }
        };

        let prefix_len = match prefix_str {
            None => 32,
            Some(p) => parse_prefix_len(p).ok_or_else(|| {
                GeoIpMapError::InvalidNetwork(format!("'{}' is not a valid prefix length", p))
            })?,
        };

        Self::new(addr, prefix_len)
    }
}

impl fmt::Display for Ipv4Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

/// Parse a raw address list entry as a strict dotted-quad IPv4 address
///
/// Returns `None` for anything else (blank lines, hostnames, IPv6, octets out
/// of range). Callers treat `None` as "never matches".
#[inline]
pub fn parse_address(entry: &str) -> Option<Ipv4Addr> {
    entry.trim().parse::<Ipv4Addr>().ok()
}

#[inline]
fn ipv4_to_bits(addr: Ipv4Addr) -> u32 {
    u32::from(addr)
}
