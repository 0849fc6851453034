//! IP addresses of either family as fixed-width bit vectors.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AddressError;

/// IPv4 or IPv6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressFamily {
    /// 32-bit addresses.
    V4,
    /// 128-bit addresses.
    V6,
}

impl AddressFamily {
    /// Number of bits in an address of this family.
    pub const fn width(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }

    /// Bit pattern with every address bit of this family set.
    pub const fn all_ones(self) -> u128 {
        match self {
            Self::V4 => u32::MAX as u128,
            Self::V6 => u128::MAX,
        }
    }

    /// Network mask with the high `length` bits set.
    ///
    /// `length` must not exceed [`width`](Self::width); callers validate.
    pub const fn network_mask(self, length: u8) -> u128 {
        if length == 0 {
            0
        } else {
            (self.all_ones() << (self.width() - length)) & self.all_ones()
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// A single IP address.
///
/// Stored as the family tag plus the address bits right-aligned in a
/// `u128`, so bit arithmetic is identical for both families. Ordering
/// places every IPv4 address before every IPv6 address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ip {
    family: AddressFamily,
    bits: u128,
}

impl Ip {
    /// The IPv4 address with the given bits.
    pub const fn v4(bits: u32) -> Self {
        Self {
            family: AddressFamily::V4,
            bits: bits as u128,
        }
    }

    /// The IPv6 address with the given bits.
    pub const fn v6(bits: u128) -> Self {
        Self {
            family: AddressFamily::V6,
            bits,
        }
    }

    /// The IPv4 address `a.b.c.d`.
    pub const fn from_octets(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self::v4(u32::from_be_bytes([a, b, c, d]))
    }

    /// Build an address of `family` from raw bits, discarding bits
    /// beyond the family width.
    pub const fn from_bits(family: AddressFamily, bits: u128) -> Self {
        Self {
            family,
            bits: bits & family.all_ones(),
        }
    }

    /// Address family.
    pub const fn family(self) -> AddressFamily {
        self.family
    }

    /// Raw address bits, right-aligned.
    pub const fn bits(self) -> u128 {
        self.bits
    }

    /// Whether this is an IPv4 address.
    pub const fn is_v4(self) -> bool {
        matches!(self.family, AddressFamily::V4)
    }

    /// The bit at `position`, counting from the most significant bit
    /// (position 0) of the address.
    ///
    /// Positions at or beyond the family width read as `false`.
    pub const fn bit_at(self, position: u8) -> bool {
        let width = self.family.width();
        if position >= width {
            return false;
        }
        (self.bits >> (width - 1 - position)) & 1 == 1
    }

    /// This address with every bit past the first `length` cleared.
    pub const fn masked(self, length: u8) -> Self {
        Self {
            family: self.family,
            bits: self.bits & self.family.network_mask(length),
        }
    }
}

impl From<Ipv4Addr> for Ip {
    fn from(addr: Ipv4Addr) -> Self {
        Self::v4(u32::from(addr))
    }
}

impl From<Ipv6Addr> for Ip {
    fn from(addr: Ipv6Addr) -> Self {
        Self::v6(u128::from(addr))
    }
}

impl From<IpAddr> for Ip {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<Ip> for IpAddr {
    fn from(ip: Ip) -> Self {
        match ip.family {
            AddressFamily::V4 => IpAddr::V4(Ipv4Addr::from(ip.bits as u32)),
            AddressFamily::V6 => IpAddr::V6(Ipv6Addr::from(ip.bits)),
        }
    }
}

impl FromStr for Ip {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpAddr::from_str(s.trim())
            .map(Ip::from)
            .map_err(|_| AddressError::Parse {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for Ip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", IpAddr::from(*self))
    }
}

impl fmt::Debug for Ip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Serialize for Ip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
