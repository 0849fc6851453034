//! Canonical IP prefixes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AddressError;
use crate::ip::{AddressFamily, Ip};

/// An IP prefix: every address whose first `length` bits equal those
/// of `network`.
///
/// Always stored in canonical form: bits of `network` past `length`
/// are zeroed at construction, so `10.1.2.3/8` and `10.0.0.0/8` are
/// the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix {
    network: Ip,
    length: u8,
}

impl Prefix {
    /// Build a prefix, canonicalizing the network address.
    pub fn new(ip: Ip, length: u8) -> Result<Self, AddressError> {
        let max = ip.family().width();
        if length > max {
            return Err(AddressError::InvalidPrefixLength { length, max });
        }
        Ok(Self {
            network: ip.masked(length),
            length,
        })
    }

    /// The single-address prefix (`/32` or `/128`) for `ip`.
    pub const fn host(ip: Ip) -> Self {
        Self {
            network: ip,
            length: ip.family().width(),
        }
    }

    /// The zero-length prefix covering the whole family.
    pub const fn zero(family: AddressFamily) -> Self {
        Self {
            network: Ip::from_bits(family, 0),
            length: 0,
        }
    }

    /// Canonical network address.
    pub const fn network(self) -> Ip {
        self.network
    }

    /// Prefix length in bits.
    pub const fn length(self) -> u8 {
        self.length
    }

    /// Address family.
    pub const fn family(self) -> AddressFamily {
        self.network.family()
    }

    /// Whether this prefix covers a single address.
    pub const fn is_host(self) -> bool {
        self.length == self.family().width()
    }

    /// Highest address in the prefix.
    pub fn end_ip(self) -> Ip {
        let family = self.family();
        let host_bits = !family.network_mask(self.length) & family.all_ones();
        Ip::from_bits(family, self.network.bits() | host_bits)
    }

    /// Whether `ip` falls inside this prefix.
    pub fn contains_ip(self, ip: Ip) -> bool {
        ip.family() == self.family() && ip.masked(self.length) == self.network
    }

    /// Whether every address of `other` is also in this prefix.
    pub fn contains_prefix(self, other: Prefix) -> bool {
        other.family() == self.family()
            && self.length <= other.length
            && other.network.masked(self.length) == self.network
    }

    /// Whether the two prefixes share at least one address.
    pub fn overlaps(self, other: Prefix) -> bool {
        self.contains_prefix(other) || other.contains_prefix(self)
    }

    /// The one-bit-longer sub-prefix selected by `bit`, or `None` for a
    /// host prefix.
    pub fn child(self, bit: bool) -> Option<Prefix> {
        if self.is_host() {
            return None;
        }
        let family = self.family();
        let mut bits = self.network.bits();
        if bit {
            bits |= 1u128 << (family.width() - 1 - self.length);
        }
        Some(Self {
            network: Ip::from_bits(family, bits),
            length: self.length + 1,
        })
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.length)
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for Prefix {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || AddressError::Parse {
            input: s.to_string(),
        };
        let (addr, len) = s.trim().split_once('/').ok_or_else(parse_err)?;
        let ip: Ip = addr.parse().map_err(|_| parse_err())?;
        let length: u8 = len.parse().map_err(|_| parse_err())?;
        Prefix::new(ip, length)
    }
}

impl From<Ip> for Prefix {
    fn from(ip: Ip) -> Self {
        Prefix::host(ip)
    }
}

impl Serialize for Prefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Prefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    #[test]
    fn canonicalizes_network() {
        assert_eq!(p("10.1.2.3/8"), p("10.0.0.0/8"));
        assert_eq!(p("10.1.2.3/8").network(), Ip::from_octets(10, 0, 0, 0));
    }

    #[test]
    fn rejects_oversized_length() {
        let err = Prefix::new(Ip::from_octets(1, 1, 1, 1), 33).unwrap_err();
        assert_eq!(err, AddressError::InvalidPrefixLength { length: 33, max: 32 });
        assert!("1.1.1.1/40".parse::<Prefix>().is_err());
        assert!("1.1.1.1".parse::<Prefix>().is_err());
    }

    #[test]
    fn containment() {
        let p16 = p("1.1.0.0/16");
        let p24 = p("1.1.1.0/24");
        assert!(p16.contains_prefix(p24));
        assert!(!p24.contains_prefix(p16));
        assert!(p16.contains_ip(Ip::from_octets(1, 1, 200, 9)));
        assert!(!p16.contains_ip(Ip::from_octets(1, 2, 0, 0)));
        assert!(p16.overlaps(p24) && p24.overlaps(p16));
        assert!(!p24.overlaps(p("1.1.2.0/24")));
    }

    #[test]
    fn families_do_not_mix() {
        let v6 = p("::/0");
        assert!(!v6.contains_ip(Ip::from_octets(1, 1, 1, 1)));
        assert!(!v6.contains_prefix(p("0.0.0.0/0")));
    }

    #[test]
    fn end_ip_and_children() {
        let p24 = p("1.1.1.0/24");
        assert_eq!(p24.end_ip(), Ip::from_octets(1, 1, 1, 255));
        assert_eq!(p24.child(false), Some(p("1.1.1.0/25")));
        assert_eq!(p24.child(true), Some(p("1.1.1.128/25")));
        assert_eq!(p("1.1.1.1/32").child(true), None);
        assert_eq!(p("::/0").end_ip(), Ip::v6(u128::MAX));
    }

    proptest! {
        #[test]
        fn child_is_contained(bits in any::<u32>(), len in 0u8..32, bit in any::<bool>()) {
            let parent = Prefix::new(Ip::v4(bits), len).unwrap();
            let child = parent.child(bit).unwrap();
            prop_assert!(parent.contains_prefix(child));
            prop_assert_eq!(child.network().bit_at(len), bit);
        }
    }
}
