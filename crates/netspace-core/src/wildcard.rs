//! ACL-style wildcard matches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;
use crate::ip::{AddressFamily, Ip};
use crate::prefix::Prefix;

/// An address paired with a wildcard mask.
///
/// Wildcard semantics, not CIDR: a `1` bit in the mask means "don't
/// care", a `0` bit means the candidate address must match `ip` there.
/// The stored `ip` has its wildcard bits cleared, so two wildcards that
/// match the same addresses compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "WildcardRepr", into = "WildcardRepr")]
pub struct IpWildcard {
    ip: Ip,
    wildcard: u128,
}

impl IpWildcard {
    /// Build a wildcard from an address and a mask of the same family.
    pub fn new(ip: Ip, mask: Ip) -> Result<Self, AddressError> {
        if ip.family() != mask.family() {
            return Err(AddressError::FamilyMismatch {
                expected: ip.family(),
                found: mask.family(),
            });
        }
        Ok(Self::from_mask_bits(ip, mask.bits()))
    }

    /// Build a wildcard from an address and raw mask bits. Bits past the
    /// family width are ignored.
    pub fn from_mask_bits(ip: Ip, mask_bits: u128) -> Self {
        let family = ip.family();
        let wildcard = mask_bits & family.all_ones();
        Self {
            ip: Ip::from_bits(family, ip.bits() & !wildcard),
            wildcard,
        }
    }

    /// Address with wildcard bits cleared.
    pub const fn ip(self) -> Ip {
        self.ip
    }

    /// The wildcard mask as an address of the same family.
    pub const fn mask(self) -> Ip {
        Ip::from_bits(self.ip.family(), self.wildcard)
    }

    /// Address family.
    pub const fn family(self) -> AddressFamily {
        self.ip.family()
    }

    /// Whether `candidate` agrees with `ip` on every non-wildcard bit.
    pub fn matches(self, candidate: Ip) -> bool {
        candidate.family() == self.family() && candidate.bits() & !self.wildcard == self.ip.bits()
    }

    /// No wildcard bits: matches exactly one address.
    pub const fn is_single_ip(self) -> bool {
        self.wildcard == 0
    }

    /// Every bit is a wildcard: matches the whole family.
    pub const fn is_whole_family(self) -> bool {
        self.wildcard == self.family().all_ones()
    }

    /// The equivalent prefix when the wildcard bits form a contiguous
    /// low-order run, as in `0.0.0.255`.
    pub fn as_prefix(self) -> Option<Prefix> {
        let w = self.wildcard;
        // Contiguous low-order ones iff w + 1 is a power of two (or w is all ones).
        let contiguous = w == self.family().all_ones() || (w & w.wrapping_add(1)) == 0;
        if !contiguous {
            return None;
        }
        let host_bits = if w == self.family().all_ones() {
            self.family().width()
        } else {
            (u128::BITS - w.leading_zeros()) as u8
        };
        Prefix::new(self.ip, self.family().width() - host_bits).ok()
    }
}

impl From<Ip> for IpWildcard {
    fn from(ip: Ip) -> Self {
        Self::from_mask_bits(ip, 0)
    }
}

impl From<Prefix> for IpWildcard {
    fn from(prefix: Prefix) -> Self {
        let family = prefix.family();
        let wildcard = !family.network_mask(prefix.length()) & family.all_ones();
        Self::from_mask_bits(prefix.network(), wildcard)
    }
}

impl fmt::Display for IpWildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_prefix() {
            Some(prefix) if self.is_single_ip() => write!(f, "{}", prefix.network()),
            Some(prefix) => write!(f, "{prefix}"),
            None => write!(f, "{}:{}", self.ip, self.mask()),
        }
    }
}

impl fmt::Debug for IpWildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Accepts `ip`, `ip/len` and `ip:mask`.
impl FromStr for IpWildcard {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('/') {
            return s.parse::<Prefix>().map(IpWildcard::from);
        }
        // IPv6 text contains ':' itself, so a mask is only split off when
        // both halves parse.
        if let Some((ip, mask)) = s.rsplit_once(':') {
            if let (Ok(ip), Ok(mask)) = (ip.parse::<Ip>(), mask.parse::<Ip>()) {
                if ip.family() == mask.family() {
                    return IpWildcard::new(ip, mask);
                }
            }
        }
        s.parse::<Ip>().map(IpWildcard::from)
    }
}

/// Serialized shape: the address and mask as separate fields, since a
/// joined text form is ambiguous for IPv6.
#[derive(Serialize, Deserialize)]
struct WildcardRepr {
    ip: Ip,
    mask: Ip,
}

impl From<IpWildcard> for WildcardRepr {
    fn from(w: IpWildcard) -> Self {
        Self {
            ip: w.ip,
            mask: w.mask(),
        }
    }
}

impl TryFrom<WildcardRepr> for IpWildcard {
    type Error = AddressError;

    fn try_from(repr: WildcardRepr) -> Result<Self, Self::Error> {
        IpWildcard::new(repr.ip, repr.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ip {
        s.parse().unwrap()
    }

    #[test]
    fn non_contiguous_mask_matches() {
        // Match 10.x.0.y for any x, y.
        let w = IpWildcard::new(ip("10.0.0.0"), ip("0.255.0.255")).unwrap();
        assert!(w.matches(ip("10.7.0.9")));
        assert!(!w.matches(ip("10.7.1.9")));
        assert!(!w.matches(ip("11.7.0.9")));
        assert_eq!(w.as_prefix(), None);
    }

    #[test]
    fn canonicalizes_wildcard_bits() {
        let a = IpWildcard::new(ip("10.1.2.3"), ip("0.0.0.255")).unwrap();
        let b = IpWildcard::new(ip("10.1.2.0"), ip("0.0.0.255")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_prefix(), Some("10.1.2.0/24".parse().unwrap()));
    }

    #[test]
    fn degenerate_masks() {
        let single = IpWildcard::from(ip("1.2.3.4"));
        assert!(single.is_single_ip());
        assert_eq!(single.as_prefix(), Some(Prefix::host(ip("1.2.3.4"))));

        let all = IpWildcard::new(ip("1.2.3.4"), ip("255.255.255.255")).unwrap();
        assert!(all.is_whole_family());
        assert_eq!(all.as_prefix(), Some("0.0.0.0/0".parse().unwrap()));
    }

    #[test]
    fn family_mismatch_rejected() {
        assert!(IpWildcard::new(ip("1.1.1.1"), ip("::ff")).is_err());
    }

    #[test]
    fn parses_all_forms() {
        let from_prefix: IpWildcard = "10.0.0.0/8".parse().unwrap();
        assert!(from_prefix.matches(ip("10.200.1.1")));
        let from_mask: IpWildcard = "10.0.0.0:0.255.255.255".parse().unwrap();
        assert_eq!(from_prefix, from_mask);
        let v6: IpWildcard = "2001:db8::1".parse().unwrap();
        assert!(v6.is_single_ip());
        assert_eq!(v6.ip(), ip("2001:db8::1"));
    }

    #[test]
    fn serde_keeps_v6_masks_apart() {
        let w = IpWildcard::new(ip("2001:db8::"), ip("::ffff")).unwrap();
        let json = serde_json::to_string(&w).unwrap();
        let back: IpWildcard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }
}
