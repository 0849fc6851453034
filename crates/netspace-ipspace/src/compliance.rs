//! IpSpace law test helpers.
//!
//! Sample addresses, law assertions and proptest strategies shared by the
//! test modules of this crate. Addresses are drawn from two small blocks
//! (one per family) so random spaces overlap often enough to exercise
//! both branches of every containment check.

use netspace_core::{Ip, IpWildcard, Prefix};
use proptest::prelude::*;

use crate::acl::AclSpaceBuilder;
use crate::space::{IpSpace, LineAction, NamedIpSpaces};
use crate::wildcard_set::WildcardSetBuilder;

const V4_BASE: u32 = 0x0A00_0000;
const V6_BASE: u128 = 0x2001_0db8u128 << 96;

/// A fixed spread of addresses across both families.
pub fn sample_ips() -> Vec<Ip> {
    let mut ips: Vec<Ip> = [
        "0.0.0.0",
        "1.0.0.0",
        "1.1.0.0",
        "1.1.1.0",
        "1.1.1.1",
        "1.1.2.0",
        "1.2.0.0",
        "7.7.7.7",
        "10.0.0.1",
        "255.255.255.255",
        "::",
        "2001:db8::1",
        "ffff::",
    ]
    .iter()
    .map(|s| s.parse().unwrap())
    .collect();
    ips.extend((0..=255u32).step_by(17).map(|x| Ip::v4(V4_BASE | x)));
    ips
}

/// Assert `complement` inverts membership on every sample address.
pub fn assert_complement_inverts(space: &IpSpace, named: &NamedIpSpaces) {
    let complement = space.complement();
    for ip in sample_ips() {
        assert_eq!(
            complement.contains_ip_with(ip, named),
            !space.contains_ip_with(ip, named),
            "complement of {space} disagrees at {ip}"
        );
    }
}

/// Assert a double complement agrees with the original on every sample.
pub fn assert_double_complement_equivalent(space: &IpSpace, named: &NamedIpSpaces) {
    let twice = space.complement().complement();
    for ip in sample_ips() {
        assert_eq!(
            twice.contains_ip_with(ip, named),
            space.contains_ip_with(ip, named),
            "double complement of {space} disagrees at {ip}"
        );
    }
}

// ── Strategies ─────────────────────────────────────────────────

/// Addresses from the two test blocks.
pub fn arb_ip() -> impl Strategy<Value = Ip> {
    prop_oneof![
        (0u32..256).prop_map(|x| Ip::v4(V4_BASE | x)),
        (0u128..256).prop_map(|x| Ip::v6(V6_BASE | x)),
    ]
}

fn arb_prefix() -> impl Strategy<Value = Prefix> {
    (arb_ip(), 0u8..=8).prop_map(|(ip, host_bits)| {
        let width = ip.family().width();
        Prefix::new(ip, width - host_bits).unwrap()
    })
}

fn arb_wildcard() -> impl Strategy<Value = IpWildcard> {
    (arb_ip(), 0u128..256).prop_map(|(ip, mask)| IpWildcard::from_mask_bits(ip, mask))
}

fn arb_leaf() -> impl Strategy<Value = IpSpace> {
    prop_oneof![
        Just(IpSpace::empty()),
        Just(IpSpace::universe()),
        arb_ip().prop_map(IpSpace::ip),
        arb_prefix().prop_map(IpSpace::prefix),
        arb_wildcard().prop_map(IpSpace::wildcard),
        (
            prop::collection::vec(arb_wildcard(), 0..3),
            prop::collection::vec(arb_wildcard(), 0..2),
        )
            .prop_map(|(inc, exc)| WildcardSetBuilder::new()
                .including(inc)
                .excluding(exc)
                .build()),
    ]
}

/// Arbitrary reference-free spaces, nesting ACLs a few levels deep.
pub fn arb_space() -> impl Strategy<Value = IpSpace> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec((any::<bool>(), inner), 0..4).prop_map(|lines| {
            let mut builder = AclSpaceBuilder::new();
            for (permit, space) in lines {
                let action = if permit {
                    LineAction::Permit
                } else {
                    LineAction::Deny
                };
                builder.add_line(action, space);
            }
            builder.build()
        })
    })
}
