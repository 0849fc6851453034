use netspace_core::Ip;
use netspace_ipspace::{AclSpaceBuilder, IpSpace, IpSpaceKind, NamedIpSpaces, WildcardSetBuilder};

fn ip(s: &str) -> Ip {
    s.parse().unwrap()
}

fn prefix(s: &str) -> IpSpace {
    IpSpace::prefix(s.parse().unwrap())
}

#[test]
fn named_table_composes_through_acls() {
    let mut named = NamedIpSpaces::new();
    named.insert("dmz".into(), prefix("192.0.2.0/24"));
    named.insert(
        "internal".into(),
        WildcardSetBuilder::new()
            .including(["10.0.0.0/8".parse().unwrap(), "172.16.0.0/12".parse().unwrap()])
            .excluding(["10.99.0.0/16".parse().unwrap()])
            .build(),
    );
    named.insert(
        "protected".into(),
        AclSpaceBuilder::rejecting(IpSpace::reference("dmz"))
            .then_permitting(IpSpace::reference("internal"))
            .then_permitting(IpSpace::reference("dmz"))
            .build(),
    );

    let protected = IpSpace::reference("protected");
    assert!(protected.contains_ip_with(ip("10.1.1.1"), &named));
    assert!(protected.contains_ip_with(ip("172.20.0.1"), &named));
    assert!(!protected.contains_ip_with(ip("10.99.1.1"), &named));
    // The deny line shadows the later permit of the same name.
    assert!(!protected.contains_ip_with(ip("192.0.2.10"), &named));
    assert!(!protected.contains_ip_with(ip("8.8.8.8"), &named));

    let outside = protected.complement();
    assert!(outside.contains_ip_with(ip("192.0.2.10"), &named));
    assert!(!outside.contains_ip_with(ip("10.1.1.1"), &named));
}

#[test]
fn complement_of_complement_stays_structural_for_acls() {
    let s = AclSpaceBuilder::rejecting(prefix("10.1.0.0/16"))
        .then_permitting(prefix("10.0.0.0/8"))
        .build();
    let twice = s.complement().complement();
    assert!(matches!(twice.kind(), IpSpaceKind::Acl(_)));
    for x in ["10.1.0.1", "10.2.0.1", "11.0.0.1", "::1"] {
        assert_eq!(twice.contains_ip(ip(x)), s.contains_ip(ip(x)), "{x}");
    }
}

#[test]
fn mixed_families_in_one_acl() {
    let s = IpSpace::union([prefix("10.0.0.0/8"), prefix("2001:db8::/32")]);
    assert!(s.contains_ip(ip("10.0.0.1")));
    assert!(s.contains_ip(ip("2001:db8::1")));
    assert!(!s.contains_ip(ip("2001:db9::1")));
    assert!(!s.contains_ip(ip("11.0.0.1")));
}

#[test]
fn json_round_trip_keeps_references_unresolved() {
    let s = IpSpace::difference(IpSpace::reference("all"), IpSpace::ip(ip("1.1.1.1")));
    let json = serde_json::to_string(&s).unwrap();
    let back: IpSpace = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
    assert_eq!(back.referenced_names().len(), 1);

    let mut named = NamedIpSpaces::new();
    named.insert("all".into(), IpSpace::universe());
    assert!(back.contains_ip_with(ip("2.2.2.2"), &named));
    assert!(!back.contains_ip_with(ip("1.1.1.1"), &named));
}

#[test]
fn whole_family_wildcard_never_matches_the_other_family() {
    let any_v4: netspace_core::IpWildcard = "0.0.0.0:255.255.255.255".parse().unwrap();
    let v6 = ip("2001:db8::1");

    let direct = IpSpace::wildcard(any_v4);
    let built = WildcardSetBuilder::new().including([any_v4]).build();
    let decoded: IpSpace = serde_json::from_str(
        r#"{"type":"wildcard","wildcard":{"ip":"0.0.0.0","mask":"255.255.255.255"}}"#,
    )
    .unwrap();

    for space in [&direct, &built, &decoded] {
        assert!(space.contains_ip(ip("198.51.100.7")));
        assert!(!space.contains_ip(v6));
        assert!(space.ptr_eq(&IpSpace::whole_family(netspace_core::AddressFamily::V4)));
    }
}
