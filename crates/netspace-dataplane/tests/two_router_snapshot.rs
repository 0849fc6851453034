use netspace_core::{Edge, Ip, NodeInterfacePair, Prefix, NULL_INTERFACE_NAME};
use netspace_dataplane::{
    Configuration, DataplaneSnapshot, FibConfig, Interface, Rib, Route, Topology, VrrpGroup,
    DEFAULT_VRF_NAME,
};

fn p(s: &str) -> Prefix {
    s.parse().unwrap()
}

fn ip(s: &str) -> Ip {
    s.parse().unwrap()
}

fn router(host: &str, lan: &str, priority: u8) -> Configuration {
    Configuration::builder(host)
        .interface(
            Interface::builder("lan")
                .address(lan.parse().unwrap())
                .vrrp_group(10, VrrpGroup::new(priority, ip("192.168.1.1")))
                .build(),
        )
        .interface(
            Interface::builder("wan")
                .address(if host == "a" {
                    "10.0.0.1/30".parse().unwrap()
                } else {
                    "10.0.0.2/30".parse().unwrap()
                })
                .build(),
        )
        .build()
}

fn snapshot() -> DataplaneSnapshot {
    let fib_config = FibConfig::default();
    let rib_a = Rib::from_routes([
        Route::connected(p("192.168.1.0/24"), "lan"),
        Route::connected(p("10.0.0.0/30"), "wan"),
        Route::static_via_ip(p("0.0.0.0/0"), ip("10.0.0.2")),
        Route::null_route(p("172.16.0.0/12")),
    ]);
    let rib_b = Rib::from_routes([
        Route::connected(p("192.168.1.0/24"), "lan"),
        Route::connected(p("10.0.0.0/30"), "wan"),
    ]);
    DataplaneSnapshot::new()
        .with_configuration(router("a", "192.168.1.2/24", 120))
        .with_configuration(router("b", "192.168.1.3/24", 100))
        .with_rib("a", DEFAULT_VRF_NAME, rib_a, &fib_config)
        .with_rib("b", DEFAULT_VRF_NAME, rib_b, &fib_config)
        .with_topology(Topology::bidirectional([
            Edge::from_names("a", "wan", "b", "wan"),
            Edge::from_names("a", "lan", "b", "lan"),
        ]))
}

#[test]
fn snapshot_is_consistent() {
    let snap = snapshot();
    snap.validate().unwrap();
    assert_eq!(snap.topology().len(), 4);
    assert_eq!(
        snap.topology().neighbors(&NodeInterfacePair::new("a", "wan")),
        &[NodeInterfacePair::new("b", "wan")]
    );
}

#[test]
fn vrrp_master_owns_virtual_address() {
    let owned = snapshot().interface_owned_ips(true);
    assert!(owned["a"]["lan"].contains(&ip("192.168.1.1")));
    assert!(!owned["b"]["lan"].contains(&ip("192.168.1.1")));
    assert!(owned["b"]["lan"].contains(&ip("192.168.1.3")));
}

#[test]
fn derived_fib_resolves_default_route_out_of_wan() {
    let snap = snapshot();
    let fib = &snap.fibs()["a"][DEFAULT_VRF_NAME];
    let default = Route::static_via_ip(p("0.0.0.0/0"), ip("10.0.0.2"));
    let res = &fib.next_hop_interfaces()[&default];
    assert_eq!(res.keys().collect::<Vec<_>>(), vec!["wan"]);
    assert!(res["wan"].contains_key(&Some(ip("10.0.0.2"))));

    let by_iface = fib.routes_by_next_hop_interface();
    assert_eq!(by_iface["wan"].len(), 2);
    assert_eq!(by_iface[NULL_INTERFACE_NAME].len(), 1);
}

#[test]
fn matching_ips_respect_longest_prefix() {
    let snap = snapshot();
    let rib = &snap.ribs()["a"][DEFAULT_VRF_NAME];
    let default = &rib.matching_ips()[&p("0.0.0.0/0")];
    assert!(default.contains_ip(ip("8.8.8.8")));
    assert!(!default.contains_ip(ip("172.16.5.5")));
    assert!(!default.contains_ip(ip("192.168.1.77")));
    assert!(rib.routable_ips().contains_ip(ip("172.16.5.5")));
}

#[test]
fn snapshot_serde_round_trip() {
    let snap = snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back: DataplaneSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
    back.validate().unwrap();
}
