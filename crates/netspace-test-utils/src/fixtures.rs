//! Ready-made networks.
//!
//! - [`next_hop_pair`]: two routers on one link, a static route via the
//!   neighbor's address.
//! - [`null_routed_host`]: one router discarding a prefix.
//! - [`vrrp_pair`]: two routers contending for one virtual address.
//! - [`line_network`]: `n` routers in a chain, each with a stub LAN.

use netspace_dataplane::{
    Configuration, DataplaneSnapshot, Interface, Route, VrrpGroup, DEFAULT_VRF_NAME,
};

use crate::{addr, ip, prefix, SnapshotBuilder};

/// Routers `a` and `b` linked `a[e0] <-> b[e0]` on `9.9.9.0/24`.
///
/// `a` routes `2.0.0.0/16` via next-hop IP `9.9.9.9`. When
/// `b_owns_next_hop` is set, `b[e0]` is `9.9.9.9` and answers ARP for
/// it; otherwise `b[e0]` is `9.9.9.8` and nobody answers.
pub fn next_hop_pair(b_owns_next_hop: bool) -> DataplaneSnapshot {
    let b_address = if b_owns_next_hop { "9.9.9.9/24" } else { "9.9.9.8/24" };
    SnapshotBuilder::new()
        .device(
            Configuration::builder("a")
                .interface(Interface::builder("e0").address(addr("9.9.9.1/24")).build())
                .build(),
        )
        .device(
            Configuration::builder("b")
                .interface(Interface::builder("e0").address(addr(b_address)).build())
                .build(),
        )
        .route(
            "a",
            DEFAULT_VRF_NAME,
            Route::static_via_ip(prefix("2.0.0.0/16"), ip("9.9.9.9")),
        )
        .link("a", "e0", "b", "e0")
        .build()
}

/// Router `r1` with `e0` on `10.0.0.0/24` (no edges) and a null route
/// for `2.0.0.0/16`.
pub fn null_routed_host() -> DataplaneSnapshot {
    SnapshotBuilder::new()
        .device(
            Configuration::builder("r1")
                .interface(Interface::builder("e0").address(addr("10.0.0.1/24")).build())
                .build(),
        )
        .route("r1", DEFAULT_VRF_NAME, Route::null_route(prefix("2.0.0.0/16")))
        .build()
}

/// Routers `a` and `b` sharing `1.1.1.0/24`, both configuring VRRP
/// group 1 for `1.1.1.1`; `a` at priority 100, `b` at 110.
pub fn vrrp_pair() -> DataplaneSnapshot {
    let lan = |address: &str, priority: u8| {
        Interface::builder("lan")
            .address(addr(address))
            .vrrp_group(1, VrrpGroup::new(priority, ip("1.1.1.1")))
            .build()
    };
    SnapshotBuilder::new()
        .device(Configuration::builder("a").interface(lan("1.1.1.2/24", 100)).build())
        .device(Configuration::builder("b").interface(lan("1.1.1.3/24", 110)).build())
        .link("a", "lan", "b", "lan")
        .build()
}

/// `n` routers `r0..r{n-1}` in a chain.
///
/// Router `ri` has a stub `lan` on `10.i.0.0/24` with no edge, `up`
/// towards `r(i+1)` on `172.16.i.0/30`, and `down` towards `r(i-1)`.
/// Every router has a static route to every other router's LAN via the
/// adjacent router in that direction.
///
/// # Panics
///
/// If `n` is zero or above 250.
pub fn line_network(n: usize) -> DataplaneSnapshot {
    assert!((1..=250).contains(&n), "line_network supports 1..=250 routers, got {n}");
    let mut builder = SnapshotBuilder::new();
    for i in 0..n {
        let host = format!("r{i}");
        let mut config = Configuration::builder(host.as_str())
            .interface(Interface::builder("lan").address(addr(&format!("10.{i}.0.1/24"))).build());
        if i + 1 < n {
            config = config.interface(
                Interface::builder("up")
                    .address(addr(&format!("172.16.{i}.1/30")))
                    .build(),
            );
            builder = builder.link(&host, "up", &format!("r{}", i + 1), "down");
        }
        if i > 0 {
            config = config.interface(
                Interface::builder("down")
                    .address(addr(&format!("172.16.{}.2/30", i - 1)))
                    .build(),
            );
        }
        builder = builder.device(config.build());

        for j in (0..n).filter(|&j| j != i) {
            let next_hop = if j > i {
                ip(&format!("172.16.{i}.2"))
            } else {
                ip(&format!("172.16.{}.1", i - 1))
            };
            let route = Route::static_via_ip(prefix(&format!("10.{j}.0.0/24")), next_hop);
            builder = builder.route(&host, DEFAULT_VRF_NAME, route);
        }
    }
    builder.build()
}
