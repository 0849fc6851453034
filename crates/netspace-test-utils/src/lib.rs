//! Test utilities and fixtures for netspace development.
//!
//! Provides terse parsers for addresses, a [`SnapshotBuilder`] that
//! derives connected routes and FIBs the way a real dataplane would, and
//! ready-made networks in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;
use netspace_core::{Edge, Ip, Prefix};
use netspace_dataplane::{
    Configuration, DataplaneSnapshot, FibConfig, InterfaceAddress, Rib, Route, Topology,
};

/// Parse an IP, panicking on malformed test input.
pub fn ip(s: &str) -> Ip {
    s.parse()
        .unwrap_or_else(|e| panic!("bad ip literal {s:?}: {e}"))
}

/// Parse a prefix, panicking on malformed test input.
pub fn prefix(s: &str) -> Prefix {
    s.parse()
        .unwrap_or_else(|e| panic!("bad prefix literal {s:?}: {e}"))
}

/// Parse an interface address such as `10.0.0.1/24`.
pub fn addr(s: &str) -> InterfaceAddress {
    s.parse()
        .unwrap_or_else(|e| panic!("bad interface address literal {s:?}: {e}"))
}

/// Assembles a [`DataplaneSnapshot`] from devices, extra routes and
/// links.
///
/// Every address of every active interface contributes a connected
/// route in that interface's VRF. Each `(host, vrf)` that ends up with
/// at least one route gets a RIB and a FIB resolved from it.
#[derive(Default)]
pub struct SnapshotBuilder {
    devices: Vec<Configuration>,
    routes: IndexMap<(String, String), Vec<Route>>,
    links: Vec<Edge>,
    fib_config: FibConfig,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, config: Configuration) -> Self {
        self.devices.push(config);
        self
    }

    /// Add a route to the RIB of `(host, vrf)`.
    pub fn route(mut self, host: &str, vrf: &str, route: Route) -> Self {
        self.routes
            .entry((host.to_string(), vrf.to_string()))
            .or_default()
            .push(route);
        self
    }

    /// Connect two interfaces in both directions.
    pub fn link(mut self, a: &str, a_iface: &str, b: &str, b_iface: &str) -> Self {
        self.links.push(Edge::from_names(a, a_iface, b, b_iface));
        self
    }

    pub fn fib_config(mut self, config: FibConfig) -> Self {
        self.fib_config = config;
        self
    }

    pub fn build(self) -> DataplaneSnapshot {
        let mut tables: IndexMap<(String, String), Vec<Route>> = IndexMap::new();
        for device in &self.devices {
            for iface in device.active_interfaces() {
                let key = (device.hostname().to_string(), iface.vrf().to_string());
                let connected = iface
                    .all_addresses()
                    .iter()
                    .map(|a| Route::connected(a.prefix(), iface.name()));
                tables.entry(key).or_default().extend(connected);
            }
        }
        for (key, routes) in self.routes {
            tables.entry(key).or_default().extend(routes);
        }

        let mut snapshot = DataplaneSnapshot::new();
        for device in self.devices {
            snapshot = snapshot.with_configuration(device);
        }
        for ((host, vrf), routes) in tables {
            snapshot = snapshot.with_rib(host, vrf, Rib::from_routes(routes), &self.fib_config);
        }
        snapshot.with_topology(Topology::bidirectional(self.links))
    }
}
