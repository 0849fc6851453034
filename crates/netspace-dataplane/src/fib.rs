//! Forwarding information base: routes resolved to egress interfaces.
//!
//! A FIB answers, for every forwarding route of a VRF, "out of which
//! interfaces does this traffic leave, and whose MAC address is ARPed
//! for on the way out". Routes naming only a next-hop IP are resolved
//! recursively through the RIB until an interface route is reached.

use std::error::Error;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use netspace_core::{Ip, Prefix, NULL_INTERFACE_NAME};
use serde::{Deserialize, Serialize};

use crate::rib::Rib;
use crate::route::Route;

/// Resolution of one route: egress interface → final next-hop IP →
/// the interface routes that terminated the resolution.
///
/// A `None` next-hop IP means the route is directly connected out of
/// that interface, so the packet's destination IP itself is ARPed for.
pub type NextHopResolution = IndexMap<String, IndexMap<Option<Ip>, IndexSet<Route>>>;

// ── FibConfig ──────────────────────────────────────────────────────

/// Parameters for [`Fib::from_rib`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FibConfig {
    /// Maximum number of recursive next-hop lookups for a single route.
    /// Deeper chains are dropped with a warning. Default: 64.
    pub max_resolution_depth: usize,
}

impl Default for FibConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 64,
        }
    }
}

impl FibConfig {
    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), FibConfigError> {
        if self.max_resolution_depth == 0 {
            return Err(FibConfigError::ZeroResolutionDepth);
        }
        Ok(())
    }
}

/// Invalid [`FibConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FibConfigError {
    /// `max_resolution_depth` was zero, so no route could resolve.
    ZeroResolutionDepth,
}

impl fmt::Display for FibConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroResolutionDepth => write!(f, "max_resolution_depth must be at least 1"),
        }
    }
}

impl Error for FibConfigError {}

// ── Fib ────────────────────────────────────────────────────────────

/// The FIB of one VRF.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FibRepr", into = "FibRepr")]
pub struct Fib {
    next_hop_interfaces: IndexMap<Route, NextHopResolution>,
    routes_by_next_hop_interface: IndexMap<String, IndexSet<Route>>,
}

impl Fib {
    /// Start building a FIB by hand.
    pub fn builder() -> FibBuilder {
        FibBuilder::default()
    }

    /// Resolve every route in `rib`.
    ///
    /// Routes whose resolution loops, exceeds
    /// [`FibConfig::max_resolution_depth`] or reaches no interface are
    /// left out, each with a `warn!`.
    pub fn from_rib(rib: &Rib, config: &FibConfig) -> Self {
        let mut builder = FibBuilder::default();
        for route in rib.routes() {
            let mut resolver = Resolver {
                rib,
                max_depth: config.max_resolution_depth,
                seen: IndexSet::new(),
                out: NextHopResolution::new(),
            };
            resolver.resolve(route, None, 0);
            if resolver.out.is_empty() {
                tracing::warn!(route = %route, "route does not resolve to any interface; omitted from fib");
                continue;
            }
            builder.insert(route.clone(), resolver.out);
        }
        builder.build()
    }

    /// Per-route resolution detail.
    pub fn next_hop_interfaces(&self) -> &IndexMap<Route, NextHopResolution> {
        &self.next_hop_interfaces
    }

    /// Routes grouped by egress interface, including
    /// [`NULL_INTERFACE_NAME`].
    pub fn routes_by_next_hop_interface(&self) -> &IndexMap<String, IndexSet<Route>> {
        &self.routes_by_next_hop_interface
    }

    /// Number of resolved routes.
    pub fn len(&self) -> usize {
        self.next_hop_interfaces.len()
    }

    /// Whether no route resolved.
    pub fn is_empty(&self) -> bool {
        self.next_hop_interfaces.is_empty()
    }
}

/// Depth-first resolution of one route, tracking the networks on the
/// current lookup path to detect loops.
struct Resolver<'a> {
    rib: &'a Rib,
    max_depth: usize,
    seen: IndexSet<Prefix>,
    out: NextHopResolution,
}

impl Resolver<'_> {
    fn resolve(&mut self, route: &Route, inherited_next_hop: Option<Ip>, depth: usize) {
        let network = route.network();
        if depth >= self.max_depth {
            tracing::warn!(
                route = %route,
                depth,
                "next-hop resolution exceeded max depth"
            );
            return;
        }
        if !self.seen.insert(network) {
            tracing::warn!(route = %route, "next-hop resolution loop");
            return;
        }

        match (route.next_hop_interface(), route.next_hop_ip()) {
            (Some(NULL_INTERFACE_NAME), _) => {
                self.record(NULL_INTERFACE_NAME, None, route);
            }
            (Some(iface), own_next_hop) => {
                self.record(iface, own_next_hop.or(inherited_next_hop), route);
            }
            (None, Some(next_hop)) => {
                let candidates = self.rib.longest_prefix_match(next_hop);
                if candidates.is_empty() {
                    tracing::warn!(route = %route, next_hop = %next_hop, "no route to next hop");
                }
                for next in candidates {
                    self.resolve(next, Some(next_hop), depth + 1);
                }
            }
            (None, None) => {
                tracing::warn!(route = %route, "route has neither next-hop interface nor IP");
            }
        }

        self.seen.swap_remove(&network);
    }

    fn record(&mut self, iface: &str, next_hop: Option<Ip>, via: &Route) {
        self.out
            .entry(iface.to_string())
            .or_default()
            .entry(next_hop)
            .or_default()
            .insert(via.clone());
    }
}

// ── FibBuilder ─────────────────────────────────────────────────────

/// Builder for hand-made FIBs, mostly in tests.
#[derive(Clone, Debug, Default)]
pub struct FibBuilder {
    next_hop_interfaces: IndexMap<Route, NextHopResolution>,
}

impl FibBuilder {
    /// `route` leaves through `interface`, ARPing for `next_hop_ip`
    /// (or for the destination when `None`). The route resolves through
    /// itself.
    pub fn next_hop(self, route: Route, interface: impl Into<String>, next_hop_ip: Option<Ip>) -> Self {
        let via = route.clone();
        self.next_hop_via(route, interface, next_hop_ip, via)
    }

    /// Like [`next_hop`](Self::next_hop), recording `via` as the
    /// interface route that terminated the resolution.
    pub fn next_hop_via(
        mut self,
        route: Route,
        interface: impl Into<String>,
        next_hop_ip: Option<Ip>,
        via: Route,
    ) -> Self {
        self.next_hop_interfaces
            .entry(route)
            .or_default()
            .entry(interface.into())
            .or_default()
            .entry(next_hop_ip)
            .or_default()
            .insert(via);
        self
    }

    fn insert(&mut self, route: Route, resolution: NextHopResolution) {
        self.next_hop_interfaces.insert(route, resolution);
    }

    /// Finish, grouping routes by egress interface.
    pub fn build(self) -> Fib {
        let mut routes_by_next_hop_interface: IndexMap<String, IndexSet<Route>> = IndexMap::new();
        for (route, resolution) in &self.next_hop_interfaces {
            for iface in resolution.keys() {
                routes_by_next_hop_interface
                    .entry(iface.clone())
                    .or_default()
                    .insert(route.clone());
            }
        }
        Fib {
            next_hop_interfaces: self.next_hop_interfaces,
            routes_by_next_hop_interface,
        }
    }
}

// ── serde ──────────────────────────────────────────────────────────

/// One `(route, interface, next hop, via)` fact.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct FibEntry {
    route: Route,
    interface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_hop_ip: Option<Ip>,
    via: Route,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FibRepr {
    entries: Vec<FibEntry>,
}

impl From<Fib> for FibRepr {
    fn from(fib: Fib) -> Self {
        let mut entries = Vec::new();
        for (route, resolution) in fib.next_hop_interfaces {
            for (interface, by_next_hop) in resolution {
                for (next_hop_ip, vias) in by_next_hop {
                    for via in vias {
                        entries.push(FibEntry {
                            route: route.clone(),
                            interface: interface.clone(),
                            next_hop_ip,
                            via,
                        });
                    }
                }
            }
        }
        Self { entries }
    }
}

impl From<FibRepr> for Fib {
    fn from(repr: FibRepr) -> Self {
        repr.entries
            .into_iter()
            .fold(FibBuilder::default(), |builder, e| {
                builder.next_hop_via(e.route, e.interface, e.next_hop_ip, e.via)
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    fn ip(s: &str) -> Ip {
        s.parse().unwrap()
    }

    fn resolve(routes: Vec<Route>) -> Fib {
        Fib::from_rib(&Rib::from_routes(routes), &FibConfig::default())
    }

    #[test]
    fn connected_route_arps_for_destination() {
        let connected = Route::connected(p("10.0.0.0/24"), "eth0");
        let fib = resolve(vec![connected.clone()]);
        let res = &fib.next_hop_interfaces()[&connected];
        assert_eq!(res.len(), 1);
        assert!(res["eth0"].contains_key(&None));
        assert!(fib.routes_by_next_hop_interface()["eth0"].contains(&connected));
    }

    #[test]
    fn next_hop_ip_resolves_recursively() {
        let connected = Route::connected(p("10.0.0.0/24"), "eth0");
        let via_ip = Route::static_via_ip(p("0.0.0.0/0"), ip("10.0.0.1"));
        let via_via = Route::static_via_ip(p("192.168.0.0/16"), ip("8.8.8.8"));
        let fib = resolve(vec![connected.clone(), via_ip.clone(), via_via.clone()]);

        let res = &fib.next_hop_interfaces()[&via_ip];
        assert!(res["eth0"][&Some(ip("10.0.0.1"))].contains(&connected));

        // 8.8.8.8 resolves through the default route, whose final next
        // hop is 10.0.0.1.
        let res = &fib.next_hop_interfaces()[&via_via];
        assert!(res["eth0"].contains_key(&Some(ip("10.0.0.1"))));
    }

    #[test]
    fn interface_route_with_ip_keeps_its_own_next_hop() {
        let r = Route::static_via_interface(p("20.0.0.0/8"), "eth1", Some(ip("1.2.3.4")));
        let fib = resolve(vec![r.clone()]);
        assert!(fib.next_hop_interfaces()[&r]["eth1"].contains_key(&Some(ip("1.2.3.4"))));
    }

    #[test]
    fn null_route_resolves_to_null_interface() {
        let null = Route::null_route(p("2.0.0.0/16"));
        let fib = resolve(vec![null.clone()]);
        assert!(fib.routes_by_next_hop_interface()[NULL_INTERFACE_NAME].contains(&null));
        assert!(fib.next_hop_interfaces()[&null][NULL_INTERFACE_NAME].contains_key(&None));
    }

    #[test]
    fn loops_and_unresolvable_routes_are_omitted() {
        // 1.0.0.0/8 via 2.0.0.1, 2.0.0.0/8 via 1.0.0.1.
        let a = Route::static_via_ip(p("1.0.0.0/8"), ip("2.0.0.1"));
        let b = Route::static_via_ip(p("2.0.0.0/8"), ip("1.0.0.1"));
        let dangling = Route::static_via_ip(p("3.0.0.0/8"), ip("99.0.0.1"));
        let fib = resolve(vec![a, b, dangling]);
        assert!(fib.is_empty());
    }

    #[test]
    fn self_resolving_route_is_a_loop() {
        let r = Route::static_via_ip(p("10.0.0.0/8"), ip("10.0.0.1"));
        assert!(resolve(vec![r]).is_empty());
    }

    #[test]
    fn depth_bound_is_enforced() {
        let connected = Route::connected(p("10.0.0.0/24"), "eth0");
        let hop = Route::static_via_ip(p("20.0.0.0/8"), ip("10.0.0.1"));
        let hop2 = Route::static_via_ip(p("30.0.0.0/8"), ip("20.0.0.1"));
        let rib = Rib::from_routes([connected, hop.clone(), hop2.clone()]);

        let shallow = Fib::from_rib(
            &rib,
            &FibConfig {
                max_resolution_depth: 2,
            },
        );
        assert!(shallow.next_hop_interfaces().contains_key(&hop));
        assert!(!shallow.next_hop_interfaces().contains_key(&hop2));

        let deep = Fib::from_rib(&rib, &FibConfig::default());
        assert!(deep.next_hop_interfaces().contains_key(&hop2));
    }

    #[test]
    fn config_validation() {
        assert!(FibConfig::default().validate().is_ok());
        let bad = FibConfig {
            max_resolution_depth: 0,
        };
        assert_eq!(bad.validate(), Err(FibConfigError::ZeroResolutionDepth));
    }

    #[test]
    fn builder_and_serde_round_trip() {
        let r = Route::static_via_ip(p("2.0.0.0/16"), ip("9.9.9.9"));
        let fib = Fib::builder()
            .next_hop(r.clone(), "eth0", Some(ip("9.9.9.9")))
            .next_hop(Route::connected(p("9.9.9.0/24"), "eth0"), "eth0", None)
            .build();
        assert_eq!(fib.routes_by_next_hop_interface()["eth0"].len(), 2);
        let json = serde_json::to_string(&fib).unwrap();
        let back: Fib = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fib);
    }
}
