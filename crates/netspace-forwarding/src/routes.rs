//! Relations read straight off the RIBs and FIBs: route groupings by
//! egress interface and edge, and the destination spaces they select.

use indexmap::IndexSet;
use netspace_core::{Edge, Ip, NodeInterfacePair, Prefix, NULL_INTERFACE_NAME};
use netspace_dataplane::{DataplaneSnapshot, Fib, Rib, Route};
use netspace_ipspace::IpSpace;

use crate::executor::Executor;
use crate::relation::{space_at, EdgeMap, HostInterfaceMap, HostVrfInterfaceMap, HostVrfMap, RouteSet};

/// Destinations that select any of `routes` in `rib`: the union of the
/// RIB's matching IPs for each distinct route network.
///
/// A missing RIB, or a network the RIB has no entry for, contributes
/// nothing.
pub(crate) fn route_match_conditions<'r, I>(routes: I, rib: Option<&Rib>) -> IpSpace
where
    I: IntoIterator<Item = &'r Route>,
{
    let Some(rib) = rib else {
        return IpSpace::empty();
    };
    let matching = rib.matching_ips();
    let networks: IndexSet<Prefix> = routes.into_iter().map(Route::network).collect();
    IpSpace::union(
        networks
            .into_iter()
            .map(|network| matching.get(&network).cloned().unwrap_or_default()),
    )
}

/// Final next-hop IPs of `route` out of `iface`; `None` stands for
/// "ARP for the destination".
fn final_next_hops<'f>(
    fib: Option<&'f Fib>,
    route: &Route,
    iface: &str,
) -> impl Iterator<Item = Option<Ip>> + 'f {
    fib.and_then(|fib| fib.next_hop_interfaces().get(route)?.get(iface))
        .into_iter()
        .flat_map(|by_next_hop| by_next_hop.keys().copied())
}

pub(crate) fn routes_with_next_hop(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
) -> HostVrfInterfaceMap<RouteSet> {
    exec.map_entries(snapshot.fibs(), |_, fibs| {
        fibs.iter()
            .map(|(vrf, fib)| (vrf.clone(), fib.routes_by_next_hop_interface().clone()))
            .collect()
    })
}

pub(crate) fn null_routed_ips(exec: &Executor, snapshot: &DataplaneSnapshot) -> HostVrfMap<IpSpace> {
    exec.map_entries(snapshot.fibs(), |host, fibs| {
        fibs.iter()
            .map(|(vrf, fib)| {
                let null_routes = fib
                    .next_hop_interfaces()
                    .iter()
                    .filter(|(_, resolution)| resolution.contains_key(NULL_INTERFACE_NAME))
                    .map(|(route, _)| route);
                let space = route_match_conditions(null_routes, snapshot.rib(host, vrf));
                (vrf.clone(), space)
            })
            .collect()
    })
}

pub(crate) fn routable_ips(exec: &Executor, snapshot: &DataplaneSnapshot) -> HostVrfMap<IpSpace> {
    exec.map_entries(snapshot.ribs(), |_, ribs| {
        ribs.iter()
            .map(|(vrf, rib)| (vrf.clone(), rib.routable_ips()))
            .collect()
    })
}

/// The null interface is skipped: it does not belong to a single VRF's
/// forwarding.
pub(crate) fn ips_routed_out_interfaces(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_with_next_hop: &HostVrfInterfaceMap<RouteSet>,
) -> HostVrfInterfaceMap<IpSpace> {
    exec.map_interfaces(routes_with_next_hop, |host, vrf, iface, routes| {
        (iface != NULL_INTERFACE_NAME)
            .then(|| route_match_conditions(routes, snapshot.rib(host, vrf)))
    })
}

/// Routes with at least one set next-hop IP that nobody on the link
/// answers ARP for.
pub(crate) fn routes_with_next_hop_ip_arp_false(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_with_next_hop: &HostVrfInterfaceMap<RouteSet>,
    someone_replies: &HostInterfaceMap<IpSpace>,
) -> HostVrfInterfaceMap<RouteSet> {
    exec.map_interfaces(routes_with_next_hop, |host, vrf, iface, routes| {
        let replies = space_at(someone_replies, host, iface);
        let fib = snapshot.fib(host, vrf);
        let selected = routes
            .iter()
            .filter(|route| {
                final_next_hops(fib, route, iface)
                    .flatten()
                    .any(|next_hop| !replies.contains_ip(next_hop))
            })
            .cloned()
            .collect();
        Some(selected)
    })
}

/// Routes with at least one unset final next-hop IP.
pub(crate) fn routes_where_dst_ip_can_be_arp_ip(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_with_next_hop: &HostVrfInterfaceMap<RouteSet>,
) -> HostVrfInterfaceMap<RouteSet> {
    exec.map_interfaces(routes_with_next_hop, |host, vrf, iface, routes| {
        let fib = snapshot.fib(host, vrf);
        let selected = routes
            .iter()
            .filter(|route| final_next_hops(fib, route, iface).any(|next_hop| next_hop.is_none()))
            .cloned()
            .collect();
        Some(selected)
    })
}

/// Per edge leaving one of the mapped interfaces, the routes `select`
/// keeps for that receiver. Routes reaching the same edge from several
/// VRFs are merged.
fn attribute_to_edges<F>(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    by_interface: &HostVrfInterfaceMap<RouteSet>,
    select: F,
) -> EdgeMap<RouteSet>
where
    F: Fn(&str, &str, &str, &NodeInterfacePair, &RouteSet) -> RouteSet + Sync + Send,
{
    let topology = snapshot.topology();
    let per_host = exec.map_entries(by_interface, |host, by_vrf| {
        let mut attributed = Vec::new();
        for (vrf, by_iface) in by_vrf {
            for (iface, routes) in by_iface {
                let tail = NodeInterfacePair::new(host.as_str(), iface.as_str());
                for head in topology.neighbors(&tail) {
                    let selected = select(host, vrf, iface, head, routes);
                    let edge = Edge::new(tail.clone(), head.clone());
                    tracing::trace!(%edge, routes = selected.len(), "routes attributed to edge");
                    attributed.push((edge, selected));
                }
            }
        }
        attributed
    });

    let mut edges = EdgeMap::new();
    for (edge, routes) in per_host.into_values().flatten() {
        edges.entry(edge).or_insert_with(RouteSet::new).extend(routes);
    }
    edges
}

/// Per edge, the routes whose set next-hop IP the receiver answers ARP
/// for.
pub(crate) fn routes_with_next_hop_ip_arp_true(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_with_next_hop: &HostVrfInterfaceMap<RouteSet>,
    arp_replies: &HostInterfaceMap<IpSpace>,
) -> EdgeMap<RouteSet> {
    attribute_to_edges(exec, snapshot, routes_with_next_hop, |host, vrf, iface, head, routes| {
        let replies = space_at(arp_replies, head.hostname(), head.interface());
        let fib = snapshot.fib(host, vrf);
        routes
            .iter()
            .filter(|route| {
                final_next_hops(fib, route, iface)
                    .flatten()
                    .any(|next_hop| replies.contains_ip(next_hop))
            })
            .cloned()
            .collect()
    })
}

/// Per edge, the destination-ARP routes of its tail interface.
pub(crate) fn routes_with_dest_ip_edge(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_where_dst_ip_can_be_arp_ip: &HostVrfInterfaceMap<RouteSet>,
) -> EdgeMap<RouteSet> {
    attribute_to_edges(
        exec,
        snapshot,
        routes_where_dst_ip_can_be_arp_ip,
        |_, _, _, _, routes| routes.clone(),
    )
}
