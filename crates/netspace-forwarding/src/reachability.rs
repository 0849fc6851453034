//! Destination spaces whose ARP goes unanswered on an interface, or is
//! answered across an edge.

use indexmap::IndexSet;
use netspace_core::{Edge, NULL_INTERFACE_NAME};
use netspace_dataplane::DataplaneSnapshot;
use netspace_ipspace::{AclSpaceBuilder, IpSpace};

use crate::executor::Executor;
use crate::relation::{get3, space_at, EdgeMap, HostInterfaceMap, HostVrfInterfaceMap, RouteSet};
use crate::routes::route_match_conditions;

/// Destinations of routes whose next-hop IP nobody answers ARP for.
pub(crate) fn neighbor_unreachable_arp_next_hop_ip(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_with_next_hop_ip_arp_false: &HostVrfInterfaceMap<RouteSet>,
) -> HostVrfInterfaceMap<IpSpace> {
    exec.map_interfaces(routes_with_next_hop_ip_arp_false, |host, vrf, iface, routes| {
        (iface != NULL_INTERFACE_NAME)
            .then(|| route_match_conditions(routes, snapshot.rib(host, vrf)))
    })
}

/// Destinations ARPed for directly on an interface, minus whatever a
/// neighbor on that interface answers for.
pub(crate) fn neighbor_unreachable_arp_dest_ip(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_where_dst_ip_can_be_arp_ip: &HostVrfInterfaceMap<RouteSet>,
    someone_replies: &HostInterfaceMap<IpSpace>,
) -> HostVrfInterfaceMap<IpSpace> {
    exec.map_interfaces(routes_where_dst_ip_can_be_arp_ip, |host, vrf, iface, routes| {
        if iface == NULL_INTERFACE_NAME {
            return None;
        }
        let space = AclSpaceBuilder::rejecting(space_at(someone_replies, host, iface))
            .then_permitting(route_match_conditions(routes, snapshot.rib(host, vrf)))
            .build();
        Some(space)
    })
}

/// Both unreachable parts per egress interface. Keys present in only one
/// part still appear; the destination-ARP part comes first.
pub(crate) fn neighbor_unreachable(
    exec: &Executor,
    arp_dest_ip: &HostVrfInterfaceMap<IpSpace>,
    arp_next_hop_ip: &HostVrfInterfaceMap<IpSpace>,
) -> HostVrfInterfaceMap<IpSpace> {
    let mut skeleton: HostVrfInterfaceMap<()> = HostVrfInterfaceMap::new();
    for part in [arp_dest_ip, arp_next_hop_ip] {
        for (host, by_vrf) in part {
            for (vrf, by_iface) in by_vrf {
                let slot = skeleton
                    .entry(host.clone())
                    .or_default()
                    .entry(vrf.clone())
                    .or_default();
                for iface in by_iface.keys() {
                    slot.insert(iface.clone(), ());
                }
            }
        }
    }
    exec.map_interfaces(&skeleton, |host, vrf, iface, _| {
        let part = |map: &HostVrfInterfaceMap<IpSpace>| {
            get3(map, host, vrf, iface).cloned().unwrap_or_default()
        };
        let space = AclSpaceBuilder::permitting(part(arp_dest_ip))
            .then_permitting(part(arp_next_hop_ip))
            .build();
        Some(space)
    })
}

/// The routes' destination space, evaluated against the RIB of the VRF
/// the edge's tail interface belongs to.
fn edge_match_conditions(snapshot: &DataplaneSnapshot, edge: &Edge, routes: &RouteSet) -> IpSpace {
    let tail = edge.tail();
    let rib = snapshot
        .interface_vrf(tail.hostname(), tail.interface())
        .and_then(|vrf| snapshot.rib(tail.hostname(), vrf));
    route_match_conditions(routes, rib)
}

/// Per edge, destinations forwarded to a next-hop IP the receiver
/// answers ARP for.
pub(crate) fn arp_true_edge_next_hop_ip(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_with_next_hop_ip_arp_true: &EdgeMap<RouteSet>,
) -> EdgeMap<IpSpace> {
    exec.map_entries(routes_with_next_hop_ip_arp_true, |edge, routes| {
        edge_match_conditions(snapshot, edge, routes)
    })
}

/// Per edge, destinations ARPed for directly that the receiver answers
/// for.
pub(crate) fn arp_true_edge_dest_ip(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    routes_with_dest_ip_edge: &EdgeMap<RouteSet>,
    arp_replies: &HostInterfaceMap<IpSpace>,
) -> EdgeMap<IpSpace> {
    exec.map_entries(routes_with_dest_ip_edge, |edge, routes| {
        let head = edge.head();
        IpSpace::intersection(
            edge_match_conditions(snapshot, edge, routes),
            space_at(arp_replies, head.hostname(), head.interface()),
        )
    })
}

/// Per edge, destinations whose ARP is answered across it by either
/// route kind. Edges present in only one part still appear.
pub(crate) fn arp_true_edge(
    arp_true_edge_dest_ip: &EdgeMap<IpSpace>,
    arp_true_edge_next_hop_ip: &EdgeMap<IpSpace>,
) -> EdgeMap<IpSpace> {
    let edges: IndexSet<&Edge> = arp_true_edge_dest_ip
        .keys()
        .chain(arp_true_edge_next_hop_ip.keys())
        .collect();
    edges
        .into_iter()
        .map(|edge| {
            let part = |map: &EdgeMap<IpSpace>| map.get(edge).cloned().unwrap_or_default();
            let space = AclSpaceBuilder::permitting(part(arp_true_edge_dest_ip))
                .then_permitting(part(arp_true_edge_next_hop_ip))
                .build();
            (edge.clone(), space)
        })
        .collect()
}
