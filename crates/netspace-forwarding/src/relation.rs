//! Relation names, key shapes and lookup helpers.
//!
//! Every relation is a nested map ending in an [`IpSpace`] or a set of
//! routes. A key missing at any level means "nothing", so lookups go
//! through [`space_at`] and friends, which default to the empty space.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use netspace_core::{Edge, Ip};
use netspace_dataplane::Route;
use netspace_ipspace::IpSpace;

/// Routes grouped under one key.
pub type RouteSet = IndexSet<Route>;

/// Hostname → interface → `T`.
pub type HostInterfaceMap<T> = IndexMap<String, IndexMap<String, T>>;

/// Hostname → VRF → `T`.
pub type HostVrfMap<T> = IndexMap<String, IndexMap<String, T>>;

/// Hostname → VRF → interface → `T`.
pub type HostVrfInterfaceMap<T> = IndexMap<String, IndexMap<String, IndexMap<String, T>>>;

/// Topology edge → `T`.
pub type EdgeMap<T> = IndexMap<Edge, T>;

/// Every relation the analysis computes, in dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// IPs owned by each interface, VRRP elections applied.
    InterfaceOwnedIps,
    /// Per VRF, destinations of routes that egress the null interface.
    NullRoutedIps,
    /// Per VRF, the union of RIB prefixes.
    RoutableIps,
    /// FIB routes grouped by egress interface.
    RoutesWithNextHop,
    /// Destinations forwarded out of each interface.
    IpsRoutedOutInterfaces,
    /// IPs each interface answers ARP for.
    ArpReplies,
    /// IPs some neighbor answers ARP for, per local interface.
    SomeoneReplies,
    /// Routes whose next-hop IP gets no ARP reply.
    RoutesWithNextHopIpArpFalse,
    /// Destinations of those routes.
    NeighborUnreachableArpNextHopIp,
    /// Routes whose next-hop IP is answered across an edge.
    RoutesWithNextHopIpArpTrue,
    /// Destinations of those routes, per edge.
    ArpTrueEdgeNextHopIp,
    /// Routes that ARP for the destination itself.
    RoutesWhereDstIpCanBeArpIp,
    /// Destinations ARPed for directly that nobody answers.
    NeighborUnreachableArpDestIp,
    /// Both kinds of unanswered ARP, per egress interface.
    NeighborUnreachable,
    /// Destination-ARP routes attributed to each edge.
    RoutesWithDestIpEdge,
    /// Destinations ARPed for directly and answered across an edge.
    ArpTrueEdgeDestIp,
    /// Destinations whose ARP resolves across an edge.
    ArpTrueEdge,
    /// Destinations delivered into an edge-less interface's subnets.
    DeliveredToSubnet,
    /// Destinations leaving the modeled network through an edge-less
    /// interface.
    ExitsNetwork,
    /// Unanswered ARP that is neither delivered nor leaving the network.
    NeighborUnreachableInternal,
}

impl Relation {
    /// All relations in the order they are computed.
    pub const ALL: [Relation; 20] = [
        Relation::InterfaceOwnedIps,
        Relation::NullRoutedIps,
        Relation::RoutableIps,
        Relation::RoutesWithNextHop,
        Relation::IpsRoutedOutInterfaces,
        Relation::ArpReplies,
        Relation::SomeoneReplies,
        Relation::RoutesWithNextHopIpArpFalse,
        Relation::NeighborUnreachableArpNextHopIp,
        Relation::RoutesWithNextHopIpArpTrue,
        Relation::ArpTrueEdgeNextHopIp,
        Relation::RoutesWhereDstIpCanBeArpIp,
        Relation::NeighborUnreachableArpDestIp,
        Relation::NeighborUnreachable,
        Relation::RoutesWithDestIpEdge,
        Relation::ArpTrueEdgeDestIp,
        Relation::ArpTrueEdge,
        Relation::DeliveredToSubnet,
        Relation::ExitsNetwork,
        Relation::NeighborUnreachableInternal,
    ];

    /// Snake-case name, as used in log fields.
    pub fn name(self) -> &'static str {
        match self {
            Self::InterfaceOwnedIps => "interface_owned_ips",
            Self::NullRoutedIps => "null_routed_ips",
            Self::RoutableIps => "routable_ips",
            Self::RoutesWithNextHop => "routes_with_next_hop",
            Self::IpsRoutedOutInterfaces => "ips_routed_out_interfaces",
            Self::ArpReplies => "arp_replies",
            Self::SomeoneReplies => "someone_replies",
            Self::RoutesWithNextHopIpArpFalse => "routes_with_next_hop_ip_arp_false",
            Self::NeighborUnreachableArpNextHopIp => "neighbor_unreachable_arp_next_hop_ip",
            Self::RoutesWithNextHopIpArpTrue => "routes_with_next_hop_ip_arp_true",
            Self::ArpTrueEdgeNextHopIp => "arp_true_edge_next_hop_ip",
            Self::RoutesWhereDstIpCanBeArpIp => "routes_where_dst_ip_can_be_arp_ip",
            Self::NeighborUnreachableArpDestIp => "neighbor_unreachable_arp_dest_ip",
            Self::NeighborUnreachable => "neighbor_unreachable",
            Self::RoutesWithDestIpEdge => "routes_with_dest_ip_edge",
            Self::ArpTrueEdgeDestIp => "arp_true_edge_dest_ip",
            Self::ArpTrueEdge => "arp_true_edge",
            Self::DeliveredToSubnet => "delivered_to_subnet",
            Self::ExitsNetwork => "exits_network",
            Self::NeighborUnreachableInternal => "neighbor_unreachable_internal",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Leaf counting ──────────────────────────────────────────────────

/// Number of leaf values in a (possibly nested) relation map.
pub(crate) trait LeafCount {
    fn leaf_count(&self) -> usize;
}

impl LeafCount for IpSpace {
    fn leaf_count(&self) -> usize {
        1
    }
}

impl LeafCount for RouteSet {
    fn leaf_count(&self) -> usize {
        1
    }
}

impl LeafCount for IndexSet<Ip> {
    fn leaf_count(&self) -> usize {
        1
    }
}

impl<K, V: LeafCount> LeafCount for IndexMap<K, V> {
    fn leaf_count(&self) -> usize {
        self.values().map(LeafCount::leaf_count).sum()
    }
}

// ── Lookups ────────────────────────────────────────────────────────

/// `map[a][b]`, or `None` if either level is missing.
pub(crate) fn get2<'m, T>(map: &'m IndexMap<String, IndexMap<String, T>>, a: &str, b: &str) -> Option<&'m T> {
    map.get(a)?.get(b)
}

/// `map[a][b][c]`, or `None` if any level is missing.
pub(crate) fn get3<'m, T>(
    map: &'m HostVrfInterfaceMap<T>,
    a: &str,
    b: &str,
    c: &str,
) -> Option<&'m T> {
    map.get(a)?.get(b)?.get(c)
}

/// The space at `map[a][b]`, empty when absent.
pub(crate) fn space_at(map: &IndexMap<String, IndexMap<String, IpSpace>>, a: &str, b: &str) -> IpSpace {
    get2(map, a, b).cloned().unwrap_or_default()
}

/// The space at `map[a][b][c]`, empty when absent.
pub(crate) fn space_at3(map: &HostVrfInterfaceMap<IpSpace>, a: &str, b: &str, c: &str) -> IpSpace {
    get3(map, a, b, c).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = Relation::ALL;
        sorted.sort();
        assert_eq!(sorted, Relation::ALL);
        assert_eq!(Relation::ArpTrueEdge.to_string(), "arp_true_edge");
    }

    #[test]
    fn missing_keys_read_as_empty() {
        let mut map: HostVrfInterfaceMap<IpSpace> = IndexMap::new();
        map.entry("r1".into())
            .or_default()
            .entry("default".into())
            .or_default()
            .insert("eth0".into(), IpSpace::universe());
        assert!(space_at3(&map, "r1", "default", "eth0").is_universe());
        assert!(space_at3(&map, "r1", "default", "eth1").is_empty_space());
        assert!(space_at3(&map, "r2", "default", "eth0").is_empty_space());
        assert_eq!(map.leaf_count(), 1);
    }
}
