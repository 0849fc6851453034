//! The computed relation set for one dataplane snapshot.

use netspace_core::Edge;
use netspace_dataplane::{DataplaneSnapshot, InterfaceOwnedIps};
use netspace_ipspace::IpSpace;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::executor::Executor;
use crate::relation::{
    get3, space_at, EdgeMap, HostInterfaceMap, HostVrfInterfaceMap, HostVrfMap, LeafCount,
    Relation, RouteSet,
};
use crate::{arp, boundary, reachability, routes};

/// Every forwarding and ARP relation of one snapshot.
///
/// Built in one go by [`compute`](Self::compute) and immutable
/// afterwards. Lookups of keys that are not present mean "nothing": the
/// accessors hand out the raw maps, and the `*_for` helpers return the
/// empty space for missing keys.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct ForwardingAnalysis {
    interface_owned_ips: InterfaceOwnedIps,
    null_routed_ips: HostVrfMap<IpSpace>,
    routable_ips: HostVrfMap<IpSpace>,
    routes_with_next_hop: HostVrfInterfaceMap<RouteSet>,
    ips_routed_out_interfaces: HostVrfInterfaceMap<IpSpace>,
    arp_replies: HostInterfaceMap<IpSpace>,
    someone_replies: HostInterfaceMap<IpSpace>,
    routes_with_next_hop_ip_arp_false: HostVrfInterfaceMap<RouteSet>,
    neighbor_unreachable_arp_next_hop_ip: HostVrfInterfaceMap<IpSpace>,
    routes_with_next_hop_ip_arp_true: EdgeMap<RouteSet>,
    arp_true_edge_next_hop_ip: EdgeMap<IpSpace>,
    routes_where_dst_ip_can_be_arp_ip: HostVrfInterfaceMap<RouteSet>,
    neighbor_unreachable_arp_dest_ip: HostVrfInterfaceMap<IpSpace>,
    neighbor_unreachable: HostVrfInterfaceMap<IpSpace>,
    routes_with_dest_ip_edge: EdgeMap<RouteSet>,
    arp_true_edge_dest_ip: EdgeMap<IpSpace>,
    arp_true_edge: EdgeMap<IpSpace>,
    delivered_to_subnet: HostInterfaceMap<IpSpace>,
    exits_network: HostInterfaceMap<IpSpace>,
    neighbor_unreachable_internal: HostInterfaceMap<IpSpace>,
}

fn logged<T: LeafCount>(relation: Relation, value: T) -> T {
    tracing::debug!(relation = relation.name(), entries = value.leaf_count(), "computed relation");
    value
}

impl ForwardingAnalysis {
    /// Validate `config` and `snapshot`, then compute every relation in
    /// [`Relation::ALL`] order.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::Config`] or [`AnalysisError::Snapshot`] when an
    /// input fails validation, [`AnalysisError::ThreadPool`] when a
    /// dedicated pool was requested and could not be built.
    pub fn compute(snapshot: &DataplaneSnapshot, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        snapshot.validate()?;
        let exec = Executor::new(config, snapshot.configurations().len())?;

        let span = tracing::info_span!(
            "forwarding_analysis",
            hosts = snapshot.configurations().len(),
            edges = snapshot.topology().len(),
            parallel = exec.is_parallel(),
        );
        let _guard = span.enter();

        let interface_owned_ips = logged(
            Relation::InterfaceOwnedIps,
            snapshot.interface_owned_ips(config.exclude_inactive_interfaces),
        );
        let null_routed_ips = logged(Relation::NullRoutedIps, routes::null_routed_ips(&exec, snapshot));
        let routable_ips = logged(Relation::RoutableIps, routes::routable_ips(&exec, snapshot));
        let routes_with_next_hop = logged(
            Relation::RoutesWithNextHop,
            routes::routes_with_next_hop(&exec, snapshot),
        );
        let ips_routed_out_interfaces = logged(
            Relation::IpsRoutedOutInterfaces,
            routes::ips_routed_out_interfaces(&exec, snapshot, &routes_with_next_hop),
        );
        let arp_replies = logged(
            Relation::ArpReplies,
            arp::arp_replies(
                &exec,
                snapshot,
                &interface_owned_ips,
                &routable_ips,
                &ips_routed_out_interfaces,
            ),
        );
        let someone_replies = logged(
            Relation::SomeoneReplies,
            arp::someone_replies(snapshot, &arp_replies),
        );
        let routes_with_next_hop_ip_arp_false = logged(
            Relation::RoutesWithNextHopIpArpFalse,
            routes::routes_with_next_hop_ip_arp_false(
                &exec,
                snapshot,
                &routes_with_next_hop,
                &someone_replies,
            ),
        );
        let neighbor_unreachable_arp_next_hop_ip = logged(
            Relation::NeighborUnreachableArpNextHopIp,
            reachability::neighbor_unreachable_arp_next_hop_ip(
                &exec,
                snapshot,
                &routes_with_next_hop_ip_arp_false,
            ),
        );
        let routes_with_next_hop_ip_arp_true = logged(
            Relation::RoutesWithNextHopIpArpTrue,
            routes::routes_with_next_hop_ip_arp_true(&exec, snapshot, &routes_with_next_hop, &arp_replies),
        );
        let arp_true_edge_next_hop_ip = logged(
            Relation::ArpTrueEdgeNextHopIp,
            reachability::arp_true_edge_next_hop_ip(&exec, snapshot, &routes_with_next_hop_ip_arp_true),
        );
        let routes_where_dst_ip_can_be_arp_ip = logged(
            Relation::RoutesWhereDstIpCanBeArpIp,
            routes::routes_where_dst_ip_can_be_arp_ip(&exec, snapshot, &routes_with_next_hop),
        );
        let neighbor_unreachable_arp_dest_ip = logged(
            Relation::NeighborUnreachableArpDestIp,
            reachability::neighbor_unreachable_arp_dest_ip(
                &exec,
                snapshot,
                &routes_where_dst_ip_can_be_arp_ip,
                &someone_replies,
            ),
        );
        let neighbor_unreachable = logged(
            Relation::NeighborUnreachable,
            reachability::neighbor_unreachable(
                &exec,
                &neighbor_unreachable_arp_dest_ip,
                &neighbor_unreachable_arp_next_hop_ip,
            ),
        );
        let routes_with_dest_ip_edge = logged(
            Relation::RoutesWithDestIpEdge,
            routes::routes_with_dest_ip_edge(&exec, snapshot, &routes_where_dst_ip_can_be_arp_ip),
        );
        let arp_true_edge_dest_ip = logged(
            Relation::ArpTrueEdgeDestIp,
            reachability::arp_true_edge_dest_ip(&exec, snapshot, &routes_with_dest_ip_edge, &arp_replies),
        );
        let arp_true_edge = logged(
            Relation::ArpTrueEdge,
            reachability::arp_true_edge(&arp_true_edge_dest_ip, &arp_true_edge_next_hop_ip),
        );
        let delivered_to_subnet = logged(
            Relation::DeliveredToSubnet,
            boundary::delivered_to_subnet(&exec, snapshot, config, &ips_routed_out_interfaces),
        );
        let exits_network = logged(
            Relation::ExitsNetwork,
            boundary::exits_network(
                &exec,
                snapshot,
                &interface_owned_ips,
                &ips_routed_out_interfaces,
                &delivered_to_subnet,
            ),
        );
        let neighbor_unreachable_internal = logged(
            Relation::NeighborUnreachableInternal,
            boundary::neighbor_unreachable_internal(
                &neighbor_unreachable,
                &delivered_to_subnet,
                &exits_network,
            ),
        );

        Ok(Self {
            interface_owned_ips,
            null_routed_ips,
            routable_ips,
            routes_with_next_hop,
            ips_routed_out_interfaces,
            arp_replies,
            someone_replies,
            routes_with_next_hop_ip_arp_false,
            neighbor_unreachable_arp_next_hop_ip,
            routes_with_next_hop_ip_arp_true,
            arp_true_edge_next_hop_ip,
            routes_where_dst_ip_can_be_arp_ip,
            neighbor_unreachable_arp_dest_ip,
            neighbor_unreachable,
            routes_with_dest_ip_edge,
            arp_true_edge_dest_ip,
            arp_true_edge,
            delivered_to_subnet,
            exits_network,
            neighbor_unreachable_internal,
        })
    }

    /// Number of leaf entries in `relation`.
    pub fn entry_count(&self, relation: Relation) -> usize {
        match relation {
            Relation::InterfaceOwnedIps => self.interface_owned_ips.leaf_count(),
            Relation::NullRoutedIps => self.null_routed_ips.leaf_count(),
            Relation::RoutableIps => self.routable_ips.leaf_count(),
            Relation::RoutesWithNextHop => self.routes_with_next_hop.leaf_count(),
            Relation::IpsRoutedOutInterfaces => self.ips_routed_out_interfaces.leaf_count(),
            Relation::ArpReplies => self.arp_replies.leaf_count(),
            Relation::SomeoneReplies => self.someone_replies.leaf_count(),
            Relation::RoutesWithNextHopIpArpFalse => self.routes_with_next_hop_ip_arp_false.leaf_count(),
            Relation::NeighborUnreachableArpNextHopIp => {
                self.neighbor_unreachable_arp_next_hop_ip.leaf_count()
            }
            Relation::RoutesWithNextHopIpArpTrue => self.routes_with_next_hop_ip_arp_true.leaf_count(),
            Relation::ArpTrueEdgeNextHopIp => self.arp_true_edge_next_hop_ip.leaf_count(),
            Relation::RoutesWhereDstIpCanBeArpIp => self.routes_where_dst_ip_can_be_arp_ip.leaf_count(),
            Relation::NeighborUnreachableArpDestIp => self.neighbor_unreachable_arp_dest_ip.leaf_count(),
            Relation::NeighborUnreachable => self.neighbor_unreachable.leaf_count(),
            Relation::RoutesWithDestIpEdge => self.routes_with_dest_ip_edge.leaf_count(),
            Relation::ArpTrueEdgeDestIp => self.arp_true_edge_dest_ip.leaf_count(),
            Relation::ArpTrueEdge => self.arp_true_edge.leaf_count(),
            Relation::DeliveredToSubnet => self.delivered_to_subnet.leaf_count(),
            Relation::ExitsNetwork => self.exits_network.leaf_count(),
            Relation::NeighborUnreachableInternal => self.neighbor_unreachable_internal.leaf_count(),
        }
    }

    // ── Point lookups ──────────────────────────────────────────────

    /// IPs assigned to `interface` on `host`, VRRP elections applied.
    pub fn ips_assigned_to_interface(&self, host: &str, interface: &str) -> IpSpace {
        arp::ips_assigned(&self.interface_owned_ips, host, interface)
    }

    /// ARP replies of `interface` on `host`.
    pub fn arp_replies_for(&self, host: &str, interface: &str) -> IpSpace {
        space_at(&self.arp_replies, host, interface)
    }

    /// Destinations `interface` cannot ARP-resolve in `vrf`.
    pub fn neighbor_unreachable_for(&self, host: &str, vrf: &str, interface: &str) -> IpSpace {
        get3(&self.neighbor_unreachable, host, vrf, interface)
            .cloned()
            .unwrap_or_default()
    }

    /// Destinations whose ARP resolves across `edge`.
    pub fn arp_true_edge_for(&self, edge: &Edge) -> IpSpace {
        self.arp_true_edge.get(edge).cloned().unwrap_or_default()
    }

    // ── Relations ──────────────────────────────────────────────────

    /// Host → interface → owned IPs.
    pub fn interface_owned_ips(&self) -> &InterfaceOwnedIps {
        &self.interface_owned_ips
    }

    /// Host → VRF → null-routed destinations.
    pub fn null_routed_ips(&self) -> &HostVrfMap<IpSpace> {
        &self.null_routed_ips
    }

    /// Host → VRF → routable destinations.
    pub fn routable_ips(&self) -> &HostVrfMap<IpSpace> {
        &self.routable_ips
    }

    /// Host → VRF → egress interface → routes. Includes the null
    /// interface.
    pub fn routes_with_next_hop(&self) -> &HostVrfInterfaceMap<RouteSet> {
        &self.routes_with_next_hop
    }

    /// Host → VRF → interface → destinations forwarded out of it. Never
    /// keyed by the null interface.
    pub fn ips_routed_out_interfaces(&self) -> &HostVrfInterfaceMap<IpSpace> {
        &self.ips_routed_out_interfaces
    }

    /// Host → interface → IPs it answers ARP for.
    pub fn arp_replies(&self) -> &HostInterfaceMap<IpSpace> {
        &self.arp_replies
    }

    /// Host → interface → IPs some neighbor answers ARP for.
    pub fn someone_replies(&self) -> &HostInterfaceMap<IpSpace> {
        &self.someone_replies
    }

    /// Host → VRF → interface → routes whose next-hop IP gets no reply.
    pub fn routes_with_next_hop_ip_arp_false(&self) -> &HostVrfInterfaceMap<RouteSet> {
        &self.routes_with_next_hop_ip_arp_false
    }

    /// Host → VRF → interface → destinations of those routes.
    pub fn neighbor_unreachable_arp_next_hop_ip(&self) -> &HostVrfInterfaceMap<IpSpace> {
        &self.neighbor_unreachable_arp_next_hop_ip
    }

    /// Edge → routes whose next-hop IP the edge's head answers for.
    pub fn routes_with_next_hop_ip_arp_true(&self) -> &EdgeMap<RouteSet> {
        &self.routes_with_next_hop_ip_arp_true
    }

    /// Edge → destinations of those routes.
    pub fn arp_true_edge_next_hop_ip(&self) -> &EdgeMap<IpSpace> {
        &self.arp_true_edge_next_hop_ip
    }

    /// Host → VRF → interface → routes that ARP for the destination.
    pub fn routes_where_dst_ip_can_be_arp_ip(&self) -> &HostVrfInterfaceMap<RouteSet> {
        &self.routes_where_dst_ip_can_be_arp_ip
    }

    /// Host → VRF → interface → destinations ARPed for directly that no
    /// neighbor answers.
    pub fn neighbor_unreachable_arp_dest_ip(&self) -> &HostVrfInterfaceMap<IpSpace> {
        &self.neighbor_unreachable_arp_dest_ip
    }

    /// Host → VRF → interface → destinations that cannot be ARP-resolved.
    /// Never keyed by the null interface.
    pub fn neighbor_unreachable(&self) -> &HostVrfInterfaceMap<IpSpace> {
        &self.neighbor_unreachable
    }

    /// Edge → destination-ARP routes of its tail.
    pub fn routes_with_dest_ip_edge(&self) -> &EdgeMap<RouteSet> {
        &self.routes_with_dest_ip_edge
    }

    /// Edge → destinations ARPed for directly and answered by its head.
    pub fn arp_true_edge_dest_ip(&self) -> &EdgeMap<IpSpace> {
        &self.arp_true_edge_dest_ip
    }

    /// Edge → destinations whose ARP resolves across it.
    pub fn arp_true_edge(&self) -> &EdgeMap<IpSpace> {
        &self.arp_true_edge
    }

    /// Host → interface → destinations delivered into its subnets.
    pub fn delivered_to_subnet(&self) -> &HostInterfaceMap<IpSpace> {
        &self.delivered_to_subnet
    }

    /// Host → interface → destinations leaving the network through it.
    pub fn exits_network(&self) -> &HostInterfaceMap<IpSpace> {
        &self.exits_network
    }

    /// Host → interface → unanswered ARP internal to the network.
    pub fn neighbor_unreachable_internal(&self) -> &HostInterfaceMap<IpSpace> {
        &self.neighbor_unreachable_internal
    }
}
