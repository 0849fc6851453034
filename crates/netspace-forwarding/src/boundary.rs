//! Where traffic leaves the modeled network: into a host subnet behind an
//! edge-less interface, or out of the network entirely.

use indexmap::IndexMap;
use netspace_core::{IpWildcard, NodeInterfacePair};
use netspace_dataplane::{DataplaneSnapshot, InterfaceOwnedIps};
use netspace_ipspace::{AclSpaceBuilder, IpSpace, WildcardSetBuilder};

use crate::config::AnalysisConfig;
use crate::executor::Executor;
use crate::relation::{space_at, space_at3, HostInterfaceMap, HostVrfInterfaceMap};

/// Per interface, routed destinations that fall inside one of its
/// connected subnets, when the interface has no edge.
///
/// Interfaces with an edge deliver to a neighbor instead and map to the
/// empty space. Subnets longer than the configured bound (point-to-point
/// links and the like) are not treated as host subnets.
pub(crate) fn delivered_to_subnet(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    config: &AnalysisConfig,
    ips_routed_out: &HostVrfInterfaceMap<IpSpace>,
) -> HostInterfaceMap<IpSpace> {
    let topology = snapshot.topology();
    exec.map_entries(snapshot.configurations(), |host, device| {
        device
            .all_interfaces()
            .values()
            .map(|iface| {
                let nip = NodeInterfacePair::new(host.as_str(), iface.name());
                let space = if topology.has_edges(&nip) {
                    IpSpace::empty()
                } else {
                    let subnets = IpSpace::union(
                        iface
                            .all_addresses()
                            .iter()
                            .filter(|addr| {
                                addr.prefix_length()
                                    <= config.max_subnet_prefix_length(addr.ip().family())
                            })
                            .map(|addr| IpSpace::family_prefix(addr.prefix())),
                    );
                    IpSpace::intersection(
                        subnets,
                        space_at3(ips_routed_out, host, iface.vrf(), iface.name()),
                    )
                };
                (iface.name().to_string(), space)
            })
            .collect()
    })
}

/// Every IP owned by some interface in the network.
fn owned_ip_space(owned: &InterfaceOwnedIps) -> IpSpace {
    WildcardSetBuilder::new()
        .including(
            owned
                .values()
                .flat_map(IndexMap::values)
                .flatten()
                .copied()
                .map(IpWildcard::from),
        )
        .build()
}

/// Per interface without an edge, routed destinations that are neither
/// owned inside the network nor delivered to its subnets.
pub(crate) fn exits_network(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    owned: &InterfaceOwnedIps,
    ips_routed_out: &HostVrfInterfaceMap<IpSpace>,
    delivered_to_subnet: &HostInterfaceMap<IpSpace>,
) -> HostInterfaceMap<IpSpace> {
    let topology = snapshot.topology();
    let internal = owned_ip_space(owned);
    exec.map_entries(snapshot.configurations(), |host, device| {
        device
            .all_interfaces()
            .values()
            .map(|iface| {
                let nip = NodeInterfacePair::new(host.as_str(), iface.name());
                let space = if topology.has_edges(&nip) {
                    IpSpace::empty()
                } else {
                    AclSpaceBuilder::rejecting(internal.clone())
                        .then_rejecting(space_at(delivered_to_subnet, host, iface.name()))
                        .then_permitting(space_at3(ips_routed_out, host, iface.vrf(), iface.name()))
                        .build()
                };
                (iface.name().to_string(), space)
            })
            .collect()
    })
}

/// Per interface, unanswered ARP that is neither delivered to a subnet
/// nor leaving the network. Interfaces reached from several VRFs take
/// the union.
pub(crate) fn neighbor_unreachable_internal(
    neighbor_unreachable: &HostVrfInterfaceMap<IpSpace>,
    delivered_to_subnet: &HostInterfaceMap<IpSpace>,
    exits_network: &HostInterfaceMap<IpSpace>,
) -> HostInterfaceMap<IpSpace> {
    let mut out = HostInterfaceMap::new();
    for (host, by_vrf) in neighbor_unreachable {
        let by_iface: &mut IndexMap<String, IpSpace> = out.entry(host.clone()).or_default();
        for (iface, unreachable) in by_vrf.values().flatten() {
            let space = AclSpaceBuilder::rejecting(space_at(delivered_to_subnet, host, iface))
                .then_rejecting(space_at(exits_network, host, iface))
                .then_permitting(unreachable.clone())
                .build();
            match by_iface.get_mut(iface) {
                Some(existing) => *existing = IpSpace::union([existing.clone(), space]),
                None => {
                    by_iface.insert(iface.clone(), space);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use netspace_core::Ip;

    fn ip(s: &str) -> Ip {
        s.parse().unwrap()
    }

    fn host_iface(host: &str, iface: &str, space: IpSpace) -> HostInterfaceMap<IpSpace> {
        let mut by_iface = IndexMap::new();
        by_iface.insert(iface.to_string(), space);
        let mut map = HostInterfaceMap::new();
        map.insert(host.to_string(), by_iface);
        map
    }

    #[test]
    fn owned_ips_cover_every_interface() {
        let mut owned = InterfaceOwnedIps::new();
        owned
            .entry("a".into())
            .or_default()
            .insert("e0".into(), [ip("10.0.0.1")].into_iter().collect());
        owned
            .entry("b".into())
            .or_default()
            .insert("e0".into(), [ip("10.0.0.2")].into_iter().collect());
        let space = owned_ip_space(&owned);
        assert!(space.contains_ip(ip("10.0.0.1")));
        assert!(space.contains_ip(ip("10.0.0.2")));
        assert!(!space.contains_ip(ip("10.0.0.3")));
        assert!(owned_ip_space(&InterfaceOwnedIps::new()).is_empty_space());
    }

    #[test]
    fn internal_unreachability_excludes_boundary_traffic() {
        let mut unreachable = HostVrfInterfaceMap::new();
        unreachable
            .entry("a".to_string())
            .or_insert_with(IndexMap::new)
            .entry("default".to_string())
            .or_insert_with(IndexMap::new)
            .insert("e0".to_string(), IpSpace::universe());
        let delivered = host_iface("a", "e0", IpSpace::ip(ip("10.0.0.5")));
        let exits = host_iface("a", "e0", IpSpace::ip(ip("8.8.8.8")));

        let internal = neighbor_unreachable_internal(&unreachable, &delivered, &exits);
        let space = &internal["a"]["e0"];
        assert!(!space.contains_ip(ip("10.0.0.5")));
        assert!(!space.contains_ip(ip("8.8.8.8")));
        assert!(space.contains_ip(ip("1.1.1.1")));
    }
}
