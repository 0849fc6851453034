//! Which IPs each interface, and each interface's neighbors, answer ARP
//! requests for.

use indexmap::IndexMap;
use netspace_core::IpWildcard;
use netspace_dataplane::{DataplaneSnapshot, Interface, InterfaceOwnedIps};
use netspace_ipspace::{AclSpaceBuilder, IpSpace, WildcardSetBuilder};

use crate::executor::Executor;
use crate::relation::{get2, space_at, space_at3, HostInterfaceMap, HostVrfInterfaceMap, HostVrfMap};

/// The IPs assigned to `iface` on `host`, as one space.
pub(crate) fn ips_assigned(owned: &InterfaceOwnedIps, host: &str, iface: &str) -> IpSpace {
    let Some(ips) = get2(owned, host, iface) else {
        return IpSpace::empty();
    };
    WildcardSetBuilder::new()
        .including(ips.iter().copied().map(IpWildcard::from))
        .build()
}

/// ARP replies of a single interface.
///
/// An interface with no assigned IPs answers nothing, proxy-ARP or not.
/// Otherwise it answers for its own IPs, and with proxy-ARP also for
/// anything its VRF can route that does not go back out of the same
/// interface.
pub(crate) fn interface_arp_replies(
    iface: &Interface,
    assigned: IpSpace,
    routable_for_vrf: IpSpace,
    routed_out: IpSpace,
) -> IpSpace {
    if assigned.is_empty_space() {
        return IpSpace::empty();
    }
    let mut replies = AclSpaceBuilder::permitting(assigned);
    if iface.proxy_arp() {
        replies = replies
            .then_rejecting(routed_out)
            .then_permitting(routable_for_vrf);
    }
    replies.build()
}

/// ARP replies of every active interface of every configured host.
///
/// Interfaces that route nothing still get an entry, so lookups for them
/// return their assigned addresses rather than falling back to empty.
pub(crate) fn arp_replies(
    exec: &Executor,
    snapshot: &DataplaneSnapshot,
    owned: &InterfaceOwnedIps,
    routable_ips: &HostVrfMap<IpSpace>,
    ips_routed_out: &HostVrfInterfaceMap<IpSpace>,
) -> HostInterfaceMap<IpSpace> {
    exec.map_entries(snapshot.configurations(), |host, config| {
        config
            .active_interfaces()
            .map(|iface| {
                let vrf = iface.vrf();
                let replies = interface_arp_replies(
                    iface,
                    ips_assigned(owned, host, iface.name()),
                    space_at(routable_ips, host, vrf),
                    space_at3(ips_routed_out, host, vrf, iface.name()),
                );
                (iface.name().to_string(), replies)
            })
            .collect()
    })
}

/// Per interface, everything some neighbor across an edge answers ARP
/// for. Interfaces with no edges have no entry.
pub(crate) fn someone_replies(
    snapshot: &DataplaneSnapshot,
    arp_replies: &HostInterfaceMap<IpSpace>,
) -> HostInterfaceMap<IpSpace> {
    let mut by_tail: HostInterfaceMap<Vec<IpSpace>> = HostInterfaceMap::new();
    for edge in snapshot.topology().edges() {
        let head = edge.head();
        let tail = edge.tail();
        by_tail
            .entry(tail.hostname().to_string())
            .or_default()
            .entry(tail.interface().to_string())
            .or_default()
            .push(space_at(arp_replies, head.hostname(), head.interface()));
    }
    by_tail
        .into_iter()
        .map(|(host, by_iface)| {
            let spaces: IndexMap<String, IpSpace> = by_iface
                .into_iter()
                .map(|(iface, spaces)| (iface, IpSpace::union(spaces)))
                .collect();
            (host, spaces)
        })
        .collect()
}
