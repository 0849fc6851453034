//! Which interfaces own which IPs, with VRRP arbitration.
//!
//! Every configured interface address is owned by its interface. A VRRP
//! virtual address is owned only by the winning member of its group:
//! the highest priority, then the highest primary address, then the
//! greatest `(hostname, interface)` pair. Losers do not own the virtual
//! address at all.

use indexmap::{IndexMap, IndexSet};
use netspace_core::Ip;

use crate::device::{Configuration, Interface};

/// Hostname → interface name → owned IPs.
pub type InterfaceOwnedIps = IndexMap<String, IndexMap<String, IndexSet<Ip>>>;

/// IP → hostname → interfaces owning it.
pub type IpInterfaceOwners = IndexMap<Ip, IndexMap<String, IndexSet<String>>>;

/// One interface competing for a VRRP virtual address.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct VrrpCandidate<'a> {
    priority: u8,
    /// Interfaces without an address rank below any with one.
    primary: Option<Ip>,
    host: &'a str,
    interface: &'a str,
}

fn participates(iface: &Interface, exclude_inactive: bool) -> bool {
    iface.active() || !exclude_inactive
}

/// Map every owned IP to the interfaces owning it.
///
/// With `exclude_inactive`, inactive interfaces neither own addresses
/// nor take part in VRRP elections.
pub fn compute_ip_interface_owners<'a, I>(configs: I, exclude_inactive: bool) -> IpInterfaceOwners
where
    I: IntoIterator<Item = &'a Configuration>,
{
    let mut owners = IpInterfaceOwners::new();
    let mut elections: IndexMap<(Ip, u32), Vec<VrrpCandidate<'a>>> = IndexMap::new();

    for config in configs {
        let host = config.hostname();
        for iface in config.all_interfaces().values() {
            if !participates(iface, exclude_inactive) {
                continue;
            }
            for address in iface.all_addresses() {
                owners
                    .entry(address.ip())
                    .or_default()
                    .entry(host.to_string())
                    .or_default()
                    .insert(iface.name().to_string());
            }
            for (&group_id, group) in iface.vrrp_groups() {
                let Some(virtual_address) = group.virtual_address else {
                    continue;
                };
                elections
                    .entry((virtual_address, group_id))
                    .or_default()
                    .push(VrrpCandidate {
                        priority: group.priority,
                        primary: iface.primary_address().map(|a| a.ip()),
                        host,
                        interface: iface.name(),
                    });
            }
        }
    }

    for ((virtual_address, group_id), candidates) in elections {
        let Some(winner) = candidates.iter().max() else {
            continue;
        };
        tracing::debug!(
            %virtual_address,
            group_id,
            host = winner.host,
            interface = winner.interface,
            contenders = candidates.len(),
            "vrrp election"
        );
        owners
            .entry(virtual_address)
            .or_default()
            .entry(winner.host.to_string())
            .or_default()
            .insert(winner.interface.to_string());
    }
    owners
}

/// Invert [`compute_ip_interface_owners`]: hostname → interface → IPs.
pub fn compute_interface_owned_ips<'a, I>(configs: I, exclude_inactive: bool) -> InterfaceOwnedIps
where
    I: IntoIterator<Item = &'a Configuration>,
{
    let mut owned = InterfaceOwnedIps::new();
    for (ip, hosts) in compute_ip_interface_owners(configs, exclude_inactive) {
        for (host, ifaces) in hosts {
            let by_iface = owned.entry(host).or_default();
            for iface in ifaces {
                by_iface.entry(iface).or_default().insert(ip);
            }
        }
    }
    // Deterministic output regardless of election order.
    for by_iface in owned.values_mut() {
        for ips in by_iface.values_mut() {
            ips.sort();
        }
    }
    owned
}
