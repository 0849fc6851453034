//! Routes as they appear in a RIB.

use std::fmt;

use netspace_core::{Ip, Prefix, NULL_INTERFACE_NAME};
use serde::{Deserialize, Serialize};

/// Where a route came from. Carried for identity and display only; the
/// analysis never re-runs route selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProtocol {
    /// Subnet of an interface address.
    Connected,
    /// Host route for an interface address.
    Local,
    /// Configured static route.
    Static,
    /// BGP.
    Bgp,
    /// OSPF.
    Ospf,
    /// IS-IS.
    Isis,
    /// EIGRP.
    Eigrp,
    /// RIP.
    Rip,
}

/// A selected route.
///
/// A route names a next-hop IP, a next-hop interface, or both. A route
/// with only a next-hop IP is resolved recursively through the RIB when
/// the FIB is built; a route whose interface is
/// [`NULL_INTERFACE_NAME`] discards traffic.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Route {
    network: Prefix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_hop_ip: Option<Ip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_hop_interface: Option<String>,
    protocol: RoutingProtocol,
    #[serde(default)]
    admin_distance: u8,
    #[serde(default)]
    metric: u32,
}

impl Route {
    fn base(network: Prefix, protocol: RoutingProtocol, admin_distance: u8) -> Self {
        Self {
            network,
            next_hop_ip: None,
            next_hop_interface: None,
            protocol,
            admin_distance,
            metric: 0,
        }
    }

    /// A connected route out of `interface`.
    pub fn connected(network: Prefix, interface: impl Into<String>) -> Self {
        Self {
            next_hop_interface: Some(interface.into()),
            ..Self::base(network, RoutingProtocol::Connected, 0)
        }
    }

    /// A static route via a next-hop IP, resolved through the RIB.
    pub fn static_via_ip(network: Prefix, next_hop_ip: Ip) -> Self {
        Self {
            next_hop_ip: Some(next_hop_ip),
            ..Self::base(network, RoutingProtocol::Static, 1)
        }
    }

    /// A static route out of an interface, optionally with a next-hop IP.
    pub fn static_via_interface(
        network: Prefix,
        interface: impl Into<String>,
        next_hop_ip: Option<Ip>,
    ) -> Self {
        Self {
            next_hop_ip,
            next_hop_interface: Some(interface.into()),
            ..Self::base(network, RoutingProtocol::Static, 1)
        }
    }

    /// A static route that discards traffic.
    pub fn null_route(network: Prefix) -> Self {
        Self::static_via_interface(network, NULL_INTERFACE_NAME, None)
    }

    /// A route learned from `protocol` via a next-hop IP.
    pub fn learned(
        network: Prefix,
        protocol: RoutingProtocol,
        next_hop_ip: Ip,
        admin_distance: u8,
        metric: u32,
    ) -> Self {
        Self {
            next_hop_ip: Some(next_hop_ip),
            metric,
            ..Self::base(network, protocol, admin_distance)
        }
    }

    /// Destination prefix.
    pub fn network(&self) -> Prefix {
        self.network
    }

    /// Configured next-hop IP, if any.
    pub fn next_hop_ip(&self) -> Option<Ip> {
        self.next_hop_ip
    }

    /// Configured next-hop interface, if any.
    pub fn next_hop_interface(&self) -> Option<&str> {
        self.next_hop_interface.as_deref()
    }

    /// Source protocol.
    pub fn protocol(&self) -> RoutingProtocol {
        self.protocol
    }

    /// Administrative distance.
    pub fn admin_distance(&self) -> u8 {
        self.admin_distance
    }

    /// Protocol metric.
    pub fn metric(&self) -> u32 {
        self.metric
    }

    /// Whether this route discards traffic.
    pub fn is_null_route(&self) -> bool {
        self.next_hop_interface() == Some(NULL_INTERFACE_NAME)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.protocol, self.network)?;
        if let Some(ip) = self.next_hop_ip {
            write!(f, " via {ip}")?;
        }
        if let Some(iface) = &self.next_hop_interface {
            write!(f, " dev {iface}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route({self})")
    }
}
