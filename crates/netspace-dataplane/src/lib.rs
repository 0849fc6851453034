//! Dataplane model for netspace.
//!
//! The forwarding analysis consumes one computed dataplane snapshot:
//! device configurations, a RIB and a FIB per (host, VRF), and the
//! physical topology. This crate defines those inputs.
//!
//! - [`Configuration`] / [`Interface`]: addresses, VRF membership,
//!   proxy-ARP and VRRP groups.
//! - [`Rib`]: selected routes in a pair of prefix tries, with the
//!   per-prefix matching IPs and routable IPs the analysis needs.
//! - [`Fib`]: each route resolved to egress interfaces and final
//!   next-hop IPs, built by hand or from a [`Rib`].
//! - [`Topology`]: directed edges between interfaces.
//! - [`DataplaneSnapshot`]: all of the above, checked for consistency.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod device;
pub mod error;
pub mod fib;
pub mod ownership;
pub mod rib;
pub mod route;
pub mod snapshot;
pub mod topology;

pub use device::{
    Configuration, ConfigurationBuilder, Interface, InterfaceAddress, InterfaceBuilder, VrrpGroup,
    DEFAULT_VRF_NAME,
};
pub use error::SnapshotError;
pub use fib::{Fib, FibBuilder, FibConfig, FibConfigError, NextHopResolution};
pub use ownership::{
    compute_interface_owned_ips, compute_ip_interface_owners, InterfaceOwnedIps, IpInterfaceOwners,
};
pub use rib::Rib;
pub use route::{Route, RoutingProtocol};
pub use snapshot::{DataplaneSnapshot, PerVrf};
pub use topology::Topology;
