//! Netspace: symbolic IP address spaces and forwarding/ARP reachability
//! analysis for network dataplanes.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all netspace sub-crates. For most users, adding `netspace` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use netspace::prelude::*;
//!
//! // Two routers on 9.9.9.0/24; `a` reaches 2.0.0.0/16 through `b`.
//! let a = Configuration::builder("a")
//!     .interface(Interface::builder("e0").address("9.9.9.1/24".parse()?).build())
//!     .build();
//! let b = Configuration::builder("b")
//!     .interface(Interface::builder("e0").address("9.9.9.9/24".parse()?).build())
//!     .build();
//! let rib_a = Rib::from_routes([
//!     Route::connected("9.9.9.0/24".parse()?, "e0"),
//!     Route::static_via_ip("2.0.0.0/16".parse()?, "9.9.9.9".parse()?),
//! ]);
//! let rib_b = Rib::from_routes([Route::connected("9.9.9.0/24".parse()?, "e0")]);
//!
//! let link = Edge::from_names("a", "e0", "b", "e0");
//! let snapshot = DataplaneSnapshot::new()
//!     .with_configuration(a)
//!     .with_configuration(b)
//!     .with_rib("a", DEFAULT_VRF_NAME, rib_a, &FibConfig::default())
//!     .with_rib("b", DEFAULT_VRF_NAME, rib_b, &FibConfig::default())
//!     .with_topology(Topology::bidirectional([link.clone()]));
//!
//! let analysis = ForwardingAnalysis::compute(&snapshot, &AnalysisConfig::default())?;
//! assert!(analysis.arp_true_edge_for(&link).contains_ip("2.0.0.5".parse()?));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `netspace-core` | Addresses, prefixes, wildcards, interface pairs, edges |
//! | [`ipspace`] | `netspace-ipspace` | The `IpSpace` algebra, builders, interner, visitor |
//! | [`trie`] | `netspace-trie` | Prefix trie multimap |
//! | [`dataplane`] | `netspace-dataplane` | Devices, routes, RIB, FIB, topology, snapshots |
//! | [`forwarding`] | `netspace-forwarding` | The forwarding/ARP analysis |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Addresses and identifiers (`netspace-core`).
pub use netspace_core as types;

/// IP address-set algebra (`netspace-ipspace`).
///
/// [`ipspace::IpSpace`] is the value every relation is expressed in.
pub use netspace_ipspace as ipspace;

/// Prefix trie multimap (`netspace-trie`).
pub use netspace_trie as trie;

/// Dataplane model (`netspace-dataplane`).
///
/// Build a [`dataplane::DataplaneSnapshot`] from configurations, RIBs,
/// FIBs and a topology.
pub use netspace_dataplane as dataplane;

/// Forwarding and ARP reachability analysis (`netspace-forwarding`).
pub use netspace_forwarding as forwarding;

/// Common imports for typical netspace usage.
///
/// ```rust
/// use netspace::prelude::*;
/// ```
pub mod prelude {
    // Addresses
    pub use netspace_core::{
        AddressError, AddressFamily, Edge, Ip, IpWildcard, NodeInterfacePair, Prefix,
        NULL_INTERFACE_NAME,
    };

    // Spaces
    pub use netspace_ipspace::{AclSpaceBuilder, IpSpace, IpSpaceKind, WildcardSetBuilder};

    // Trie
    pub use netspace_trie::PrefixTrieMultiMap;

    // Dataplane
    pub use netspace_dataplane::{
        Configuration, DataplaneSnapshot, Fib, FibConfig, Interface, InterfaceAddress, Rib, Route,
        SnapshotError, Topology, VrrpGroup, DEFAULT_VRF_NAME,
    };

    // Analysis
    pub use netspace_forwarding::{AnalysisConfig, AnalysisError, ForwardingAnalysis, Relation};
}
