//! Forwarding and ARP reachability analysis for netspace.
//!
//! [`ForwardingAnalysis::compute`] takes one [`DataplaneSnapshot`] and
//! derives, as [`IpSpace`] values keyed by host, VRF, interface or
//! topology edge, which destinations each interface forwards, which of
//! them get an ARP reply across an edge, and which never do.
//!
//! # Stages
//!
//! Relations are computed in the fixed order of [`Relation::ALL`]; each
//! depends only on relations before it. Within a stage, hosts (or edges)
//! are independent and run on a rayon pool when
//! [`AnalysisConfig::parallel`] is set and the snapshot is large enough.
//! Results do not depend on the execution mode.
//!
//! # Missing data
//!
//! A key absent from an input or intermediate map means "nothing", not
//! "unknown": it contributes the empty space. Malformed snapshots are
//! rejected up front by [`DataplaneSnapshot::validate`].
//!
//! [`DataplaneSnapshot`]: netspace_dataplane::DataplaneSnapshot
//! [`DataplaneSnapshot::validate`]: netspace_dataplane::DataplaneSnapshot::validate
//! [`IpSpace`]: netspace_ipspace::IpSpace

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod relation;

mod arp;
mod boundary;
mod executor;
mod reachability;
mod routes;

pub use analysis::ForwardingAnalysis;
pub use config::{AnalysisConfig, ConfigError};
pub use error::AnalysisError;
pub use relation::{EdgeMap, HostInterfaceMap, HostVrfInterfaceMap, HostVrfMap, Relation, RouteSet};
