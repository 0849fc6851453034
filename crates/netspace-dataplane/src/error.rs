//! Snapshot consistency errors.

use std::error::Error;
use std::fmt;

use netspace_core::Edge;

/// A [`DataplaneSnapshot`](crate::DataplaneSnapshot) refers to something
/// it does not define.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    /// A RIB, FIB or topology edge names a host with no configuration.
    UnknownHost {
        /// The missing hostname.
        host: String,
        /// Where it was referenced, e.g. `"rib"` or an edge.
        referenced_by: String,
    },
    /// A topology edge names an interface its host does not have.
    UnknownInterface {
        /// Hostname.
        host: String,
        /// The missing interface.
        interface: String,
        /// The edge that referenced it.
        edge: Edge,
    },
    /// A RIB or FIB is keyed by a VRF no interface of the host uses.
    UnknownVrf {
        /// Hostname.
        host: String,
        /// The unused VRF name.
        vrf: String,
    },
    /// A FIB forwards out of an interface its host does not have.
    UnknownEgressInterface {
        /// Hostname.
        host: String,
        /// VRF of the FIB.
        vrf: String,
        /// The missing interface.
        interface: String,
    },
    /// A FIB exists without the RIB it was derived from.
    MissingRib {
        /// Hostname.
        host: String,
        /// VRF name.
        vrf: String,
    },
    /// A RIB exists without a FIB.
    MissingFib {
        /// Hostname.
        host: String,
        /// VRF name.
        vrf: String,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHost {
                host,
                referenced_by,
            } => write!(f, "unknown host '{host}' referenced by {referenced_by}"),
            Self::UnknownInterface {
                host,
                interface,
                edge,
            } => write!(
                f,
                "edge {edge} references unknown interface '{interface}' on host '{host}'"
            ),
            Self::UnknownVrf { host, vrf } => {
                write!(f, "host '{host}' has no interface in vrf '{vrf}'")
            }
            Self::UnknownEgressInterface {
                host,
                vrf,
                interface,
            } => write!(
                f,
                "fib for {host}/{vrf} forwards out of unknown interface '{interface}'"
            ),
            Self::MissingRib { host, vrf } => {
                write!(f, "fib for {host}/{vrf} has no matching rib")
            }
            Self::MissingFib { host, vrf } => {
                write!(f, "rib for {host}/{vrf} has no matching fib")
            }
        }
    }
}

impl Error for SnapshotError {}
