//! Serialized form of [`IpSpace`].
//!
//! Spaces serialize as an internally tagged tree:
//!
//! ```json
//! {"type": "acl", "lines": [
//!     {"action": "deny", "space": {"type": "prefix", "prefix": "10.1.0.0/16"}},
//!     {"action": "permit", "space": {"type": "universe"}}
//! ]}
//! ```
//!
//! Deserialization goes back through the global [`SpaceInterner`], so the
//! empty and universe singletons, and every elementary space, come back
//! as the shared instances.

use netspace_core::{Ip, IpWildcard, Prefix};
use serde::{Deserialize, Serialize};

use crate::interner::SpaceInterner;
use crate::space::{AclLine, IpSpace, IpSpaceKind};

/// Mirror of [`IpSpaceKind`] with serde attributes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpSpaceRepr {
    /// See [`IpSpaceKind::Empty`].
    Empty,
    /// See [`IpSpaceKind::Universe`].
    Universe,
    /// See [`IpSpaceKind::Ip`].
    Ip {
        /// The address.
        ip: Ip,
    },
    /// See [`IpSpaceKind::Prefix`].
    Prefix {
        /// The prefix.
        prefix: Prefix,
    },
    /// See [`IpSpaceKind::Wildcard`].
    Wildcard {
        /// The wildcard.
        wildcard: IpWildcard,
    },
    /// See [`IpSpaceKind::WildcardSet`].
    WildcardSet {
        /// Included wildcards.
        include: Vec<IpWildcard>,
        /// Excluded wildcards.
        #[serde(default)]
        exclude: Vec<IpWildcard>,
    },
    /// See [`IpSpaceKind::Acl`].
    Acl {
        /// Ordered lines.
        lines: Vec<AclLine>,
    },
    /// See [`IpSpaceKind::Reference`].
    Reference {
        /// Referenced name.
        name: String,
    },
}

impl From<IpSpace> for IpSpaceRepr {
    fn from(space: IpSpace) -> Self {
        match space.kind() {
            IpSpaceKind::Empty => Self::Empty,
            IpSpaceKind::Universe => Self::Universe,
            IpSpaceKind::Ip(ip) => Self::Ip { ip: *ip },
            IpSpaceKind::Prefix(prefix) => Self::Prefix { prefix: *prefix },
            IpSpaceKind::Wildcard(wildcard) => Self::Wildcard {
                wildcard: *wildcard,
            },
            IpSpaceKind::WildcardSet { include, exclude } => Self::WildcardSet {
                include: include.clone(),
                exclude: exclude.clone(),
            },
            IpSpaceKind::Acl(lines) => Self::Acl {
                lines: lines.clone(),
            },
            IpSpaceKind::Reference(name) => Self::Reference { name: name.clone() },
        }
    }
}

impl From<IpSpaceRepr> for IpSpace {
    fn from(repr: IpSpaceRepr) -> Self {
        let interner = SpaceInterner::global();
        match repr {
            IpSpaceRepr::Empty => SpaceInterner::empty(),
            IpSpaceRepr::Universe => SpaceInterner::universe(),
            IpSpaceRepr::Ip { ip } => interner.ip(ip),
            // Zero-length prefixes only serialize from `IpSpace::whole_family`.
            IpSpaceRepr::Prefix { prefix } => interner.intern(IpSpaceKind::Prefix(prefix)),
            IpSpaceRepr::Wildcard { wildcard } => interner.wildcard(wildcard),
            IpSpaceRepr::WildcardSet {
                mut include,
                mut exclude,
            } => {
                if include.is_empty() {
                    return SpaceInterner::empty();
                }
                include.sort_unstable();
                include.dedup();
                exclude.sort_unstable();
                exclude.dedup();
                IpSpace::from_kind(IpSpaceKind::WildcardSet { include, exclude })
            }
            IpSpaceRepr::Acl { lines } if lines.is_empty() => SpaceInterner::empty(),
            IpSpaceRepr::Acl { lines } => IpSpace::from_kind(IpSpaceKind::Acl(lines)),
            IpSpaceRepr::Reference { name } => interner.reference(name),
        }
    }
}
