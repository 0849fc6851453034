//! IP address-set algebra for netspace.
//!
//! This crate defines [`IpSpace`], an immutable, cheaply clonable value
//! denoting a set of IP addresses, along with the builders that compose
//! spaces into ordered ACL-style unions and differences.
//!
//! # Variants
//!
//! [`IpSpaceKind`] is a closed sum type: empty, universe, single
//! address, prefix, wildcard, wildcard set, ordered ACL and named
//! reference. Every operation (`contains`, `complement`, traversal) is
//! an exhaustive match over it.
//!
//! # Interning
//!
//! Elementary spaces are handed out by a [`SpaceInterner`], so building
//! the same prefix twice yields the same shared allocation. `Empty` and
//! `Universe` are process-wide singletons, including after
//! deserialization.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod acl;
pub mod interner;
pub mod repr;
pub mod space;
pub mod visitor;
pub mod wildcard_set;

#[cfg(test)]
pub(crate) mod compliance;

pub use acl::AclSpaceBuilder;
pub use interner::SpaceInterner;
pub use space::{AclLine, IpSpace, IpSpaceKind, LineAction, NamedIpSpaces};
pub use visitor::IpSpaceVisitor;
pub use wildcard_set::WildcardSetBuilder;
