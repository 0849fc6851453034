//! Core types for the netspace forwarding analysis workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the address-level vocabulary shared by every other crate: IP
//! addresses of either family, canonical prefixes, wildcard masks,
//! topology identifiers, and the address error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod ip;
pub mod prefix;
pub mod wildcard;

pub use error::AddressError;
pub use id::{Edge, NodeInterfacePair, NULL_INTERFACE_NAME};
pub use ip::{AddressFamily, Ip};
pub use prefix::Prefix;
pub use wildcard::IpWildcard;
