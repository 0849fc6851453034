//! Topology identifiers: node/interface pairs and directed edges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the pseudo-interface that discards traffic.
///
/// Routes resolving to this interface are null routes. It never appears
/// in the topology and does not belong to any single VRF's forwarding.
pub const NULL_INTERFACE_NAME: &str = "null_interface";

/// A `(hostname, interface)` pair identifying one end of a link.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeInterfacePair {
    hostname: String,
    interface: String,
}

impl NodeInterfacePair {
    /// Create a pair from a hostname and interface name.
    pub fn new(hostname: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            interface: interface.into(),
        }
    }

    /// Device hostname.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Interface name on that device.
    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl fmt::Display for NodeInterfacePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.hostname, self.interface)
    }
}

impl fmt::Debug for NodeInterfacePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// A directed physical adjacency from a tail interface to a head
/// interface.
///
/// Traffic leaves the tail and arrives at the head; ARP requests sent
/// out of the tail are answered (or not) by the head.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    tail: NodeInterfacePair,
    head: NodeInterfacePair,
}

impl Edge {
    /// Create an edge from its two endpoints.
    pub fn new(tail: NodeInterfacePair, head: NodeInterfacePair) -> Self {
        Self { tail, head }
    }

    /// Shorthand for `Edge::new` from four names.
    pub fn from_names(
        tail_host: impl Into<String>,
        tail_interface: impl Into<String>,
        head_host: impl Into<String>,
        head_interface: impl Into<String>,
    ) -> Self {
        Self::new(
            NodeInterfacePair::new(tail_host, tail_interface),
            NodeInterfacePair::new(head_host, head_interface),
        )
    }

    /// Sending end.
    pub fn tail(&self) -> &NodeInterfacePair {
        &self.tail
    }

    /// Receiving end.
    pub fn head(&self) -> &NodeInterfacePair {
        &self.head
    }

    /// The same link in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            tail: self.head.clone(),
            head: self.tail.clone(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.tail, self.head)
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_swaps_ends() {
        let e = Edge::from_names("a", "e0", "b", "e1");
        let r = e.reversed();
        assert_eq!(r.tail(), e.head());
        assert_eq!(r.head(), e.tail());
        assert_eq!(r.reversed(), e);
    }

    #[test]
    fn display_forms() {
        let e = Edge::from_names("a", "e0", "b", "e1");
        assert_eq!(e.to_string(), "a[e0] -> b[e1]");
    }
}
