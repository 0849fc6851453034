//! Layer-3 topology: directed edges between interfaces.

use indexmap::{IndexMap, IndexSet};
use netspace_core::{Edge, NodeInterfacePair};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Most interfaces have one or two neighbors.
type Neighbors = SmallVec<[NodeInterfacePair; 2]>;

/// A set of directed edges with neighbor lookup.
///
/// Links are usually present in both directions; [`Topology::bidirectional`]
/// adds the reverse of every edge it is given.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Edge>", into = "Vec<Edge>")]
pub struct Topology {
    edges: IndexSet<Edge>,
    /// tail → heads.
    neighbors: IndexMap<NodeInterfacePair, Neighbors>,
    /// Every interface touched by at least one edge, in either role.
    endpoints: IndexSet<NodeInterfacePair>,
}

impl Topology {
    /// A topology holding exactly `edges`.
    pub fn new<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut topology = Self::default();
        for edge in edges {
            topology.add_edge(edge);
        }
        topology
    }

    /// A topology holding every edge in `edges` and its reverse.
    pub fn bidirectional<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut topology = Self::default();
        for edge in edges {
            let reversed = edge.reversed();
            topology.add_edge(edge);
            topology.add_edge(reversed);
        }
        topology
    }

    /// Add a directed edge. Returns whether it was new.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.edges.contains(&edge) {
            return false;
        }
        self.neighbors
            .entry(edge.tail().clone())
            .or_default()
            .push(edge.head().clone());
        self.endpoints.insert(edge.tail().clone());
        self.endpoints.insert(edge.head().clone());
        self.edges.insert(edge)
    }

    /// Every edge, in insertion order.
    pub fn edges(&self) -> &IndexSet<Edge> {
        &self.edges
    }

    /// Interfaces reached by edges leaving `tail`.
    pub fn neighbors(&self, tail: &NodeInterfacePair) -> &[NodeInterfacePair] {
        self.neighbors.get(tail).map_or(&[], |n| n.as_slice())
    }

    /// Edges with `nip` at either end.
    pub fn interface_edges<'a>(
        &'a self,
        nip: &'a NodeInterfacePair,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.tail() == nip || e.head() == nip)
    }

    /// Whether any edge touches `nip`.
    pub fn has_edges(&self, nip: &NodeInterfacePair) -> bool {
        self.endpoints.contains(nip)
    }

    /// Number of directed edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether there are no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl PartialEq for Topology {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl Eq for Topology {}

impl From<Vec<Edge>> for Topology {
    fn from(edges: Vec<Edge>) -> Self {
        Self::new(edges)
    }
}

impl From<Topology> for Vec<Edge> {
    fn from(topology: Topology) -> Self {
        topology.edges.into_iter().collect()
    }
}

impl FromIterator<Edge> for Topology {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self::new(iter)
    }
}
