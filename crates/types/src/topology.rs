//! Contact graph as supplied by a graph provider, and its validated form.
//!
//! A [`ContactGraph`] mirrors what a provider hands over: a set of nodes
//! and a list of undirected edges whose weight attribute may be missing.
//! [`ContactTopology`] is the validated, immutable adjacency structure a
//! simulator owns. Converting one into the other copies every node and
//! edge, so later changes to either side are invisible to the other.

use crate::NodeKey;
use indexmap::{IndexMap, IndexSet};
use std::fmt::Debug;

/// An undirected edge as supplied by a graph provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<N> {
    pub a: N,
    pub b: N,
    /// Per-step transmission probability. `None` if the provider did not set it.
    pub weight: Option<f64>,
}

/// Weighted undirected contact graph before validation.
///
/// Node order is insertion order; it fixes the order in which a simulator
/// scans nodes and therefore the order of random draws.
#[derive(Debug, Clone)]
pub struct ContactGraph<N> {
    nodes: IndexSet<N>,
    edges: Vec<Edge<N>>,
}

impl<N: NodeKey> ContactGraph<N> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: IndexSet::new(),
            edges: Vec::new(),
        }
    }

    /// Build a graph from weighted edges. Endpoints are added as nodes in
    /// order of first appearance.
    pub fn from_edges(edges: impl IntoIterator<Item = (N, N, f64)>) -> Self {
        let mut graph = Self::new();
        for (a, b, weight) in edges {
            graph.add_edge(a, b, weight);
        }
        graph
    }

    /// Add a node. Adding an existing node is a no-op.
    pub fn add_node(&mut self, node: N) {
        self.nodes.insert(node);
    }

    /// Add a weighted edge, adding missing endpoints.
    pub fn add_edge(&mut self, a: N, b: N, weight: f64) {
        self.push_edge(a, b, Some(weight));
    }

    /// Add an edge without a weight attribute.
    ///
    /// Such a graph cannot be simulated; conversion to [`ContactTopology`]
    /// reports [`GraphError::MissingWeight`].
    pub fn add_unweighted_edge(&mut self, a: N, b: N) {
        self.push_edge(a, b, None);
    }

    fn push_edge(&mut self, a: N, b: N, weight: Option<f64>) {
        self.nodes.insert(a.clone());
        self.nodes.insert(b.clone());
        self.edges.push(Edge { a, b, weight });
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    /// Check whether a node exists.
    pub fn contains_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges as supplied, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl<N: NodeKey> Default for ContactGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when validating a contact graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An edge has no weight attribute.
    #[error("edge {a} -- {b} has no weight")]
    MissingWeight { a: String, b: String },

    /// An edge weight is not a probability.
    #[error("edge {a} -- {b} has weight {weight}, expected a value in [0, 1]")]
    WeightOutOfRange { a: String, b: String, weight: f64 },

    /// An edge connects a node to itself.
    #[error("self-loop on node {0}")]
    SelfLoop(String),

    /// Two edges connect the same pair of nodes.
    #[error("more than one edge between {a} and {b}")]
    DuplicateEdge { a: String, b: String },
}

fn key<N: Debug>(node: &N) -> String {
    format!("{:?}", node)
}

/// Validated, immutable weighted adjacency.
#[derive(Debug, Clone)]
pub struct ContactTopology<N> {
    adjacency: IndexMap<N, IndexMap<N, f64>>,
    edge_count: usize,
}

impl<N: NodeKey> ContactTopology<N> {
    /// Validate `graph` and copy it into an adjacency structure.
    ///
    /// Every edge is checked before anything is returned, so a failure
    /// never yields a partially built topology.
    pub fn from_graph(graph: &ContactGraph<N>) -> Result<Self, GraphError> {
        let mut adjacency: IndexMap<N, IndexMap<N, f64>> = graph
            .nodes()
            .map(|node| (node.clone(), IndexMap::new()))
            .collect();

        for edge in graph.edges() {
            let weight = edge.weight.ok_or_else(|| GraphError::MissingWeight {
                a: key(&edge.a),
                b: key(&edge.b),
            })?;
            if !(0.0..=1.0).contains(&weight) {
                return Err(GraphError::WeightOutOfRange {
                    a: key(&edge.a),
                    b: key(&edge.b),
                    weight,
                });
            }
            if edge.a == edge.b {
                return Err(GraphError::SelfLoop(key(&edge.a)));
            }

            let duplicate = adjacency
                .entry(edge.a.clone())
                .or_default()
                .insert(edge.b.clone(), weight)
                .is_some();
            if duplicate {
                return Err(GraphError::DuplicateEdge {
                    a: key(&edge.a),
                    b: key(&edge.b),
                });
            }
            adjacency
                .entry(edge.b.clone())
                .or_default()
                .insert(edge.a.clone(), weight);
        }

        Ok(Self {
            adjacency,
            edge_count: graph.edge_count(),
        })
    }

    /// Nodes in the provider's insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    /// Neighbors of `node` with the weight of the connecting edge.
    ///
    /// Unknown nodes have no neighbors.
    pub fn neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = (&'a N, f64)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(n, w)| (n, *w)))
    }

    /// Weight of the edge between `a` and `b`, if there is one.
    pub fn weight(&self, a: &N, b: &N) -> Option<f64> {
        self.adjacency.get(a).and_then(|edges| edges.get(b)).copied()
    }

    /// Number of edges incident to `node`.
    pub fn degree(&self, node: &N) -> usize {
        self.adjacency.get(node).map_or(0, IndexMap::len)
    }

    /// Check whether a node exists.
    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

impl<N: NodeKey> TryFrom<&ContactGraph<N>> for ContactTopology<N> {
    type Error = GraphError;

    fn try_from(graph: &ContactGraph<N>) -> Result<Self, Self::Error> {
        Self::from_graph(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ContactGraph<&'static str> {
        ContactGraph::from_edges([("a", "b", 0.5), ("b", "c", 0.25), ("c", "a", 1.0)])
    }

    #[test]
    fn test_topology_from_graph() {
        let topology = ContactTopology::from_graph(&triangle()).unwrap();

        assert_eq!(topology.node_count(), 3);
        assert_eq!(topology.edge_count(), 3);
        assert_eq!(topology.weight(&"a", &"b"), Some(0.5));
        assert_eq!(topology.weight(&"b", &"a"), Some(0.5));
        assert_eq!(topology.weight(&"a", &"z"), None);
        assert_eq!(topology.degree(&"c"), 2);
        assert_eq!(
            topology.nodes().copied().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_isolated_node_is_kept() {
        let mut graph = triangle();
        graph.add_node("d");
        let topology = ContactTopology::from_graph(&graph).unwrap();

        assert!(topology.contains_node(&"d"));
        assert_eq!(topology.degree(&"d"), 0);
        assert_eq!(topology.neighbors(&"d").count(), 0);
    }

    #[test]
    fn test_missing_weight_rejected() {
        let mut graph = triangle();
        graph.add_unweighted_edge("a", "d");

        let err = ContactTopology::from_graph(&graph).unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingWeight {
                a: "\"a\"".into(),
                b: "\"d\"".into()
            }
        );
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        let graph = ContactGraph::from_edges([(1u32, 2u32, 1.5)]);
        assert!(matches!(
            ContactTopology::from_graph(&graph),
            Err(GraphError::WeightOutOfRange { .. })
        ));

        let graph = ContactGraph::from_edges([(1u32, 2u32, f64::NAN)]);
        assert!(matches!(
            ContactTopology::from_graph(&graph),
            Err(GraphError::WeightOutOfRange { .. })
        ));
    }

    #[test]
    fn test_self_loop_rejected() {
        let graph = ContactGraph::from_edges([(7u32, 7u32, 0.1)]);
        assert_eq!(
            ContactTopology::from_graph(&graph).unwrap_err(),
            GraphError::SelfLoop("7".into())
        );
    }

    #[test]
    fn test_duplicate_edge_rejected_in_either_direction() {
        let graph = ContactGraph::from_edges([(1u32, 2u32, 0.1), (2u32, 1u32, 0.2)]);
        assert!(matches!(
            ContactTopology::from_graph(&graph),
            Err(GraphError::DuplicateEdge { .. })
        ));
    }

    #[test]
    fn test_topology_is_independent_copy() {
        let mut graph = triangle();
        let topology = ContactTopology::from_graph(&graph).unwrap();

        graph.add_edge("a", "e", 0.9);

        assert!(!topology.contains_node(&"e"));
        assert_eq!(topology.degree(&"a"), 2);
    }
}
