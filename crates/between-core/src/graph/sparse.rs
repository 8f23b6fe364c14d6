//! Adjacency-list graph backed by petgraph.
//!
//! Functionally equivalent to [`super::WeightMatrix`] for the engines: the
//! same parallel-edge collapse applies, and a self-loop is only kept when it
//! is negative (the only case in which it can beat the implicit zero
//! self-distance).

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;

use super::{EdgeList, Weight, pair_count};

/// Directed weighted graph with node `i` stored at `NodeIndex::new(i)`.
#[derive(Debug, Clone)]
pub struct SparseGraph {
    graph: DiGraph<(), Weight>,
}

impl SparseGraph {
    /// Build an edgeless graph with `n` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyNodes`] if `n` exceeds petgraph's `u32`
    /// index space or the `n²` result tables cannot be allocated.
    pub fn new(n: usize) -> Result<Self, GraphError> {
        pair_count(n)?;
        if u32::try_from(n).is_err() {
            return Err(GraphError::TooManyNodes { node_count: n });
        }

        let mut graph = DiGraph::with_capacity(n, 0);
        for _ in 0..n {
            graph.add_node(());
        }
        Ok(Self { graph })
    }

    /// Build from every edge in `list`.
    ///
    /// # Errors
    ///
    /// See [`SparseGraph::new`] and [`SparseGraph::add_edge`].
    pub fn from_edge_list(list: &EdgeList) -> Result<Self, GraphError> {
        let mut sparse = Self::new(list.node_count)?;
        for edge in &list.edges {
            sparse.add_edge(edge.source, edge.target, edge.weight)?;
        }
        Ok(sparse)
    }

    /// Record a directed edge, keeping only the lightest of parallel edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] if `u` or `v` is not a node.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: Weight) -> Result<(), GraphError> {
        let node_count = self.node_count();
        for node in [u, v] {
            if node >= node_count {
                return Err(GraphError::NodeOutOfRange { node, node_count });
            }
        }

        if u == v && weight >= 0 {
            return Ok(());
        }

        let (a, b) = (NodeIndex::new(u), NodeIndex::new(v));
        match self.graph.find_edge(a, b) {
            Some(idx) => {
                if let Some(existing) = self.graph.edge_weight_mut(idx) {
                    *existing = (*existing).min(weight);
                }
            }
            None => {
                self.graph.add_edge(a, b, weight);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing `(target, weight)` pairs of node `u`.
    pub fn out_edges(&self, u: usize) -> impl Iterator<Item = (usize, Weight)> + '_ {
        self.graph
            .edges(NodeIndex::new(u))
            .map(|e| (e.target().index(), *e.weight()))
    }

    /// Every edge as `(source, target, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, Weight)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_edges_collapse_to_minimum() {
        let list = EdgeList::from_triples(2, &[(0, 1, 5), (0, 1, 2), (0, 1, 8)]);
        let g = SparseGraph::from_edge_list(&list).expect("valid");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.out_edges(0).collect::<Vec<_>>(), vec![(1, 2)]);
    }

    #[test]
    fn non_negative_self_loops_are_dropped() {
        let list = EdgeList::from_triples(2, &[(0, 0, 3), (1, 1, 0), (1, 1, -1)]);
        let g = SparseGraph::from_edge_list(&list).expect("valid");
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(1, 1, -1)]);
    }

    #[test]
    fn out_of_range_endpoint_is_rejected() {
        let list = EdgeList::from_triples(2, &[(5, 0, 1)]);
        let err = SparseGraph::from_edge_list(&list).expect_err("source out of range");
        assert!(matches!(err, GraphError::NodeOutOfRange { node: 5, .. }));
    }

    #[test]
    fn oversized_node_count_is_an_error() {
        let err = SparseGraph::from_edge_list(&EdgeList::new(4_294_967_297))
            .expect_err("beyond the u32 index space");
        assert!(matches!(err, GraphError::TooManyNodes { .. }));
    }
}
