//! Dense weight matrix.

#![allow(clippy::module_name_repetitions)]

use crate::error::GraphError;

use super::{Edge, EdgeList, UNREACHABLE, Weight, pair_count};

/// `N×N` edge-weight matrix stored row-major in a single buffer.
///
/// `W[i][i]` starts at 0 and every off-diagonal entry at [`UNREACHABLE`].
/// Edges only ever lower an entry, so parallel edges collapse to their
/// minimum and a negative self-loop can pull the diagonal below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightMatrix {
    n: usize,
    weights: Vec<Weight>,
}

impl WeightMatrix {
    /// Build an edgeless matrix: each node reaches only itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyNodes`] if `n²` cells cannot be allocated.
    pub fn new(n: usize) -> Result<Self, GraphError> {
        let mut weights = vec![UNREACHABLE; pair_count(n)?];
        for i in 0..n {
            weights[i * n + i] = 0;
        }
        Ok(Self { n, weights })
    }

    /// Build a matrix from every edge in `list`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TooManyNodes`] for an unaddressable node count
    /// and [`GraphError::NodeOutOfRange`] if an edge endpoint is not a node
    /// of the graph.
    pub fn from_edge_list(list: &EdgeList) -> Result<Self, GraphError> {
        Self::from_edges(list.node_count, &list.edges)
    }

    /// Build a matrix with `n` nodes from `edges`.
    ///
    /// # Errors
    ///
    /// See [`WeightMatrix::new`] and [`WeightMatrix::add_edge`].
    pub fn from_edges(n: usize, edges: &[Edge]) -> Result<Self, GraphError> {
        let mut matrix = Self::new(n)?;
        for edge in edges {
            matrix.add_edge(edge.source, edge.target, edge.weight)?;
        }
        Ok(matrix)
    }

    /// Record a directed edge, keeping it only if it is strictly lighter
    /// than what is stored for `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] if `u` or `v` is `>= n`.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: Weight) -> Result<(), GraphError> {
        for node in [u, v] {
            if node >= self.n {
                return Err(GraphError::NodeOutOfRange {
                    node,
                    node_count: self.n,
                });
            }
        }

        let slot = &mut self.weights[u * self.n + v];
        if weight < *slot {
            *slot = weight;
        }
        Ok(())
    }

    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.n
    }

    /// Weight of `(i, j)`, [`UNREACHABLE`] when there is no edge.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Weight {
        assert!(i < self.n && j < self.n, "({i}, {j}) outside {0}x{0}", self.n);
        self.weights[i * self.n + j]
    }

    /// Row-major view of the whole matrix.
    #[must_use]
    pub fn as_slice(&self) -> &[Weight] {
        &self.weights
    }
}
