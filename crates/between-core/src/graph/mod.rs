//! Graph model for centrality computation.
//!
//! # Overview
//!
//! A graph arrives as an [`EdgeList`] (usually from [`parse`]) and is turned
//! into one of two representations, both accepted by the shortest-path
//! engines in [`crate::engine`]:
//!
//! - [`WeightMatrix`]: dense `N×N` matrix in one contiguous buffer. Missing
//!   edges hold the [`UNREACHABLE`] sentinel.
//! - [`SparseGraph`]: petgraph adjacency list, better suited to large graphs
//!   with few edges per node.
//!
//! ## Pipeline
//!
//! ```text
//! text file
//!        ↓  parse::read_graph()
//! EdgeList (node_count + raw directed edges, 0-based)
//!        ↓  WeightMatrix::from_edge_list() / SparseGraph::from_edge_list()
//! weight representation (parallel edges collapsed to their minimum)
//!        ↓  ShortestPathEngine::shortest_paths()
//! ShortestPaths
//! ```
//!
//! ## Sentinel arithmetic
//!
//! [`UNREACHABLE`] is `i64::MAX`. Input weights are `i32`, so every finite
//! simple-path sum stays far below it. Sums involving the sentinel are never
//! formed: use [`path_sum`].

pub mod matrix;
pub mod parse;
pub mod sparse;

pub use matrix::WeightMatrix;
pub use parse::{parse_graph, read_graph};
pub use sparse::SparseGraph;

use crate::engine::PredecessorSet;
use crate::error::GraphError;

/// Signed path or edge weight.
pub type Weight = i64;

/// Sentinel for "no known path".
pub const UNREACHABLE: Weight = Weight::MAX;

/// Add two path weights, returning `None` if either side is [`UNREACHABLE`].
///
/// Sums saturate at `i64::MIN`; distances only fall that far while a
/// negative cycle is being unrolled.
#[must_use]
#[inline]
pub const fn path_sum(a: Weight, b: Weight) -> Option<Weight> {
    if a == UNREACHABLE || b == UNREACHABLE {
        None
    } else {
        Some(a.saturating_add(b))
    }
}

/// Number of ordered pairs in a graph of `node_count` nodes.
///
/// Every engine materializes one distance and one predecessor set per pair,
/// so `N²` entries of the wider of the two must fit in `isize::MAX` bytes.
///
/// # Errors
///
/// Returns [`GraphError::TooManyNodes`] when they do not.
pub fn pair_count(node_count: usize) -> Result<usize, GraphError> {
    let entry = size_of::<Weight>().max(size_of::<PredecessorSet>());
    node_count
        .checked_mul(node_count)
        .filter(|&pairs| {
            pairs
                .checked_mul(entry)
                .is_some_and(|bytes| bytes <= isize::MAX.unsigned_abs())
        })
        .ok_or(GraphError::TooManyNodes { node_count })
}

/// A directed, weighted edge between 0-based node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: Weight,
}

impl Edge {
    #[must_use]
    pub const fn new(source: usize, target: usize, weight: Weight) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Representation-neutral graph description: a node count and a multiset of
/// directed edges. Duplicates and self-loops are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    pub node_count: usize,
    pub edges: Vec<Edge>,
}

impl EdgeList {
    #[must_use]
    pub const fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    /// Build from `(source, target, weight)` triples.
    #[must_use]
    pub fn from_triples(node_count: usize, triples: &[(usize, usize, Weight)]) -> Self {
        Self {
            node_count,
            edges: triples
                .iter()
                .map(|&(s, t, w)| Edge::new(s, t, w))
                .collect(),
        }
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Fraction of the `N²` possible directed edges that are present.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        if self.node_count == 0 {
            return 0.0;
        }
        let n = self.node_count as f64;
        self.edges.len() as f64 / (n * n)
    }

    /// True if some edge could take part in a zero-length path segment.
    ///
    /// That needs a zero-weight edge or a negative one. Self-loops of
    /// non-negative weight never lower a distance and are not counted.
    #[must_use]
    pub fn has_non_positive_edge(&self) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.weight < 0 || (edge.weight == 0 && !edge.is_self_loop()))
    }
}
