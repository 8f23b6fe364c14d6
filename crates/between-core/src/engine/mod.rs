//! All-pairs shortest paths with complete predecessor sets.
//!
//! # Overview
//!
//! Betweenness needs more than one shortest path per pair: when several
//! paths tie, each of them carries an equal share. The engines here record,
//! for every ordered pair `(i, j)`, the **set** of nodes that immediately
//! precede `j` on at least one shortest `i → j` path.
//!
//! Two engines implement [`ShortestPathEngine`]:
//!
//! - [`WeightMatrix`](crate::graph::WeightMatrix): generalized
//!   Floyd–Warshall ([`floyd_warshall`]), `O(N³)`.
//! - [`SparseGraph`](crate::graph::SparseGraph): Johnson's algorithm
//!   ([`johnson`]), `O(N·M·log N)` after one Bellman–Ford pass.
//!
//! Both fail with [`EngineError::NegativeCycle`] when a cycle of negative
//! total weight makes shortest paths undefined. They agree on every graph
//! whose edge weights are all positive; [`EngineKind::resolve_for`] keeps
//! any other graph on Floyd–Warshall.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::graph::{EdgeList, UNREACHABLE, Weight};

pub mod floyd_warshall;
pub mod johnson;

/// Computes [`ShortestPaths`] without mutating the graph it reads.
pub trait ShortestPathEngine {
    /// Number of nodes the result will cover.
    fn node_count(&self) -> usize;

    /// Compute distances and predecessor sets for every ordered pair.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NegativeCycle`] if the graph contains a cycle
    /// of negative total weight. No partial result is returned.
    fn shortest_paths(&self) -> Result<ShortestPaths, EngineError>;
}

// ---------------------------------------------------------------------------
// PredecessorSet
// ---------------------------------------------------------------------------

/// Duplicate-free set of predecessor node indices, kept sorted.
///
/// The empty set is the "absent" marker: the pair is either `(i, i)` or
/// the target is unreachable from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PredecessorSet(Vec<usize>);

impl PredecessorSet {
    /// The absent marker.
    #[must_use]
    pub const fn absent() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn single(node: usize) -> Self {
        Self(vec![node])
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, node: usize) -> bool {
        self.0.binary_search(&node).is_ok()
    }

    /// Add `node`; returns `false` if it was already present.
    pub fn insert(&mut self, node: usize) -> bool {
        match self.0.binary_search(&node) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, node);
                true
            }
        }
    }

    /// Add every member of `other` not already present.
    pub fn merge(&mut self, other: &Self) {
        for &node in &other.0 {
            self.insert(node);
        }
    }

    /// Replace the contents with a copy of `other`, reusing the allocation.
    pub fn replace_with(&mut self, other: &Self) {
        self.0.clone_from(&other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl FromIterator<usize> for PredecessorSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut nodes: Vec<usize> = iter.into_iter().collect();
        nodes.sort_unstable();
        nodes.dedup();
        Self(nodes)
    }
}

// ---------------------------------------------------------------------------
// ShortestPaths
// ---------------------------------------------------------------------------

/// Distances `D` and predecessor sets `P` for all ordered pairs, stored
/// row-major (`i * n + j`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths {
    n: usize,
    distances: Vec<Weight>,
    predecessors: Vec<PredecessorSet>,
}

impl ShortestPaths {
    pub(crate) fn from_parts(
        n: usize,
        distances: Vec<Weight>,
        predecessors: Vec<PredecessorSet>,
    ) -> Self {
        debug_assert_eq!(distances.len(), n * n);
        debug_assert_eq!(predecessors.len(), n * n);
        Self {
            n,
            distances,
            predecessors,
        }
    }

    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.n
    }

    /// Shortest `i → j` weight, [`UNREACHABLE`] if there is no path.
    #[must_use]
    pub fn distance(&self, i: usize, j: usize) -> Weight {
        self.distances[i * self.n + j]
    }

    #[must_use]
    pub fn is_reachable(&self, i: usize, j: usize) -> bool {
        self.distance(i, j) != UNREACHABLE
    }

    /// Nodes immediately preceding `j` on shortest `i → j` paths.
    #[must_use]
    pub fn predecessors(&self, i: usize, j: usize) -> &PredecessorSet {
        &self.predecessors[i * self.n + j]
    }

    /// All predecessor sets for paths starting at `source`, indexed by target.
    #[must_use]
    pub fn predecessor_row(&self, source: usize) -> &[PredecessorSet] {
        &self.predecessors[source * self.n..(source + 1) * self.n]
    }

    /// Total number of predecessor entries across all pairs.
    #[must_use]
    pub fn predecessor_entries(&self) -> usize {
        self.predecessors.iter().map(PredecessorSet::len).sum()
    }
}

// ---------------------------------------------------------------------------
// EngineKind
// ---------------------------------------------------------------------------

/// Which engine to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Floyd–Warshall over a [`WeightMatrix`](crate::graph::WeightMatrix).
    Dense,
    /// Johnson over a [`SparseGraph`](crate::graph::SparseGraph).
    Sparse,
    /// Pick by edge density.
    #[default]
    Auto,
}

impl EngineKind {
    /// Resolve [`EngineKind::Auto`] given the graph density (`M / N²`).
    #[must_use]
    pub fn resolve(self, density: f64, sparse_threshold: f64) -> Self {
        match self {
            Self::Auto if density < sparse_threshold => Self::Sparse,
            Self::Auto => Self::Dense,
            other => other,
        }
    }

    /// Resolve against a concrete graph.
    ///
    /// Johnson's Dijkstra pass and Floyd–Warshall disagree on predecessors
    /// along zero-length path segments, which only exist when some edge
    /// weight is zero or negative. Such graphs always get [`Self::Dense`],
    /// even when [`Self::Sparse`] was asked for.
    #[must_use]
    pub fn resolve_for(self, list: &EdgeList, sparse_threshold: f64) -> Self {
        if list.has_non_positive_edge() {
            return Self::Dense;
        }
        self.resolve(list.density(), sparse_threshold)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Sparse => "sparse",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" | "floyd-warshall" => Ok(Self::Dense),
            "sparse" | "johnson" => Ok(Self::Sparse),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown engine `{other}` (expected dense, sparse or auto)")),
        }
    }
}
