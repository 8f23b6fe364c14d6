//! Betweenness centrality from all-pairs predecessor sets.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. Given [`ShortestPaths`] from either engine,
//! this module counts, for every reachable ordered pair `(i, j)`, how many
//! distinct shortest paths there are and how many of them pass through each
//! node `k`, then adds the fraction to `k`'s score.
//!
//! # Algorithm
//!
//! For each source `i`:
//!
//! 1. Order the nodes topologically along predecessor links `p → c`
//!    (`p ∈ P[i][c]`) with Kahn's algorithm. Nodes with an absent
//!    predecessor set are roots.
//! 2. `sigma[c]`, the number of shortest paths from `i` to `c`, is computed
//!    once per node in that order: 1 for a root, otherwise the sum over its
//!    predecessors.
//! 3. For each destination `j` with a non-absent `P[i][j]`, walk back from
//!    `j` in reverse topological order. `tau[c]` counts predecessor chains
//!    from `c` down to `j`; each predecessor `p` of a visited `c` receives
//!    `sigma[p] * tau[c]` in the pass-through buffer, so that
//!    `pass_through[p]` ends as the number of `i → j` shortest paths via `p`.
//! 4. Every touched `k ≠ i` gains `pass_through[k] / sigma[j]`; the touched
//!    entries are then reset for the next destination.
//!
//! The destination `j` is not excluded from step 4. It is never a
//! predecessor within its own walk, so its pass-through count is 0 and the
//! addition is a no-op.
//!
//! Complexity per source: `O(N + E_P)` for steps 1–2 and `O(N + E_P)` per
//! destination, where `E_P` is the number of predecessor entries in row `i`.
//!
//! # Output
//!
//! One score per node, indexed like the input. Scores are **not**
//! normalized; divide by `(n-1)*(n-2)` for the directed convention.

use std::collections::VecDeque;

use tracing::{debug, instrument, warn};

use crate::engine::{PredecessorSet, ShortestPaths};

/// Compute betweenness centrality for every node.
///
/// Unreachable pairs contribute nothing. Nodes caught in a zero-weight
/// predecessor cycle cannot be ordered; pairs ending in them are skipped
/// with a warning.
#[must_use]
#[instrument(skip(paths), fields(n = paths.node_count()))]
pub fn betweenness_centrality(paths: &ShortestPaths) -> Vec<f64> {
    let n = paths.node_count();
    let mut scores = vec![0.0; n];
    let mut walk = SourceWalk::new(n);
    let mut pairs = 0_u64;

    for source in 0..n {
        walk.prepare(paths, source);
        let unordered = n - walk.order.len();
        if unordered > 0 {
            warn!(source, unordered, "zero-weight predecessor cycle; skipping affected pairs");
        }

        for dest in 0..n {
            let Some(total) = walk.count_pass_through(paths, dest) else {
                continue;
            };
            pairs += 1;

            for &k in &walk.touched {
                if k != source {
                    scores[k] += walk.pass_through[k] / total;
                }
            }
            walk.reset();
        }
    }

    debug!(pairs, "betweenness aggregation complete");
    scores
}

/// Pass-through counts for the single pair `(source, dest)`.
///
/// Entry `k` is the number of distinct shortest `source → dest` paths that
/// visit `k` before `dest`; entry `source` therefore equals the total path
/// count. Returns `None` when `dest` is not reachable from `source` (or
/// equals it).
#[must_use]
pub fn pass_through_counts(paths: &ShortestPaths, source: usize, dest: usize) -> Option<Vec<f64>> {
    let mut walk = SourceWalk::new(paths.node_count());
    walk.prepare(paths, source);
    walk.count_pass_through(paths, dest)?;
    Some(walk.pass_through)
}

/// Number of distinct shortest paths from `source` to every node.
///
/// Unreachable nodes report 0. A node reached at distance 0 without a
/// recorded predecessor starts its own chain and reports 1.
#[must_use]
pub fn path_counts(paths: &ShortestPaths, source: usize) -> Vec<f64> {
    let n = paths.node_count();
    let mut walk = SourceWalk::new(n);
    walk.prepare(paths, source);
    (0..n)
        .map(|node| {
            if paths.is_reachable(source, node) {
                walk.sigma[node]
            } else {
                0.0
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-source state
// ---------------------------------------------------------------------------

/// Buffers reused across every source and destination.
struct SourceWalk {
    source: usize,
    /// Nodes in topological order along predecessor links.
    order: Vec<usize>,
    /// Index of each node in `order`; `usize::MAX` if unordered.
    position: Vec<usize>,
    /// Shortest-path counts from the current source.
    sigma: Vec<f64>,
    /// Predecessor chains from a node down to the current destination.
    tau: Vec<f64>,
    /// Paths through each node for the current destination.
    pass_through: Vec<f64>,
    /// Nodes with non-zero `tau` for the current destination.
    touched: Vec<usize>,
    in_degree: Vec<usize>,
    successors: Vec<Vec<usize>>,
    queue: VecDeque<usize>,
}

impl SourceWalk {
    fn new(n: usize) -> Self {
        Self {
            source: 0,
            order: Vec::with_capacity(n),
            position: vec![usize::MAX; n],
            sigma: vec![0.0; n],
            tau: vec![0.0; n],
            pass_through: vec![0.0; n],
            touched: Vec::with_capacity(n),
            in_degree: vec![0; n],
            successors: vec![Vec::new(); n],
            queue: VecDeque::with_capacity(n),
        }
    }

    /// Order the nodes for `source` and memoize their path counts.
    fn prepare(&mut self, paths: &ShortestPaths, source: usize) {
        let row = paths.predecessor_row(source);
        self.source = source;
        self.order.clear();
        self.position.fill(usize::MAX);
        self.sigma.fill(0.0);
        self.successors.iter_mut().for_each(Vec::clear);

        for (node, preds) in row.iter().enumerate() {
            self.in_degree[node] = preds.len();
            for p in preds.iter() {
                self.successors[p].push(node);
            }
            if preds.is_absent() {
                self.queue.push_back(node);
            }
        }

        while let Some(node) = self.queue.pop_front() {
            self.position[node] = self.order.len();
            self.order.push(node);
            for &next in &self.successors[node] {
                self.in_degree[next] -= 1;
                if self.in_degree[next] == 0 {
                    self.queue.push_back(next);
                }
            }
        }

        for &node in &self.order {
            let preds: &PredecessorSet = &row[node];
            let count = if preds.is_absent() {
                1.0
            } else {
                preds.iter().map(|p| self.sigma[p]).sum::<f64>()
            };
            self.sigma[node] = count;
        }
    }

    /// Fill `pass_through` for `dest` and return the total path count, or
    /// `None` if the pair does not contribute.
    #[allow(clippy::float_cmp)]
    fn count_pass_through(&mut self, paths: &ShortestPaths, dest: usize) -> Option<f64> {
        let row = paths.predecessor_row(self.source);
        let end = self.position[dest];
        if row[dest].is_absent() || end == usize::MAX {
            return None;
        }

        self.tau[dest] = 1.0;
        self.touched.push(dest);

        for &node in self.order[..=end].iter().rev() {
            let chains = self.tau[node];
            if chains == 0.0 {
                continue;
            }
            for p in row[node].iter() {
                if self.tau[p] == 0.0 {
                    self.touched.push(p);
                }
                self.tau[p] += chains;
                self.pass_through[p] += self.sigma[p] * chains;
            }
        }

        Some(self.sigma[dest])
    }

    /// Zero every buffer entry touched by the last destination.
    fn reset(&mut self) {
        for &node in &self.touched {
            self.tau[node] = 0.0;
            self.pass_through[node] = 0.0;
        }
        self.touched.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
