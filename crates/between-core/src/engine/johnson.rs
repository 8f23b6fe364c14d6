//! Johnson's algorithm with predecessor sets, for sparse graphs.
//!
//! # Algorithm
//!
//! 1. Bellman–Ford from a virtual source joined to every node by a
//!    zero-weight edge yields potentials `h`. If any edge still relaxes
//!    after `N` passes, a negative cycle exists.
//! 2. Every edge is reweighted to `w + h(u) − h(v) ≥ 0`. This shifts the
//!    weight of every `s → t` path by the same `h(s) − h(t)`, so the set of
//!    shortest paths (and every tie between them) is unchanged.
//! 3. Dijkstra from each source: a strictly shorter tentative distance
//!    replaces the target's predecessor set, an exact tie adds to it.
//!
//! Distances are integers throughout, so ties are exact.
//!
//! Results match [`super::floyd_warshall`] when every edge weight is
//! positive. With a zero-length segment (a zero-weight edge, or a cycle
//! whose negative and positive edges cancel) Dijkstra records predecessors
//! that Floyd–Warshall does not, so the pipeline never routes such graphs
//! here.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, instrument};

use crate::error::EngineError;
use crate::graph::{SparseGraph, UNREACHABLE, Weight};

use super::{PredecessorSet, ShortestPathEngine, ShortestPaths};

impl ShortestPathEngine for SparseGraph {
    fn node_count(&self) -> usize {
        Self::node_count(self)
    }

    fn shortest_paths(&self) -> Result<ShortestPaths, EngineError> {
        johnson(self)
    }
}

/// Run Johnson's algorithm over `graph`.
///
/// # Errors
///
/// Returns [`EngineError::NegativeCycle`] listing the nodes whose potential
/// could still be lowered after `N` Bellman–Ford passes.
#[instrument(skip(graph), fields(n = graph.node_count(), m = graph.edge_count()))]
pub fn johnson(graph: &SparseGraph) -> Result<ShortestPaths, EngineError> {
    let n = graph.node_count();
    let potentials = potentials(graph)?;

    let mut distances = Vec::with_capacity(n * n);
    let mut predecessors = Vec::with_capacity(n * n);

    let mut dist: Vec<Weight> = vec![UNREACHABLE; n];
    let mut preds: Vec<PredecessorSet> = vec![PredecessorSet::absent(); n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    for source in 0..n {
        dist.fill(UNREACHABLE);
        settled.fill(false);
        preds.iter_mut().for_each(PredecessorSet::clear);

        dist[source] = 0;
        heap.push(Reverse((0, source)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if settled[u] || d > dist[u] {
                continue;
            }
            settled[u] = true;

            for (v, w) in graph.out_edges(u) {
                if v == u || v == source {
                    continue;
                }
                let reduced = w + potentials[u] - potentials[v];
                debug_assert!(reduced >= 0, "potentials must make ({u}, {v}) non-negative");

                let candidate = d + reduced;
                if candidate < dist[v] {
                    dist[v] = candidate;
                    preds[v].clear();
                    preds[v].insert(u);
                    heap.push(Reverse((candidate, v)));
                } else if candidate == dist[v] {
                    preds[v].insert(u);
                }
            }
        }

        for target in 0..n {
            let d = dist[target];
            distances.push(if d == UNREACHABLE {
                UNREACHABLE
            } else {
                d - potentials[source] + potentials[target]
            });
        }
        predecessors.extend(preds.iter().cloned());
    }

    Ok(ShortestPaths::from_parts(n, distances, predecessors))
}

/// Bellman–Ford potentials from a virtual source with a zero edge to every
/// node. All potentials start at 0 for that reason.
fn potentials(graph: &SparseGraph) -> Result<Vec<Weight>, EngineError> {
    let n = graph.node_count();
    let edges: Vec<(usize, usize, Weight)> = graph.edges().collect();
    let mut h: Vec<Weight> = vec![0; n];

    // The augmented graph has n + 1 nodes, so n passes suffice.
    let mut passes = 0;
    for _ in 0..n {
        passes += 1;
        let mut updated = false;
        for &(u, v, w) in &edges {
            let candidate = h[u] + w;
            if candidate < h[v] {
                h[v] = candidate;
                updated = true;
            }
        }
        if !updated {
            break;
        }
    }
    debug!(passes, "bellman-ford potentials settled");

    let mut still_relaxing: Vec<usize> = edges
        .iter()
        .filter(|&&(u, v, w)| h[u] + w < h[v])
        .map(|&(_, v, _)| v)
        .collect();

    if still_relaxing.is_empty() {
        return Ok(h);
    }

    still_relaxing.sort_unstable();
    still_relaxing.dedup();
    Err(EngineError::NegativeCycle {
        nodes: still_relaxing,
    })
}
