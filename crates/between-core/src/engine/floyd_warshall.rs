//! Generalized Floyd–Warshall with predecessor sets.
//!
//! # Algorithm
//!
//! Classic Floyd–Warshall over intermediate nodes `k = 0..N`, extended to
//! keep every tied predecessor instead of a single one:
//!
//! 1. `D := W`. `P[i][j] := {i}` when `W[i][j]` is a finite, non-zero direct
//!    edge; otherwise `P[i][j]` is absent (this includes `i == j`).
//! 2. For each `k`, `i`, `j`: if `D[i][k] + D[k][j] < D[i][j]`, the path via
//!    `k` supersedes everything known, so `D[i][j]` takes the new sum and
//!    `P[i][j]` is **replaced** by `P[k][j]`. If the sum ties `D[i][j]` and
//!    `k` is neither endpoint, `P[k][j]` is **merged** into `P[i][j]`.
//! 3. Any `D[i][i] < 0` afterwards means a negative cycle.
//!
//! Row `k` and column `k` do not change during iteration `k`, so the
//! in-place update is safe. Iterations over `k` must run in order.
//!
//! Zero-weight direct edges do not seed a predecessor (step 1). A target
//! reached only through such an edge therefore reads as unreachable from
//! the source in `P`, while `D` still holds its true distance.

use tracing::{debug, instrument};

use crate::error::EngineError;
use crate::graph::{UNREACHABLE, WeightMatrix, path_sum};

use super::{PredecessorSet, ShortestPathEngine, ShortestPaths};

impl ShortestPathEngine for WeightMatrix {
    fn node_count(&self) -> usize {
        Self::node_count(self)
    }

    fn shortest_paths(&self) -> Result<ShortestPaths, EngineError> {
        floyd_warshall(self)
    }
}

/// Run the generalized Floyd–Warshall over `graph`.
///
/// # Errors
///
/// Returns [`EngineError::NegativeCycle`] listing every node whose shortest
/// distance to itself is negative.
#[instrument(skip(graph), fields(n = graph.node_count()))]
pub fn floyd_warshall(graph: &WeightMatrix) -> Result<ShortestPaths, EngineError> {
    let n = graph.node_count();
    let mut dist = graph.as_slice().to_vec();

    let mut preds: Vec<PredecessorSet> = dist
        .iter()
        .enumerate()
        .map(|(idx, &w)| {
            if w != 0 && w != UNREACHABLE {
                PredecessorSet::single(idx / n)
            } else {
                PredecessorSet::absent()
            }
        })
        .collect();

    let mut replaced = 0_u64;
    let mut merged = 0_u64;

    for k in 0..n {
        for i in 0..n {
            let d_ik = dist[i * n + k];
            if d_ik == UNREACHABLE {
                continue;
            }
            for j in 0..n {
                let Some(via_k) = path_sum(d_ik, dist[k * n + j]) else {
                    continue;
                };
                let ij = i * n + j;
                let kj = k * n + j;

                if via_k < dist[ij] {
                    dist[ij] = via_k;
                    copy_predecessors(&mut preds, kj, ij, false);
                    replaced += 1;
                } else if via_k == dist[ij] && i != k && j != k {
                    copy_predecessors(&mut preds, kj, ij, true);
                    merged += 1;
                }
            }
        }
    }

    debug!(replaced, merged, "floyd-warshall relaxation complete");

    let negative: Vec<usize> = (0..n).filter(|&i| dist[i * n + i] < 0).collect();
    if !negative.is_empty() {
        debug!(nodes = negative.len(), "negative diagonal after relaxation");
        return Err(EngineError::NegativeCycle { nodes: negative });
    }

    Ok(ShortestPaths::from_parts(n, dist, preds))
}

/// Copy (or merge) `preds[src]` into `preds[dst]` without cloning the source.
fn copy_predecessors(preds: &mut [PredecessorSet], src: usize, dst: usize, merge: bool) {
    if src == dst {
        return;
    }
    let (source, target) = if src < dst {
        let (lo, hi) = preds.split_at_mut(dst);
        (&lo[src], &mut hi[0])
    } else {
        let (lo, hi) = preds.split_at_mut(src);
        (&hi[0], &mut lo[dst])
    };

    if merge {
        target.merge(source);
    } else {
        target.replace_with(source);
    }
}
