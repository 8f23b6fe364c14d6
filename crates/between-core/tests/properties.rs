//! Property tests: engine agreement, reference distances, and brute-force
//! path enumeration.

#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use between_core::config::EngineConfig;
use between_core::engine::{EngineKind, ShortestPathEngine};
use between_core::error::EngineError;
use between_core::graph::{EdgeList, SparseGraph, UNREACHABLE, WeightMatrix};
use between_core::metrics::{betweenness_centrality, pass_through_counts};
use between_core::pipeline::compute_centrality;

type Triples = Vec<(usize, usize, i64)>;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Graphs with up to `max_nodes` nodes and weights drawn from `weights`.
fn arb_graph(
    max_nodes: usize,
    weights: std::ops::RangeInclusive<i64>,
) -> impl Strategy<Value = (usize, Triples)> {
    (1..=max_nodes).prop_flat_map(move |n| {
        let edges = prop::collection::vec((0..n, 0..n, weights.clone()), 0..=n * n);
        (Just(n), edges)
    })
}

/// Undirected trees (each edge stored in both directions).
fn arb_tree(max_nodes: usize) -> impl Strategy<Value = (usize, Triples)> {
    (2..=max_nodes).prop_flat_map(|n| {
        let parents: Vec<_> = (1..n).map(|child| (0..child, 1_i64..=9)).collect();
        (Just(n), parents).prop_map(|(n, parents)| {
            let edges: Triples = parents
                .into_iter()
                .enumerate()
                .flat_map(|(idx, (parent, w))| [(parent, idx + 1, w), (idx + 1, parent, w)])
                .collect();
            (n, edges)
        })
    })
}

fn solve_both(
    n: usize,
    edges: &[(usize, usize, i64)],
) -> (
    Result<between_core::ShortestPaths, EngineError>,
    Result<between_core::ShortestPaths, EngineError>,
) {
    let list = EdgeList::from_triples(n, edges);
    let dense = WeightMatrix::from_edge_list(&list).expect("generated edges are in range");
    let sparse = SparseGraph::from_edge_list(&list).expect("generated edges are in range");
    (dense.shortest_paths(), sparse.shortest_paths())
}

// ---------------------------------------------------------------------------
// Brute force
// ---------------------------------------------------------------------------

/// Betweenness from explicit enumeration of every simple path.
///
/// Only valid for positive weights, where every shortest path is simple.
fn brute_force_betweenness(n: usize, edges: &[(usize, usize, i64)]) -> Vec<f64> {
    let mut weight: Vec<Vec<Option<i64>>> = vec![vec![None; n]; n];
    for &(u, v, w) in edges {
        if u != v {
            weight[u][v] = Some(weight[u][v].map_or(w, |old| old.min(w)));
        }
    }

    let mut scores = vec![0.0; n];
    for source in 0..n {
        let mut paths = Vec::new();
        let mut on_path = vec![false; n];
        on_path[source] = true;
        enumerate(&weight, source, 0, &mut vec![source], &mut on_path, &mut paths);

        for target in (0..n).filter(|&t| t != source) {
            let ending: Vec<&(i64, Vec<usize>)> =
                paths.iter().filter(|(_, p)| p.last() == Some(&target)).collect();
            let Some(best) = ending.iter().map(|(w, _)| *w).min() else {
                continue;
            };
            let shortest: Vec<&Vec<usize>> = ending
                .iter()
                .filter(|(w, _)| *w == best)
                .map(|(_, p)| p)
                .collect();

            #[allow(clippy::cast_precision_loss)]
            let total = shortest.len() as f64;
            for path in shortest {
                for &k in &path[1..path.len() - 1] {
                    scores[k] += 1.0 / total;
                }
            }
        }
    }
    scores
}

fn enumerate(
    weight: &[Vec<Option<i64>>],
    node: usize,
    so_far: i64,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    out: &mut Vec<(i64, Vec<usize>)>,
) {
    for next in 0..weight.len() {
        let Some(w) = weight[node][next] else {
            continue;
        };
        if on_path[next] {
            continue;
        }
        path.push(next);
        on_path[next] = true;
        out.push((so_far + w, path.clone()));
        enumerate(weight, next, so_far + w, path, on_path, out);
        path.pop();
        on_path[next] = false;
    }
}

// ---------------------------------------------------------------------------
// Bellman–Ford reference
// ---------------------------------------------------------------------------

/// All-pairs distances by repeated Bellman–Ford, or `None` if any cycle has
/// negative total weight.
fn bellman_ford_distances(n: usize, edges: &[(usize, usize, i64)]) -> Option<Vec<Vec<i64>>> {
    let mut potential = vec![0_i64; n];
    for _ in 0..n {
        for &(u, v, w) in edges {
            potential[v] = potential[v].min(potential[u] + w);
        }
    }
    if edges.iter().any(|&(u, v, w)| potential[u] + w < potential[v]) {
        return None;
    }

    let rows = (0..n)
        .map(|source| {
            let mut dist = vec![UNREACHABLE; n];
            dist[source] = 0;
            for _ in 0..n {
                for &(u, v, w) in edges {
                    if dist[u] != UNREACHABLE && dist[u] + w < dist[v] {
                        dist[v] = dist[u] + w;
                    }
                }
            }
            dist
        })
        .collect();
    Some(rows)
}

fn assert_close(actual: &[f64], expected: &[f64]) -> Result<(), TestCaseError> {
    prop_assert_eq!(actual.len(), expected.len());
    for (idx, (a, e)) in actual.iter().zip(expected).enumerate() {
        prop_assert!((a - e).abs() < 1e-9, "node {}: got {}, expected {}", idx, a, e);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn engines_agree_on_positive_weights((n, edges) in arb_graph(8, 1..=9)) {
        let (dense, sparse) = solve_both(n, &edges);
        let dense = dense.expect("positive weights have no cycle");
        let sparse = sparse.expect("positive weights have no cycle");
        prop_assert_eq!(&dense, &sparse);
        prop_assert_eq!(betweenness_centrality(&dense), betweenness_centrality(&sparse));
    }

    #[test]
    fn engines_agree_on_negative_cycle_detection((n, edges) in arb_graph(7, -3..=6)) {
        let (dense, sparse) = solve_both(n, &edges);
        prop_assert_eq!(dense.is_err(), sparse.is_err());
    }

    #[test]
    fn dense_engine_matches_reference_with_zero_and_negative_weights(
        (n, edges) in arb_graph(7, -3..=4)
    ) {
        let list = EdgeList::from_triples(n, &edges);
        let solved = WeightMatrix::from_edge_list(&list)
            .expect("generated edges are in range")
            .shortest_paths();

        match bellman_ford_distances(n, &edges) {
            None => prop_assert!(solved.is_err(), "missed a negative cycle"),
            Some(reference) => {
                let paths = solved.expect("reference found no negative cycle");
                for (i, row) in reference.iter().enumerate() {
                    for (j, &d) in row.iter().enumerate() {
                        prop_assert_eq!(paths.distance(i, j), d, "pair ({}, {})", i, j);
                    }
                }
                for score in betweenness_centrality(&paths) {
                    prop_assert!(score.is_finite() && score >= 0.0, "score {}", score);
                }
            }
        }
    }

    #[test]
    fn every_engine_setting_scores_like_dense((n, edges) in arb_graph(7, -3..=4)) {
        let list = EdgeList::from_triples(n, &edges);
        let solve = |kind: EngineKind| {
            compute_centrality(&list, &EngineConfig { kind, ..EngineConfig::default() })
                .map(|result| result.scores)
                .map_err(|err| err.code())
        };
        let dense = solve(EngineKind::Dense);
        prop_assert_eq!(&solve(EngineKind::Sparse), &dense);
        prop_assert_eq!(&solve(EngineKind::Auto), &dense);
    }

    #[test]
    fn aggregation_matches_path_enumeration((n, edges) in arb_graph(6, 1..=4)) {
        let list = EdgeList::from_triples(n, &edges);
        let paths = WeightMatrix::from_edge_list(&list)
            .expect("in range")
            .shortest_paths()
            .expect("positive weights have no cycle");
        assert_close(&betweenness_centrality(&paths), &brute_force_betweenness(n, &edges))?;
    }

    #[test]
    fn unique_paths_count_each_node_at_most_once((n, edges) in arb_tree(9)) {
        let list = EdgeList::from_triples(n, &edges);
        let paths = SparseGraph::from_edge_list(&list)
            .expect("in range")
            .shortest_paths()
            .expect("positive weights have no cycle");

        for source in 0..n {
            for dest in (0..n).filter(|&d| d != source) {
                let through = pass_through_counts(&paths, source, dest)
                    .expect("trees are connected");
                for count in through {
                    prop_assert!(count == 0.0 || count == 1.0, "count {}", count);
                }
            }
        }

        let scores = betweenness_centrality(&paths);
        assert_close(&scores, &brute_force_betweenness(n, &edges))?;
        for score in scores {
            prop_assert!((score - score.round()).abs() < 1e-9);
        }
    }
}
