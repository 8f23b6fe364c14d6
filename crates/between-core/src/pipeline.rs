//! Read → solve → aggregate → write, with stage timing.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::{Config, EngineConfig};
use crate::engine::{EngineKind, ShortestPathEngine, ShortestPaths};
use crate::error::CentralityError;
use crate::graph::{EdgeList, SparseGraph, WeightMatrix, read_graph};
use crate::metrics::betweenness_centrality;
use crate::output::write_scores;
use crate::timing::{Stage, timed};

/// Scores for one graph plus what it took to get them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Centrality {
    /// One score per node, indexed by 0-based node id.
    pub scores: Vec<f64>,
    /// Engine that actually ran (never [`EngineKind::Auto`]).
    pub engine: EngineKind,
    pub node_count: usize,
    pub edge_count: usize,
    /// Total predecessor links across all pairs.
    pub predecessor_entries: usize,
}

/// Build the representation the resolved engine needs and run it.
///
/// The engine comes from [`EngineKind::resolve_for`]: density picks between
/// the two for [`EngineKind::Auto`], and a graph with a zero or negative
/// edge weight always runs on [`EngineKind::Dense`].
///
/// # Errors
///
/// Returns [`CentralityError::Graph`] for edges outside the node range or a
/// node count too large to tabulate, and [`CentralityError::Engine`] for a
/// negative cycle.
pub fn shortest_paths(
    list: &EdgeList,
    config: &EngineConfig,
) -> Result<(EngineKind, ShortestPaths), CentralityError> {
    let kind = config
        .kind
        .resolve_for(list, config.sparse_density_threshold);
    if config.kind == EngineKind::Sparse && kind != EngineKind::Sparse {
        warn!("graph has non-positive edge weights; running the dense engine instead of sparse");
    }
    debug!(
        requested = %config.kind,
        resolved = %kind,
        density = list.density(),
        "engine selected"
    );

    let paths = match kind {
        EngineKind::Sparse => {
            let graph = timed(Stage::BuildSparse, || SparseGraph::from_edge_list(list))?;
            timed(Stage::Johnson, || graph.shortest_paths())?
        }
        EngineKind::Dense | EngineKind::Auto => {
            let graph = timed(Stage::BuildDense, || WeightMatrix::from_edge_list(list))?;
            timed(Stage::FloydWarshall, || graph.shortest_paths())?
        }
    };

    Ok((kind, paths))
}

/// Compute betweenness centrality for an in-memory graph.
///
/// # Errors
///
/// See [`shortest_paths`].
#[instrument(skip(list, config), fields(n = list.node_count, m = list.edge_count()))]
pub fn compute_centrality(
    list: &EdgeList,
    config: &EngineConfig,
) -> Result<Centrality, CentralityError> {
    let (engine, paths) = shortest_paths(list, config)?;
    let scores = timed(Stage::Aggregate, || betweenness_centrality(&paths));

    Ok(Centrality {
        scores,
        engine,
        node_count: list.node_count,
        edge_count: list.edge_count(),
        predecessor_entries: paths.predecessor_entries(),
    })
}

/// Read `input`, compute centrality, and write the scores to `output`.
///
/// Nothing is written when reading or solving fails.
///
/// # Errors
///
/// Returns the first [`CentralityError`] raised by any stage.
pub fn run(input: &Path, output: &Path, config: &Config) -> Result<Centrality, CentralityError> {
    run_with(input, output, config, |_, _| {})
}

/// [`run`], calling `on_computed` with the result and the time spent
/// solving and aggregating before the scores are written.
///
/// # Errors
///
/// Returns the first [`CentralityError`] raised by any stage.
#[instrument(
    skip(config, on_computed),
    fields(input = %input.display(), output = %output.display())
)]
pub fn run_with(
    input: &Path,
    output: &Path,
    config: &Config,
    on_computed: impl FnOnce(&Centrality, Duration),
) -> Result<Centrality, CentralityError> {
    let list = timed(Stage::Parse, || read_graph(input))?;

    let started = Instant::now();
    let centrality = compute_centrality(&list, &config.engine)?;
    on_computed(&centrality, started.elapsed());

    timed(Stage::Write, || {
        write_scores(output, &centrality.scores, config.output.precision)
    })?;

    info!(
        nodes = centrality.node_count,
        edges = centrality.edge_count,
        engine = %centrality.engine,
        "centrality computed"
    );
    Ok(centrality)
}
