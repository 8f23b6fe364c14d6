//! between-core library.
//!
//! Betweenness centrality for weighted directed graphs. Shortest paths are
//! tie-aware: every predecessor on some minimal-weight path is kept, and a
//! node's score is the fraction of shortest paths it lies on, summed over all
//! ordered pairs.
//!
//! ```rust,ignore
//! use between_core::{config::EngineConfig, graph::parse_graph, pipeline::compute_centrality};
//!
//! let list = parse_graph("3 3\n1 2 1\n2 3 1\n1 3 5\n")?;
//! let result = compute_centrality(&list, &EngineConfig::default())?;
//! assert_eq!(result.scores, vec![0.0, 1.0, 0.0]);
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums in [`error`]; `anyhow` only for config loading.
//! - **Logging**: `tracing` macros; the binary owns the subscriber.

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod timing;

pub use engine::{EngineKind, ShortestPathEngine, ShortestPaths};
pub use error::{CentralityError, EngineError, ErrorCode, GraphError};
pub use graph::{EdgeList, SparseGraph, WeightMatrix};
pub use metrics::betweenness_centrality;
