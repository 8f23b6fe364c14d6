//! Centrality metrics over all-pairs shortest paths.
//!
//! # Usage
//!
//! ```rust,ignore
//! use between_core::engine::ShortestPathEngine;
//! use between_core::graph::{WeightMatrix, parse_graph};
//! use between_core::metrics::betweenness::betweenness_centrality;
//!
//! let list = parse_graph("3 2\n1 2 1\n2 3 1\n")?;
//! let paths = WeightMatrix::from_edge_list(&list)?.shortest_paths()?;
//! let bc = betweenness_centrality(&paths);
//! assert_eq!(bc, vec![0.0, 1.0, 0.0]);
//! ```

pub mod betweenness;

pub use betweenness::{betweenness_centrality, pass_through_counts, path_counts};
