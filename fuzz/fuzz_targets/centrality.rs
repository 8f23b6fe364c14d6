#![no_main]

use between_core::config::EngineConfig;
use between_core::graph::parse_graph;
use between_core::pipeline::compute_centrality;
use libfuzzer_sys::fuzz_target;

// Keeps the cubic engine cheap per input.
const MAX_NODES: usize = 48;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(list) = parse_graph(text) else {
        return;
    };
    if list.node_count > MAX_NODES {
        return;
    }

    if let Ok(result) = compute_centrality(&list, &EngineConfig::default()) {
        assert_eq!(result.scores.len(), list.node_count);
        assert!(result.scores.iter().all(|s| s.is_finite() && *s >= 0.0));
    }
});
