#![no_main]

use between_core::graph::parse_graph;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(list) = parse_graph(text) {
        for edge in &list.edges {
            assert!(edge.source < list.node_count);
            assert!(edge.target < list.node_count);
        }
    }
});
