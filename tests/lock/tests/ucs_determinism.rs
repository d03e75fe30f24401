//! In-process determinism: repeated runs produce identical bytes, and traces
//! survive a serialize/read cycle with their digest intact.

use lock_tests::graphs::{acceptance_graph, generated_graph, node_name};
use ucs_harness::config::RunConfigV1;
use ucs_harness::demo::DEMO_GRAPH;
use ucs_harness::runner::run_text;
use ucs_search::replay::{replay_verify, ReplayVerdict};
use ucs_search::search::search;
use ucs_search::trace_reader::read_trace;

#[test]
fn repeated_search_is_byte_identical() {
    let graph = acceptance_graph();
    let first = search(&graph, "A", "H").trace.to_canonical_json_bytes().unwrap();
    for _ in 0..10 {
        let again = search(&graph, "A", "H").trace.to_canonical_json_bytes().unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn calls_do_not_interfere() {
    let graph = acceptance_graph();
    let alone = search(&graph, "A", "H").trace;
    let _other = search(&graph, "C", "H");
    let _unreachable = search(&graph, "H", "A");
    let again = search(&graph, "A", "H").trace;
    assert_eq!(alone, again);
}

#[test]
fn insertion_order_of_sources_does_not_matter() {
    // Sources declared in a different order, same neighbor order per source.
    let reordered = "G: H=1\nF: H=3\nE: G=2\nD: H=1\nC: F=4, G=2\nB: D=3, E=6\nA: B=1, C=5";
    let a = run_text(DEMO_GRAPH, &RunConfigV1::default()).unwrap();
    let b = run_text(reordered, &RunConfigV1::default()).unwrap();
    assert_eq!(a.bundle.digest, b.bundle.digest);
}

#[test]
fn trace_roundtrip_keeps_digest() {
    for seed in 0..10 {
        let graph = generated_graph(seed, 6, 3, 5);
        let trace = search(&graph, &node_name(0), &node_name(5)).trace;
        let bytes = trace.to_canonical_json_bytes().unwrap();
        let back = read_trace(&bytes).unwrap();
        assert_eq!(back, trace);
        assert_eq!(back.digest().unwrap(), trace.digest().unwrap());
        assert_eq!(replay_verify(&graph, &back).unwrap(), ReplayVerdict::Match);
    }
}

#[test]
fn bundle_digest_stable_across_runs() {
    let digests: Vec<String> = (0..5)
        .map(|_| {
            run_text(DEMO_GRAPH, &RunConfigV1::default())
                .unwrap()
                .bundle
                .digest
                .to_string()
        })
        .collect();
    assert!(digests.windows(2).all(|w| w[0] == w[1]));
}
