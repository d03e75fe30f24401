//! Fixture binary for cross-process determinism.
//!
//! Runs the demo graph under three endpoint configurations and prints
//! `key=value` lines: trace digest, bundle digest, cost, step count and the
//! replay verdict. Identical output across environments shows that nothing
//! in the pipeline depends on process state.
//!
//! Usage: `trace_fixture`

use ucs_harness::config::RunConfigV1;
use ucs_harness::demo::DEMO_GRAPH;
use ucs_harness::runner::run_text;
use ucs_search::replay::replay_verify;

fn main() {
    let configs = [
        ("default", RunConfigV1::default()),
        (
            "c_to_h",
            RunConfigV1 {
                start: Some("C".into()),
                goal: Some("H".into()),
            },
        ),
        (
            "unreachable",
            RunConfigV1 {
                start: Some("H".into()),
                goal: Some("A".into()),
            },
        ),
    ];

    for (label, config) in &configs {
        let output = run_text(DEMO_GRAPH, config).expect("demo run failed");
        let trace_digest = output.result.trace.digest().expect("trace digest failed");
        let verdict = replay_verify(&output.graph, &output.result.trace).expect("replay failed");

        println!("{label}.trace_digest={trace_digest}");
        println!("{label}.bundle_digest={}", output.bundle.digest);
        println!("{label}.cost={}", output.result.cost());
        println!("{label}.steps={}", output.result.trace.len());
        println!("{label}.replay_verdict={verdict:?}");
    }
}
