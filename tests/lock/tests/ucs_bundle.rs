//! Bundle verification and directory persistence, end to end.

use lock_tests::bundle_test_helpers::{
    rebuild_with_artifact, rebuild_with_json, rebuild_without_artifact,
};
use lock_tests::graphs::acceptance_graph;
use ucs_harness::bundle::{
    verify_bundle, BundleVerifyError, GRAPH_ARTIFACT, REPORT_ARTIFACT, RESULT_ARTIFACT,
    TRACE_ARTIFACT,
};
use ucs_harness::bundle_dir::{
    read_bundle_dir, verify_bundle_dir, write_bundle_dir, BundleDirVerifyError,
};
use ucs_harness::config::RunConfigV1;
use ucs_harness::demo::DEMO_GRAPH;
use ucs_harness::runner::{run_text, RunOutputV1};
use ucs_search::search::search;

fn demo_run() -> RunOutputV1 {
    run_text(DEMO_GRAPH, &RunConfigV1::default()).unwrap()
}

#[test]
fn directory_roundtrip_verifies() {
    let out = demo_run();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&out.bundle, dir.path()).unwrap();

    let loaded = verify_bundle_dir(dir.path()).unwrap();
    assert_eq!(loaded.digest, out.bundle.digest);
    assert_eq!(loaded.artifacts, out.bundle.artifacts);

    let on_disk = std::fs::read(dir.path().join(TRACE_ARTIFACT)).unwrap();
    assert_eq!(on_disk, out.result.trace.to_canonical_json_bytes().unwrap());
}

#[test]
fn report_on_disk_is_rendered_text() {
    let out = demo_run();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&out.bundle, dir.path()).unwrap();
    let report = std::fs::read_to_string(dir.path().join(REPORT_ARTIFACT)).unwrap();
    assert!(report.starts_with("Step 1 | Status: Start\n"));
    assert!(report.contains("Lowest-cost path found: A -> B -> D -> H\n"));
    assert!(report.ends_with(&format!("Finished in {} steps.\n", out.result.trace.len())));
}

#[test]
fn edited_trace_file_fails_verification() {
    let out = demo_run();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&out.bundle, dir.path()).unwrap();
    std::fs::write(dir.path().join(TRACE_ARTIFACT), b"{}").unwrap();

    let err = verify_bundle_dir(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        BundleDirVerifyError::VerifyError(BundleVerifyError::ContentHashMismatch { .. })
    ));
}

#[test]
fn consistent_rewrite_of_action_is_replay_divergence() {
    let out = demo_run();
    let edited = rebuild_with_json(&out.bundle, TRACE_ARTIFACT, |trace| {
        trace["steps"][3]["action"] = serde_json::json!("Something else.");
    });
    let err = verify_bundle(&edited).unwrap_err();
    assert!(
        matches!(err, BundleVerifyError::ReplayDivergence { step_index: 3, .. }),
        "got {err:?}"
    );
}

#[test]
fn structurally_broken_trace_fails_parse() {
    let out = demo_run();
    let edited = rebuild_with_json(&out.bundle, TRACE_ARTIFACT, |trace| {
        trace["steps"]
            .as_array_mut()
            .unwrap()
            .retain(|s| s["status"] != "start");
    });
    assert!(matches!(
        verify_bundle(&edited).unwrap_err(),
        BundleVerifyError::TraceParseFailed { .. }
    ));
}

#[test]
fn trace_from_other_graph_diverges() {
    let out = demo_run();
    let other = acceptance_graph().with_edge("A", "H", 2);
    let foreign = search(&other, "A", "H");
    let edited = rebuild_with_artifact(
        &out.bundle,
        TRACE_ARTIFACT,
        foreign.trace.to_canonical_json_bytes().unwrap(),
    );
    assert!(matches!(
        verify_bundle(&edited).unwrap_err(),
        BundleVerifyError::ReplayDivergence { .. }
    ));
}

#[test]
fn result_must_match_replay() {
    let out = demo_run();
    let edited = rebuild_with_json(&out.bundle, RESULT_ARTIFACT, |result| {
        result["cost"] = serde_json::json!(4);
    });
    assert_eq!(
        verify_bundle(&edited).unwrap_err(),
        BundleVerifyError::ResultMismatch
    );
}

#[test]
fn graph_must_accompany_trace() {
    let out = demo_run();
    let partial = rebuild_without_artifact(&out.bundle, GRAPH_ARTIFACT);
    assert_eq!(
        verify_bundle(&partial).unwrap_err(),
        BundleVerifyError::ArtifactMissing {
            name: GRAPH_ARTIFACT.into()
        }
    );
}

#[test]
fn undecodable_graph_rejected() {
    let out = demo_run();
    let edited = rebuild_with_json(&out.bundle, GRAPH_ARTIFACT, |graph| {
        graph["nodes"]["A"] = serde_json::json!("B");
    });
    assert!(matches!(
        verify_bundle(&edited).unwrap_err(),
        BundleVerifyError::GraphDecodeFailed { .. }
    ));
}

#[test]
fn written_dir_reads_without_verification() {
    let out = demo_run();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&out.bundle, dir.path()).unwrap();
    let loaded = read_bundle_dir(dir.path()).unwrap();
    assert_eq!(loaded.manifest, out.bundle.manifest);
}
