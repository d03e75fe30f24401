//! Harness runner: graph text in, verified artifact bundle out.
//!
//! # Pipeline
//!
//! ```text
//! compile_graph() → RunConfigV1::resolve() → search()
//!   → replay_verify() → render_report() → build_bundle()
//! ```
//!
//! A replay that does not match its own fresh trace is a bug, so the runner
//! treats any divergence as an error rather than shipping the bundle.

use thiserror::Error;
use tracing::info;
use ucs_kernel::carrier::compile::{compile_graph, CompileError};
use ucs_kernel::carrier::graph::WeightedGraphV1;
use ucs_search::error::ReplayError;
use ucs_search::render::render_report;
use ucs_search::replay::{replay_verify, ReplayVerdict};
use ucs_search::search::{search, SearchResult};

use crate::bundle::{
    build_bundle, ArtifactBundleV1, BundleBuildError, GRAPH_ARTIFACT, REPORT_ARTIFACT,
    RESULT_ARTIFACT, TRACE_ARTIFACT,
};
use crate::config::RunConfigV1;

/// Error during a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("graph text does not compile")]
    Compile(#[from] CompileError),
    #[error("graph has no nodes to default start/goal to")]
    NoEndpoints,
    #[error("canonical JSON error: {detail}")]
    CanonFailed { detail: String },
    #[error("replay failed")]
    ReplayFailed(#[from] ReplayError),
    #[error("replay diverged at step {step_index}: {detail}")]
    ReplayDivergence { step_index: usize, detail: String },
    #[error("bundle assembly failed")]
    BundleFailed(#[from] BundleBuildError),
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct RunOutputV1 {
    pub graph: WeightedGraphV1,
    pub result: SearchResult,
    pub bundle: ArtifactBundleV1,
}

/// Compile `text` and run it.
///
/// # Errors
///
/// Returns [`RunError::Compile`] for malformed graph text, otherwise as
/// [`run_graph`].
pub fn run_text(text: &str, config: &RunConfigV1) -> Result<RunOutputV1, RunError> {
    let graph = compile_graph(text)?;
    run_graph(graph, config)
}

/// Search `graph` between the configured endpoints, self-check the trace by
/// replay, and package the bundle.
///
/// # Errors
///
/// Returns [`RunError`] if endpoints cannot be resolved, serialization
/// fails, or replay does not reproduce the trace.
pub fn run_graph(graph: WeightedGraphV1, config: &RunConfigV1) -> Result<RunOutputV1, RunError> {
    let endpoints = config.resolve(&graph).ok_or(RunError::NoEndpoints)?;
    let result = search(&graph, &endpoints.start, &endpoints.goal);

    match replay_verify(&graph, &result.trace)? {
        ReplayVerdict::Match => {}
        ReplayVerdict::Divergence { step_index, detail } => {
            return Err(RunError::ReplayDivergence { step_index, detail });
        }
    }

    let canon = |e: ucs_kernel::proof::canon::CanonError| RunError::CanonFailed {
        detail: e.to_string(),
    };
    let graph_bytes = graph.to_canonical_json_bytes().map_err(canon)?;
    let trace_bytes = result.trace.to_canonical_json_bytes().map_err(canon)?;
    let result_bytes = result.to_canonical_json_bytes().map_err(canon)?;
    let report = render_report(&result);

    let bundle = build_bundle(vec![
        (GRAPH_ARTIFACT.to_string(), graph_bytes, true),
        (TRACE_ARTIFACT.to_string(), trace_bytes, true),
        (RESULT_ARTIFACT.to_string(), result_bytes, true),
        (REPORT_ARTIFACT.to_string(), report.into_bytes(), false),
    ])?;

    info!(
        start = %endpoints.start,
        goal = %endpoints.goal,
        steps = result.trace.len(),
        digest = %bundle.digest,
        "run complete"
    );

    Ok(RunOutputV1 {
        graph,
        result,
        bundle,
    })
}
