//! `replay_verify()`: check a recorded trace by re-running the search.
//!
//! The search is deterministic, so a trace recorded against a graph must be
//! reproduced step for step. The first differing step is reported with the
//! digests of both versions.

use tracing::warn;
use ucs_kernel::carrier::graph::WeightedGraphV1;

use crate::error::ReplayError;
use crate::search::search;
use crate::trace::SearchTraceV1;
use crate::trace_reader::validate_trace;

/// Outcome of a replay that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayVerdict {
    /// Every step and counter matched.
    Match,
    /// The replay diverged. `step_index == recorded.len()` (or the replay's
    /// length) means the step sequences matched and the counters did not.
    Divergence { step_index: usize, detail: String },
}

/// Re-run the search recorded in `trace` over `graph` and compare.
///
/// # Errors
///
/// Returns [`ReplayError::InvalidTrace`] if `trace` fails structural
/// validation, or [`ReplayError::DigestFailed`] if a diverging step cannot
/// be hashed for the report.
pub fn replay_verify(
    graph: &WeightedGraphV1,
    trace: &SearchTraceV1,
) -> Result<ReplayVerdict, ReplayError> {
    validate_trace(trace)?;

    let replayed = search(graph, &trace.start, &trace.goal).trace;

    for (i, (recorded, fresh)) in trace.steps.iter().zip(&replayed.steps).enumerate() {
        if recorded != fresh {
            let recorded_digest = recorded.digest().map_err(|e| ReplayError::DigestFailed {
                detail: e.to_string(),
            })?;
            let fresh_digest = fresh.digest().map_err(|e| ReplayError::DigestFailed {
                detail: e.to_string(),
            })?;
            let detail = format!(
                "recorded {} step {recorded_digest}, replay produced {} step {fresh_digest}",
                recorded.status, fresh.status
            );
            warn!(step_index = i, %detail, "trace replay diverged");
            return Ok(ReplayVerdict::Divergence {
                step_index: i,
                detail,
            });
        }
    }

    if trace.steps.len() != replayed.steps.len() {
        let step_index = trace.steps.len().min(replayed.steps.len());
        let detail = format!(
            "recorded {} steps, replay produced {}",
            trace.steps.len(),
            replayed.steps.len()
        );
        warn!(step_index, %detail, "trace replay diverged");
        return Ok(ReplayVerdict::Divergence { step_index, detail });
    }

    if trace.metadata != replayed.metadata {
        let detail = format!(
            "metadata differs: recorded {:?}, replay {:?}",
            trace.metadata, replayed.metadata
        );
        warn!(%detail, "trace replay diverged");
        return Ok(ReplayVerdict::Divergence {
            step_index: trace.steps.len(),
            detail,
        });
    }

    Ok(ReplayVerdict::Match)
}
