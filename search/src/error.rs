//! Typed errors for trace reading and replay.
//!
//! The search itself is infallible: unreachability is an outcome, not an
//! error. These errors only arise when a trace comes back in from bytes or
//! is checked against a graph.

use thiserror::Error;

/// A trace violates a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceInvariantError {
    #[error("trace has no steps")]
    EmptyTrace,
    #[error("first step is {found}, expected Start")]
    FirstStepNotStart { found: String },
    #[error("trace has no terminal Found/Failed step")]
    MissingTerminal,
    #[error("terminal step at index {step_index} is not last")]
    TerminalNotLast { step_index: usize },
    #[error("Failed step at index {step_index} has a non-empty frontier")]
    FailedWithFrontier { step_index: usize },
    #[error("counter {counter} records {recorded} but the trace holds {counted}")]
    CounterMismatch {
        counter: &'static str,
        recorded: u64,
        counted: u64,
    },
    #[error("min cost of {node:?} rose at step {step_index}")]
    MinCostIncreased { step_index: usize, node: String },
    #[error("min cost of {node:?} vanished at step {step_index}")]
    MinCostDropped { step_index: usize, node: String },
    #[error("termination {termination} disagrees with terminal step {status}")]
    TerminationMismatch { termination: String, status: String },
}

/// Failure parsing trace JSON bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceParseError {
    #[error("trace is not valid JSON: {detail}")]
    InvalidJson { detail: String },
    #[error("missing field {field}")]
    MissingField { field: String },
    #[error("invalid field {field}: {detail}")]
    InvalidField { field: String, detail: String },
    #[error(transparent)]
    Invariant(#[from] TraceInvariantError),
}

/// A trace could not be replayed at all.
///
/// Distinct from a divergence verdict: a `ReplayError` means the trace is
/// malformed, while [`crate::replay::ReplayVerdict::Divergence`] means it
/// replayed but did not match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("trace is malformed: {0}")]
    InvalidTrace(#[from] TraceInvariantError),
    #[error("step digest failed: {detail}")]
    DigestFailed { detail: String },
}
