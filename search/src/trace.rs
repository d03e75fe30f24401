//! `SearchTraceV1`: the ordered, replayable log of one search run.
//!
//! Every step owns deep copies of the frontier and the min-cost table as
//! they were when the step was recorded. Nothing in a recorded step aliases
//! live search state.

use std::collections::BTreeMap;

use ucs_kernel::proof::canon::{canonical_json_bytes, CanonError};
use ucs_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::node::FrontierEntryV1;

/// Status tag of a trace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatusV1 {
    /// Initial state before the first pop.
    Start,
    /// An entry was popped from the frontier.
    Expansion,
    /// A neighbor's min-cost entry was first set or improved.
    Update,
    /// The goal was popped. Terminal.
    Found,
    /// The frontier emptied without reaching the goal. Terminal.
    Failed,
}

impl StepStatusV1 {
    /// Wire name used in canonical JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Expansion => "expansion",
            Self::Update => "update",
            Self::Found => "found",
            Self::Failed => "failed",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "start" => Some(Self::Start),
            "expansion" => Some(Self::Expansion),
            "update" => Some(Self::Update),
            "found" => Some(Self::Found),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether this status ends a trace.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Found | Self::Failed)
    }
}

impl std::fmt::Display for StepStatusV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Start => "Start",
            Self::Expansion => "Expansion",
            Self::Update => "Update",
            Self::Found => "Found",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// One recorded state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStepV1 {
    /// Human-readable description of the transition.
    pub action: String,
    /// Frontier contents after the transition, in extraction order.
    pub frontier: Vec<FrontierEntryV1>,
    /// Min-cost table after the transition.
    pub min_costs: BTreeMap<String, u64>,
    /// The node being expanded (for Update: the node that triggered it).
    pub expanded: Option<String>,
    /// The path the event concerns (absent for Start and Failed).
    pub path: Option<Vec<String>>,
    /// The cost the event concerns (absent for Start and Failed).
    pub cost: Option<u64>,
    pub status: StepStatusV1,
}

impl TraceStepV1 {
    /// JSON projection of this step.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "action": self.action,
            "cost": self.cost,
            "expanded": self.expanded,
            "frontier": self.frontier.iter().map(FrontierEntryV1::to_json_value).collect::<Vec<_>>(),
            "min_costs": self.min_costs,
            "path": self.path,
            "status": self.status.as_str(),
        })
    }

    /// Content digest of this step's canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_json_bytes(&self.to_json_value())?;
        Ok(canonical_hash(HashDomain::TraceStep, &bytes))
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReasonV1 {
    /// The goal was popped with this total cost.
    GoalReached { cost: u64 },
    /// The frontier emptied first.
    FrontierExhausted,
}

/// The complete trace of one search run, with aggregate counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTraceV1 {
    pub start: String,
    pub goal: String,
    /// Ordered steps. The first is `Start`, the last is `Found` or `Failed`.
    pub steps: Vec<TraceStepV1>,
    pub metadata: TraceMetadataV1,
}

/// Aggregate counters derived during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceMetadataV1 {
    /// Number of `Expansion` steps.
    pub total_expansions: u64,
    /// Number of `Update` steps (first-sets plus improvements).
    pub total_updates: u64,
    /// Largest frontier size observed.
    pub frontier_high_water: u64,
    pub termination: TerminationReasonV1,
}

impl SearchTraceV1 {
    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step was recorded. Never true for a trace from `search`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps with a given status, in order.
    pub fn steps_with_status(&self, status: StepStatusV1) -> impl Iterator<Item = &TraceStepV1> {
        self.steps.iter().filter(move |s| s.status == status)
    }

    /// The terminal step, if the trace is complete.
    #[must_use]
    pub fn terminal_step(&self) -> Option<&TraceStepV1> {
        self.steps.last().filter(|s| s.status.is_terminal())
    }

    /// JSON projection of the whole trace.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "goal": self.goal,
            "metadata": metadata_to_json(&self.metadata),
            "start": self.start,
            "steps": self.steps.iter().map(TraceStepV1::to_json_value).collect::<Vec<_>>(),
        })
    }

    /// Serialize the trace to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content digest of the canonical JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::SearchTrace, &bytes))
    }
}

fn metadata_to_json(m: &TraceMetadataV1) -> serde_json::Value {
    serde_json::json!({
        "frontier_high_water": m.frontier_high_water,
        "termination": termination_to_json(m.termination),
        "total_expansions": m.total_expansions,
        "total_updates": m.total_updates,
    })
}

pub(crate) fn termination_to_json(t: TerminationReasonV1) -> serde_json::Value {
    match t {
        TerminationReasonV1::GoalReached { cost } => {
            serde_json::json!({"cost": cost, "type": "goal_reached"})
        }
        TerminationReasonV1::FrontierExhausted => {
            serde_json::json!({"type": "frontier_exhausted"})
        }
    }
}
