//! Search entry point and expansion loop.

use std::collections::BTreeMap;

use tracing::{debug, info};
use ucs_kernel::carrier::graph::WeightedGraphV1;
use ucs_kernel::proof::canon::{canonical_json_bytes, CanonError};

use crate::frontier::UniformCostFrontier;
use crate::node::FrontierEntryV1;
use crate::trace::{
    termination_to_json, SearchTraceV1, StepStatusV1, TerminationReasonV1, TraceMetadataV1,
    TraceStepV1,
};

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcomeV1 {
    /// The goal was reached along `path` (start first, goal last).
    Found { path: Vec<String>, cost: u64 },
    /// No path from start to goal exists.
    Unreachable,
}

/// Result of a search execution.
///
/// Always carries the complete trace regardless of outcome.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcomeV1,
    pub trace: SearchTraceV1,
}

impl SearchResult {
    /// Returns `true` if the goal was reached.
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        matches!(self.outcome, SearchOutcomeV1::Found { .. })
    }

    /// The optimal path, if the goal was reached.
    #[must_use]
    pub fn path(&self) -> Option<&[String]> {
        match &self.outcome {
            SearchOutcomeV1::Found { path, .. } => Some(path),
            SearchOutcomeV1::Unreachable => None,
        }
    }

    /// Total path cost; 0 by convention when unreachable.
    #[must_use]
    pub fn cost(&self) -> u64 {
        match self.outcome {
            SearchOutcomeV1::Found { cost, .. } => cost,
            SearchOutcomeV1::Unreachable => 0,
        }
    }

    /// JSON projection of the outcome together with the trace counters.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let outcome = match &self.outcome {
            SearchOutcomeV1::Found { path, cost } => {
                serde_json::json!({"cost": cost, "path": path, "type": "found"})
            }
            SearchOutcomeV1::Unreachable => serde_json::json!({"type": "unreachable"}),
        };
        serde_json::json!({
            "cost": self.cost(),
            "goal": self.trace.goal,
            "outcome": outcome,
            "start": self.trace.start,
            "step_count": self.trace.len(),
            "termination": termination_to_json(self.trace.metadata.termination),
        })
    }

    /// Serialize the result summary to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }
}

/// Records steps against the live frontier and min-cost table.
struct TraceRecorder {
    steps: Vec<TraceStepV1>,
    total_expansions: u64,
    total_updates: u64,
}

impl TraceRecorder {
    fn record(
        &mut self,
        status: StepStatusV1,
        action: String,
        frontier: &UniformCostFrontier,
        min_costs: &BTreeMap<String, u64>,
        event: Option<(&str, &FrontierEntryV1)>,
    ) {
        match status {
            StepStatusV1::Expansion => self.total_expansions += 1,
            StepStatusV1::Update => self.total_updates += 1,
            _ => {}
        }
        let (expanded, path, cost) = match event {
            Some((expanded, entry)) => (
                Some(expanded.to_string()),
                Some(entry.path.clone()),
                Some(entry.cost),
            ),
            None => (None, None, None),
        };
        self.steps.push(TraceStepV1 {
            action,
            frontier: frontier.snapshot(),
            min_costs: min_costs.clone(),
            expanded,
            path,
            cost,
            status,
        });
    }
}

/// Run uniform-cost search from `start` to `goal` over `graph`.
///
/// Terminates on the first pop of `goal`, which yields a minimum-cost path
/// because edge costs are non-negative. When several paths share the
/// minimum cost, the one returned is decided by [`crate::node::FrontierKey`]
/// ordering and neighbor declaration order; the cost is always the same.
///
/// `start` does not need an adjacency entry in `graph`. Unreachability is a
/// normal outcome, not an error.
#[must_use]
pub fn search(graph: &WeightedGraphV1, start: &str, goal: &str) -> SearchResult {
    let mut frontier = UniformCostFrontier::new();
    let mut min_costs: BTreeMap<String, u64> = BTreeMap::new();
    let mut recorder = TraceRecorder {
        steps: Vec::new(),
        total_expansions: 0,
        total_updates: 0,
    };

    frontier.push(FrontierEntryV1::root(start));
    min_costs.insert(start.to_string(), 0);
    recorder.record(
        StepStatusV1::Start,
        format!("Start UCS from '{start}' to '{goal}'."),
        &frontier,
        &min_costs,
        None,
    );

    let mut outcome = SearchOutcomeV1::Unreachable;

    while let Some(current) = frontier.pop() {
        debug!(node = %current.node, cost = current.cost, "expand");
        recorder.record(
            StepStatusV1::Expansion,
            format!(
                "Expand node '{}' with cost {}.",
                current.node, current.cost
            ),
            &frontier,
            &min_costs,
            Some((current.node.as_str(), &current)),
        );

        if current.node == goal {
            recorder.record(
                StepStatusV1::Found,
                format!("Goal '{goal}' found with total cost {}.", current.cost),
                &frontier,
                &min_costs,
                Some((current.node.as_str(), &current)),
            );
            outcome = SearchOutcomeV1::Found {
                path: current.path,
                cost: current.cost,
            };
            break;
        }

        for edge in graph.neighbors(&current.node) {
            let candidate = current.extend(&edge.to, edge.cost);
            let improves = match min_costs.get(&edge.to) {
                Some(&known) => candidate.cost < known,
                None => true,
            };
            if !improves {
                continue;
            }

            debug!(
                from = %current.node,
                to = %edge.to,
                cost = candidate.cost,
                "update"
            );
            min_costs.insert(edge.to.clone(), candidate.cost);
            let action = format!(
                "Update path to '{}'. New cost: {}.",
                edge.to, candidate.cost
            );
            frontier.push(candidate.clone());
            recorder.record(
                StepStatusV1::Update,
                action,
                &frontier,
                &min_costs,
                Some((current.node.as_str(), &candidate)),
            );
        }
    }

    let termination = match &outcome {
        SearchOutcomeV1::Found { cost, .. } => TerminationReasonV1::GoalReached { cost: *cost },
        SearchOutcomeV1::Unreachable => {
            recorder.record(
                StepStatusV1::Failed,
                format!("Frontier empty. Goal '{goal}' is unreachable from '{start}'."),
                &frontier,
                &min_costs,
                None,
            );
            TerminationReasonV1::FrontierExhausted
        }
    };

    info!(
        start,
        goal,
        steps = recorder.steps.len(),
        expansions = recorder.total_expansions,
        reached = matches!(termination, TerminationReasonV1::GoalReached { .. }),
        "uniform cost search finished"
    );

    SearchResult {
        outcome,
        trace: SearchTraceV1 {
            start: start.to_string(),
            goal: goal.to_string(),
            steps: recorder.steps,
            metadata: TraceMetadataV1 {
                total_expansions: recorder.total_expansions,
                total_updates: recorder.total_updates,
                frontier_high_water: frontier.high_water(),
                termination,
            },
        },
    }
}
