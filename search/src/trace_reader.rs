//! Trace reader: fail-closed parsing of trace JSON with invariant checks.
//!
//! Parses the bytes produced by [`SearchTraceV1::to_canonical_json_bytes`]
//! back into a [`SearchTraceV1`], then enforces the structural invariants
//! every trace from [`crate::search::search`] satisfies.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{TraceInvariantError, TraceParseError};
use crate::node::FrontierEntryV1;
use crate::trace::{
    SearchTraceV1, StepStatusV1, TerminationReasonV1, TraceMetadataV1, TraceStepV1,
};

/// Parse trace JSON bytes, verifying structural invariants.
///
/// # Errors
///
/// Returns [`TraceParseError`] on malformed JSON, missing or mistyped
/// fields, or any invariant violation.
pub fn read_trace(bytes: &[u8]) -> Result<SearchTraceV1, TraceParseError> {
    let json: Value = serde_json::from_slice(bytes).map_err(|e| TraceParseError::InvalidJson {
        detail: e.to_string(),
    })?;

    let steps = field(&json, "steps")?
        .as_array()
        .ok_or_else(|| invalid("steps", "expected array"))?
        .iter()
        .enumerate()
        .map(|(i, step)| parse_step(i, step))
        .collect::<Result<Vec<_>, _>>()?;

    let meta = field(&json, "metadata")?;
    let trace = SearchTraceV1 {
        start: str_field(&json, "start")?,
        goal: str_field(&json, "goal")?,
        steps,
        metadata: TraceMetadataV1 {
            total_expansions: u64_field(meta, "total_expansions")?,
            total_updates: u64_field(meta, "total_updates")?,
            frontier_high_water: u64_field(meta, "frontier_high_water")?,
            termination: parse_termination(field(meta, "termination")?)?,
        },
    };

    validate_trace(&trace)?;
    Ok(trace)
}

/// Check the structural invariants of a trace.
///
/// - the first step is `Start`, the last is `Found` or `Failed`, and no
///   other step is terminal;
/// - a `Failed` step shows an empty frontier;
/// - expansion and update counters match the steps;
/// - no min-cost entry rises or disappears between consecutive steps;
/// - the termination reason agrees with the terminal step.
///
/// # Errors
///
/// Returns the first [`TraceInvariantError`] found.
pub fn validate_trace(trace: &SearchTraceV1) -> Result<(), TraceInvariantError> {
    let first = trace.steps.first().ok_or(TraceInvariantError::EmptyTrace)?;
    if first.status != StepStatusV1::Start {
        return Err(TraceInvariantError::FirstStepNotStart {
            found: first.status.to_string(),
        });
    }

    let last_index = trace.steps.len() - 1;
    for (i, step) in trace.steps.iter().enumerate() {
        if step.status.is_terminal() && i != last_index {
            return Err(TraceInvariantError::TerminalNotLast { step_index: i });
        }
        if step.status == StepStatusV1::Failed && !step.frontier.is_empty() {
            return Err(TraceInvariantError::FailedWithFrontier { step_index: i });
        }
    }
    let terminal = trace
        .terminal_step()
        .ok_or(TraceInvariantError::MissingTerminal)?;

    check_counter(
        "total_expansions",
        trace.metadata.total_expansions,
        trace.steps_with_status(StepStatusV1::Expansion).count(),
    )?;
    check_counter(
        "total_updates",
        trace.metadata.total_updates,
        trace.steps_with_status(StepStatusV1::Update).count(),
    )?;

    for (i, pair) in trace.steps.windows(2).enumerate() {
        let (before, after) = (&pair[0].min_costs, &pair[1].min_costs);
        for (node, &old) in before {
            match after.get(node) {
                None => {
                    return Err(TraceInvariantError::MinCostDropped {
                        step_index: i + 1,
                        node: node.clone(),
                    })
                }
                Some(&new) if new > old => {
                    return Err(TraceInvariantError::MinCostIncreased {
                        step_index: i + 1,
                        node: node.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    let consistent = match trace.metadata.termination {
        TerminationReasonV1::GoalReached { cost } => {
            terminal.status == StepStatusV1::Found && terminal.cost == Some(cost)
        }
        TerminationReasonV1::FrontierExhausted => terminal.status == StepStatusV1::Failed,
    };
    if !consistent {
        return Err(TraceInvariantError::TerminationMismatch {
            termination: format!("{:?}", trace.metadata.termination),
            status: terminal.status.to_string(),
        });
    }

    Ok(())
}

fn check_counter(
    counter: &'static str,
    recorded: u64,
    counted: usize,
) -> Result<(), TraceInvariantError> {
    let counted = counted as u64;
    if recorded == counted {
        Ok(())
    } else {
        Err(TraceInvariantError::CounterMismatch {
            counter,
            recorded,
            counted,
        })
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn parse_step(index: usize, v: &Value) -> Result<TraceStepV1, TraceParseError> {
    let status_raw = str_field(v, "status")?;
    let status = StepStatusV1::from_wire(&status_raw).ok_or_else(|| {
        invalid(
            &format!("steps[{index}].status"),
            &format!("unknown status {status_raw:?}"),
        )
    })?;

    let frontier = field(v, "frontier")?
        .as_array()
        .ok_or_else(|| invalid(&format!("steps[{index}].frontier"), "expected array"))?
        .iter()
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let min_costs = field(v, "min_costs")?
        .as_object()
        .ok_or_else(|| invalid(&format!("steps[{index}].min_costs"), "expected object"))?
        .iter()
        .map(|(node, cost)| {
            cost.as_u64()
                .map(|c| (node.clone(), c))
                .ok_or_else(|| invalid(&format!("steps[{index}].min_costs.{node}"), "expected u64"))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let expanded = optional(v, "expanded", |x| x.as_str().map(String::from))?;
    let path = optional(v, "path", parse_path)?;
    let cost = optional(v, "cost", Value::as_u64)?;

    Ok(TraceStepV1 {
        action: str_field(v, "action")?,
        frontier,
        min_costs,
        expanded,
        path,
        cost,
        status,
    })
}

fn parse_entry(v: &Value) -> Result<FrontierEntryV1, TraceParseError> {
    Ok(FrontierEntryV1 {
        cost: u64_field(v, "cost")?,
        node: str_field(v, "node")?,
        path: parse_path(field(v, "path")?).ok_or_else(|| invalid("path", "expected [string]"))?,
    })
}

fn parse_path(v: &Value) -> Option<Vec<String>> {
    v.as_array()?
        .iter()
        .map(|n| n.as_str().map(String::from))
        .collect()
}

fn parse_termination(v: &Value) -> Result<TerminationReasonV1, TraceParseError> {
    match str_field(v, "type")?.as_str() {
        "goal_reached" => Ok(TerminationReasonV1::GoalReached {
            cost: u64_field(v, "cost")?,
        }),
        "frontier_exhausted" => Ok(TerminationReasonV1::FrontierExhausted),
        other => Err(invalid(
            "metadata.termination.type",
            &format!("unknown termination {other:?}"),
        )),
    }
}

fn field<'a>(v: &'a Value, name: &str) -> Result<&'a Value, TraceParseError> {
    v.get(name).ok_or_else(|| TraceParseError::MissingField {
        field: name.to_string(),
    })
}

fn str_field(v: &Value, name: &str) -> Result<String, TraceParseError> {
    field(v, name)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| invalid(name, "expected string"))
}

fn u64_field(v: &Value, name: &str) -> Result<u64, TraceParseError> {
    field(v, name)?
        .as_u64()
        .ok_or_else(|| invalid(name, "expected u64"))
}

/// A nullable field: `null` maps to `None`, anything else must parse.
fn optional<T>(
    v: &Value,
    name: &str,
    parse: impl Fn(&Value) -> Option<T>,
) -> Result<Option<T>, TraceParseError> {
    let raw = field(v, name)?;
    if raw.is_null() {
        return Ok(None);
    }
    parse(raw)
        .map(Some)
        .ok_or_else(|| invalid(name, "unexpected type"))
}

fn invalid(field: &str, detail: &str) -> TraceParseError {
    TraceParseError::InvalidField {
        field: field.to_string(),
        detail: detail.to_string(),
    }
}
