//! Compilation boundary: `compile_graph(text) -> WeightedGraphV1`.
//!
//! Input format, one source node per line:
//!
//! ```text
//! A: B=1, C=5
//! B: D=3
//! D:
//! ```
//!
//! - The whole input is trimmed; each line is split on its first `:`.
//! - Lines without `:` carry no adjacency and are skipped.
//! - Items after the `:` are comma separated and trimmed. Empty items are
//!   skipped, so `D:` declares a leaf.
//! - Every other item must be `neighbor=cost` with a non-negative integer cost.
//! - A later line for the same source replaces the earlier adjacency; a
//!   repeated neighbor on one line overwrites the earlier cost in place.
//!   Nodes named only by the replaced line still count as nodes.
//!
//! Pure function: identical text produces an identical graph. Fail-closed:
//! no partial graph is returned on error.

use thiserror::Error;

use crate::carrier::graph::WeightedGraphV1;

/// Typed compilation failure. `line` is 1-based within the trimmed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An edge item did not split into exactly `neighbor=cost`.
    #[error("line {line}: malformed edge {item:?} (expected neighbor=cost)")]
    MalformedEdge { line: usize, item: String },
    /// The cost is not a non-negative integer.
    #[error("line {line}: invalid cost {raw:?} for edge to {neighbor:?}")]
    InvalidCost {
        line: usize,
        neighbor: String,
        raw: String,
    },
    /// A source or neighbor name is empty after trimming.
    #[error("line {line}: empty node name")]
    EmptyNodeName { line: usize },
    /// The input declared no nodes at all.
    #[error("graph is empty: no line of the form `node: neighbor=cost, ...`")]
    EmptyGraph,
}

/// Compile graph text into a [`WeightedGraphV1`].
///
/// # Errors
///
/// Returns [`CompileError`] on the first malformed line or if no node is
/// declared.
pub fn compile_graph(text: &str) -> Result<WeightedGraphV1, CompileError> {
    let mut graph = WeightedGraphV1::new();

    for (idx, raw_line) in text.trim().lines().enumerate() {
        let line = idx + 1;
        let Some((source, items)) = raw_line.split_once(':') else {
            continue;
        };
        let source = source.trim();
        if source.is_empty() {
            return Err(CompileError::EmptyNodeName { line });
        }

        graph.declare_node(source);
        for item in items.split(',').map(str::trim) {
            if item.is_empty() {
                continue;
            }
            let (neighbor, cost) = parse_edge(line, item)?;
            graph.set_edge(source, neighbor, cost);
        }
    }

    if graph.is_empty() {
        return Err(CompileError::EmptyGraph);
    }
    Ok(graph)
}

fn parse_edge(line: usize, item: &str) -> Result<(&str, u64), CompileError> {
    let mut parts = item.split('=');
    let (Some(neighbor), Some(raw_cost), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CompileError::MalformedEdge {
            line,
            item: item.to_string(),
        });
    };

    let neighbor = neighbor.trim();
    if neighbor.is_empty() {
        return Err(CompileError::EmptyNodeName { line });
    }

    let raw_cost = raw_cost.trim();
    let cost = raw_cost
        .parse::<u64>()
        .map_err(|_| CompileError::InvalidCost {
            line,
            neighbor: neighbor.to_string(),
            raw: raw_cost.to_string(),
        })?;
    Ok((neighbor, cost))
}
