//! Plain-text rendering of trace steps and results.
//!
//! Text only: the status line, the action line, the priority queue table,
//! and the min-cost table for each step.

use std::fmt::Write as _;

use crate::search::{SearchOutcomeV1, SearchResult};
use crate::trace::TraceStepV1;

/// Join a path as `A -> B -> C`.
#[must_use]
pub fn format_path(path: &[String]) -> String {
    path.join(" -> ")
}

/// Render one step. `index` is 0-based; the output numbers steps from 1.
#[must_use]
pub fn render_step(index: usize, step: &TraceStepV1) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Step {} | Status: {}", index + 1, step.status);
    let _ = writeln!(out, "{}", step.action);

    out.push_str("Priority queue:\n");
    let queue_rows: Vec<[String; 3]> = step
        .frontier
        .iter()
        .map(|e| [e.cost.to_string(), e.node.clone(), format_path(&e.path)])
        .collect();
    write_table(&mut out, ["Cost", "Node", "Path"], &queue_rows);

    out.push_str("Min cost:\n");
    let cost_rows: Vec<[String; 2]> = step
        .min_costs
        .iter()
        .map(|(node, cost)| [node.clone(), cost.to_string()])
        .collect();
    write_table(&mut out, ["Node", "Min Cost"], &cost_rows);

    out
}

/// Render the final summary of a run.
#[must_use]
pub fn render_summary(result: &SearchResult) -> String {
    let mut out = String::new();
    match &result.outcome {
        SearchOutcomeV1::Found { path, cost } => {
            let _ = writeln!(out, "Lowest-cost path found: {}", format_path(path));
            let _ = writeln!(out, "Total cost: {cost}");
        }
        SearchOutcomeV1::Unreachable => {
            let _ = writeln!(
                out,
                "Goal '{}' is unreachable from '{}'.",
                result.trace.goal, result.trace.start
            );
        }
    }
    let _ = writeln!(out, "Finished in {} steps.", result.trace.len());
    out
}

/// Every step in order, blank-line separated, followed by the summary.
#[must_use]
pub fn render_report(result: &SearchResult) -> String {
    let mut out = String::new();
    for (i, step) in result.trace.steps.iter().enumerate() {
        out.push_str(&render_step(i, step));
        out.push('\n');
    }
    out.push_str(&render_summary(result));
    out
}

/// Left-aligned table with a header row and `(empty)` for no rows.
fn write_table<const N: usize>(out: &mut String, header: [&str; N], rows: &[[String; N]]) {
    if rows.is_empty() {
        out.push_str("  (empty)\n");
        return;
    }
    let mut widths = header.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    write_row(out, &header.map(String::from), &widths);
    for row in rows {
        write_row(out, row, &widths);
    }
}

fn write_row<const N: usize>(out: &mut String, cells: &[String; N], widths: &[usize; N]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "  {}", line.trim_end());
}
