//! Shared graph regimes and helpers for the benchmark suites.

use std::fmt::Write as _;

use ucs_kernel::carrier::graph::WeightedGraphV1;
use ucs_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use ucs_search::search::SearchResult;

/// A named graph with fixed endpoints.
pub struct Regime {
    pub name: &'static str,
    pub graph: WeightedGraphV1,
    pub start: String,
    pub goal: String,
}

/// `width` × `height` grid, 4-connected, costs varying with position so that
/// many equal-length routes have different costs. Start is the top-left
/// cell, goal the bottom-right.
#[must_use]
pub fn grid_regime(width: usize, height: usize) -> Regime {
    let cell = |x: usize, y: usize| format!("r{y}c{x}");
    let mut graph = WeightedGraphV1::new();
    for y in 0..height {
        for x in 0..width {
            let from = cell(x, y);
            graph.declare_node(from.clone());
            let weight = 1 + ((x * 7 + y * 3) % 5) as u64;
            if x + 1 < width {
                graph.set_edge(from.clone(), cell(x + 1, y), weight);
            }
            if y + 1 < height {
                graph.set_edge(from.clone(), cell(x, y + 1), weight + 1);
            }
            if x > 0 {
                graph.set_edge(from.clone(), cell(x - 1, y), weight + 2);
            }
            if y > 0 {
                graph.set_edge(from.clone(), cell(x, y - 1), weight + 3);
            }
        }
    }
    Regime {
        name: "grid",
        graph,
        start: cell(0, 0),
        goal: cell(width - 1, height - 1),
    }
}

/// Fully connected layers where each later edge is cheaper, so most nodes
/// get their min cost improved several times and the frontier fills with
/// stale entries.
#[must_use]
pub fn update_pressure_regime(layers: usize, width: usize) -> Regime {
    let node = |l: usize, i: usize| format!("L{l}n{i}");
    let mut graph = WeightedGraphV1::new();
    graph.declare_node("src");
    for i in 0..width {
        graph.set_edge("src", node(0, i), (i + 1) as u64);
    }
    for l in 0..layers.saturating_sub(1) {
        for i in 0..width {
            for j in 0..width {
                graph.set_edge(node(l, i), node(l + 1, j), (width - i + j) as u64);
            }
        }
    }
    for i in 0..width {
        graph.set_edge(node(layers - 1, i), "dst", 1);
    }
    Regime {
        name: "update_pressure",
        graph,
        start: "src".into(),
        goal: "dst".into(),
    }
}

/// A long chain plus a side component that can never reach the goal; the
/// goal is absent, so the search exhausts the frontier.
#[must_use]
pub fn exhaustive_regime(length: usize) -> Regime {
    let mut graph = WeightedGraphV1::new();
    for i in 0..length {
        graph.set_edge(format!("c{i}"), format!("c{}", i + 1), 1);
        graph.set_edge(format!("c{i}"), format!("s{i}"), 2);
    }
    Regime {
        name: "exhaustive",
        graph,
        start: "c0".into(),
        goal: "missing".into(),
    }
}

/// The regimes every suite measures.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    vec![
        grid_regime(12, 12),
        update_pressure_regime(6, 8),
        exhaustive_regime(300),
    ]
}

/// Graph text for `regime`, for measuring compilation.
#[must_use]
pub fn graph_text(graph: &WeightedGraphV1) -> String {
    let mut text = String::new();
    for (src, edges) in graph.iter() {
        let items: Vec<String> = edges.iter().map(|e| format!("{}={}", e.to, e.cost)).collect();
        let _ = writeln!(text, "{src}: {}", items.join(", "));
    }
    text
}

/// Digest of a result's canonical bytes, used to check that every timed
/// iteration produced the same answer.
///
/// # Panics
///
/// Panics if the result cannot be canonicalized. Benchmark setup failures
/// are fatal.
#[must_use]
pub fn result_guard(result: &SearchResult) -> ContentHash {
    let bytes = result
        .trace
        .to_canonical_json_bytes()
        .expect("trace canonical JSON");
    canonical_hash(HashDomain::BenchGuard, &bytes)
}
