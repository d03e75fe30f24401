//! Test graphs and a brute-force oracle for optimality checks.

use std::collections::BTreeSet;

use ucs_kernel::carrier::graph::WeightedGraphV1;

/// The eight-node acceptance graph. Cheapest `A` → `H` is `A -> B -> D -> H`
/// at cost 5.
#[must_use]
pub fn acceptance_graph() -> WeightedGraphV1 {
    WeightedGraphV1::new()
        .with_edge("A", "B", 1)
        .with_edge("A", "C", 5)
        .with_edge("B", "D", 3)
        .with_edge("B", "E", 6)
        .with_edge("C", "F", 4)
        .with_edge("C", "G", 2)
        .with_edge("D", "H", 1)
        .with_edge("E", "G", 2)
        .with_edge("F", "H", 3)
        .with_edge("G", "H", 1)
}

/// Deterministic pseudo-random graph over nodes `N0..N{n-1}`.
///
/// Each ordered pair gets an edge with probability roughly `density`/8,
/// with costs in `0..=max_cost`. Same `seed` gives the same graph.
#[must_use]
pub fn generated_graph(seed: u64, n: usize, density: u64, max_cost: u64) -> WeightedGraphV1 {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        state >> 33
    };

    let mut graph = WeightedGraphV1::new();
    for i in 0..n {
        graph.declare_node(node_name(i));
        for j in 0..n {
            if i != j && next() % 8 < density {
                graph.set_edge(node_name(i), node_name(j), next() % (max_cost + 1));
            }
        }
    }
    graph
}

#[must_use]
pub fn node_name(i: usize) -> String {
    format!("N{i}")
}

/// Minimum cost over all simple paths from `start` to `goal`, by exhaustive
/// enumeration. Only for small graphs.
#[must_use]
pub fn brute_force_min_cost(graph: &WeightedGraphV1, start: &str, goal: &str) -> Option<u64> {
    fn walk(
        graph: &WeightedGraphV1,
        node: &str,
        goal: &str,
        cost: u64,
        visited: &mut BTreeSet<String>,
        best: &mut Option<u64>,
    ) {
        if node == goal {
            *best = Some(best.map_or(cost, |b| b.min(cost)));
            return;
        }
        for edge in graph.neighbors(node) {
            if visited.insert(edge.to.clone()) {
                walk(graph, &edge.to, goal, cost + edge.cost, visited, best);
                visited.remove(&edge.to);
            }
        }
    }

    let mut best = None;
    let mut visited = BTreeSet::from([start.to_string()]);
    walk(graph, start, goal, 0, &mut visited, &mut best);
    best
}

/// Sum of edge costs along `path`, or `None` if a hop is not an edge.
#[must_use]
pub fn path_cost(graph: &WeightedGraphV1, path: &[String]) -> Option<u64> {
    path.windows(2)
        .map(|hop| graph.edge_cost(&hop[0], &hop[1]))
        .sum()
}
