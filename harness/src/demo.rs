//! Built-in demo graph used when no graph file is given.

/// Eight nodes, `A` through `H`. Defaults resolve to `A` → `H`, whose
/// cheapest route is `A -> B -> D -> H` at cost 5.
pub const DEMO_GRAPH: &str = "\
A: B=1, C=5
B: D=3, E=6
C: F=4, G=2
D: H=1
E: G=2
F: H=3
G: H=1";
