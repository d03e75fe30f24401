//! Run configuration: which endpoints to search between.
//!
//! Endpoints left unset resolve against the compiled graph: the start is the
//! first node in sorted order and the goal is the last. Explicit endpoints
//! are used verbatim, even when the graph does not mention them.

use ucs_kernel::carrier::graph::WeightedGraphV1;

/// Environment variable overriding the start node.
pub const ENV_START: &str = "UCS_START";

/// Environment variable overriding the goal node.
pub const ENV_GOAL: &str = "UCS_GOAL";

/// Endpoints for one run. `None` means "resolve from the graph".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfigV1 {
    pub start: Option<String>,
    pub goal: Option<String>,
}

/// Concrete start and goal after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub start: String,
    pub goal: String,
}

impl RunConfigV1 {
    /// Configuration from `UCS_START` / `UCS_GOAL`. Empty values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunConfigV1::from_env`] with an injectable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            start: read(ENV_START),
            goal: read(ENV_GOAL),
        }
    }

    /// Fill unset fields from `other`. Fields already set here win.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            start: self.start.or(other.start),
            goal: self.goal.or(other.goal),
        }
    }

    /// Resolve both endpoints against `graph`.
    ///
    /// Returns `None` only when an endpoint is unset and the graph has no
    /// nodes to default to.
    #[must_use]
    pub fn resolve(&self, graph: &WeightedGraphV1) -> Option<Endpoints> {
        let nodes = graph.nodes();
        let start = match &self.start {
            Some(s) => s.clone(),
            None => (*nodes.first()?).to_string(),
        };
        let goal = match &self.goal {
            Some(g) => g.clone(),
            None => (*nodes.last()?).to_string(),
        };
        Some(Endpoints { start, goal })
    }
}
