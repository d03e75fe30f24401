//! `WeightedGraphV1`: the weighted directed graph the search runs over.
//!
//! Node iteration is sorted (`BTreeMap`) so every serialization boundary is
//! deterministic. Outgoing edges keep declaration order: the search visits
//! neighbors in the order the user wrote them, which is what the trace shows.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::proof::canon::{canonical_json_bytes, CanonError};
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Failure decoding a graph from its JSON projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphDecodeError {
    #[error("graph JSON is invalid: {detail}")]
    InvalidJson { detail: String },
    #[error("graph JSON has unexpected shape at {at}")]
    UnexpectedShape { at: String },
}

/// One outgoing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeV1 {
    /// Target node identifier.
    pub to: String,
    /// Non-negative edge cost.
    pub cost: u64,
}

/// Weighted directed graph keyed by node identifier.
///
/// Only nodes with a declared adjacency appear as keys. A node referenced
/// solely as an edge target is still part of [`WeightedGraphV1::nodes`],
/// and stays there even if the adjacency that mentioned it is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedGraphV1 {
    adjacency: BTreeMap<String, Vec<EdgeV1>>,
    mentioned: BTreeSet<String>,
}

impl WeightedGraphV1 {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `node` with no outgoing edges, replacing any previous adjacency.
    ///
    /// Targets of the replaced adjacency remain in [`WeightedGraphV1::nodes`].
    pub fn declare_node(&mut self, node: impl Into<String>) {
        let node = node.into();
        self.mentioned.insert(node.clone());
        self.adjacency.insert(node, Vec::new());
    }

    /// Add or overwrite the edge `from -> to`.
    ///
    /// Overwriting keeps the edge at its original position in `from`'s
    /// neighbor order. `from` is declared if it was not already.
    pub fn set_edge(&mut self, from: impl Into<String>, to: impl Into<String>, cost: u64) {
        let from = from.into();
        let to = to.into();
        self.mentioned.insert(from.clone());
        self.mentioned.insert(to.clone());
        let edges = self.adjacency.entry(from).or_default();
        if let Some(existing) = edges.iter_mut().find(|e| e.to == to) {
            existing.cost = cost;
        } else {
            edges.push(EdgeV1 { to, cost });
        }
    }

    /// Builder-style [`WeightedGraphV1::set_edge`].
    #[must_use]
    pub fn with_edge(mut self, from: &str, to: &str, cost: u64) -> Self {
        self.set_edge(from, to, cost);
        self
    }

    /// Outgoing edges of `node` in declaration order (empty for leaves and
    /// unknown nodes).
    #[must_use]
    pub fn neighbors(&self, node: &str) -> &[EdgeV1] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Cost of the edge `from -> to`, if present.
    #[must_use]
    pub fn edge_cost(&self, from: &str, to: &str) -> Option<u64> {
        self.neighbors(from)
            .iter()
            .find(|e| e.to == to)
            .map(|e| e.cost)
    }

    /// Whether `node` has a declared adjacency entry.
    #[must_use]
    pub fn has_adjacency(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Every node ever mentioned (sources and targets), sorted.
    #[must_use]
    pub fn nodes(&self) -> Vec<&str> {
        self.mentioned.iter().map(String::as_str).collect()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Whether no node has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterate `(source, edges)` in sorted source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EdgeV1])> {
        self.adjacency
            .iter()
            .map(|(src, edges)| (src.as_str(), edges.as_slice()))
    }

    /// JSON projection: `{"nodes": {src: [[to, cost], ...]}}`.
    ///
    /// Only the adjacency is projected. A name mentioned solely by a replaced
    /// adjacency does not survive a round trip; it can never be reached, so
    /// no search over the decoded graph differs.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let nodes: serde_json::Map<String, serde_json::Value> = self
            .adjacency
            .iter()
            .map(|(src, edges)| {
                let list = edges
                    .iter()
                    .map(|e| serde_json::json!([e.to, e.cost]))
                    .collect::<Vec<_>>();
                (src.clone(), serde_json::Value::Array(list))
            })
            .collect();
        serde_json::json!({ "nodes": nodes })
    }

    /// Inverse of [`WeightedGraphV1::to_json_value`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphDecodeError::UnexpectedShape`] if the value is not
    /// `{"nodes": {src: [[to, cost], ...]}}` with `u64` costs.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, GraphDecodeError> {
        let shape = |at: &str| GraphDecodeError::UnexpectedShape { at: at.to_string() };
        let nodes = value
            .get("nodes")
            .and_then(serde_json::Value::as_object)
            .ok_or_else(|| shape("nodes"))?;

        let mut graph = Self::new();
        for (src, edges) in nodes {
            graph.declare_node(src.as_str());
            let edges = edges.as_array().ok_or_else(|| shape(src.as_str()))?;
            for edge in edges {
                let pair = edge
                    .as_array()
                    .filter(|p| p.len() == 2)
                    .ok_or_else(|| shape(src.as_str()))?;
                let to = pair[0].as_str().ok_or_else(|| shape(src.as_str()))?;
                let cost = pair[1].as_u64().ok_or_else(|| shape(src.as_str()))?;
                graph.set_edge(src.as_str(), to, cost);
            }
        }
        Ok(graph)
    }

    /// Parse graph JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphDecodeError`] on invalid JSON or unexpected shape.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, GraphDecodeError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| GraphDecodeError::InvalidJson {
                detail: e.to_string(),
            })?;
        Self::from_json_value(&value)
    }

    /// Serialize the graph to canonical JSON bytes.
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
        Ok(canonical_hash(HashDomain::WeightedGraph, &bytes))
    }
}
