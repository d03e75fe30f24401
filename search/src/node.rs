//! Frontier entries and the frontier ordering key.

use std::cmp::Ordering;

/// A candidate path waiting in the frontier.
///
/// `path` always starts at the search start and ends at `node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntryV1 {
    /// Accumulated cost from the start to `node` along `path`.
    pub cost: u64,
    /// The node this entry would expand.
    pub node: String,
    /// Full path from the start, inclusive of both ends.
    pub path: Vec<String>,
}

impl FrontierEntryV1 {
    /// The root entry: cost 0, path `[start]`.
    #[must_use]
    pub fn root(start: &str) -> Self {
        Self {
            cost: 0,
            node: start.to_string(),
            path: vec![start.to_string()],
        }
    }

    /// Extend this entry along an edge of cost `edge_cost` to `neighbor`.
    ///
    /// Cost accumulation saturates at `u64::MAX`.
    #[must_use]
    pub fn extend(&self, neighbor: &str, edge_cost: u64) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(neighbor.to_string());
        Self {
            cost: self.cost.saturating_add(edge_cost),
            node: neighbor.to_string(),
            path,
        }
    }

    /// JSON projection: `{"cost": .., "node": .., "path": [..]}`.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "cost": self.cost,
            "node": self.node,
            "path": self.path,
        })
    }
}

/// The frontier ordering key: `(cost, node, path, creation_order)`.
///
/// Lower cost first. Equal costs fall back to the node identifier (byte-wise
/// lexicographic), then to the path (element-wise lexicographic), then to
/// the push counter. The last field makes the order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierKey<'a> {
    pub cost: u64,
    pub node: &'a str,
    pub path: &'a [String],
    pub creation_order: u64,
}

impl<'a> FrontierKey<'a> {
    /// Borrow the key of `entry` pushed as the `creation_order`-th entry.
    #[must_use]
    pub fn of(entry: &'a FrontierEntryV1, creation_order: u64) -> Self {
        Self {
            cost: entry.cost,
            node: &entry.node,
            path: &entry.path,
            creation_order,
        }
    }
}

impl PartialOrd for FrontierKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.node.as_bytes().cmp(other.node.as_bytes()))
            .then_with(|| self.path.cmp(other.path))
            .then(self.creation_order.cmp(&other.creation_order))
    }
}
