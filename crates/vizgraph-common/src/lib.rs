use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub mod config;

/// Property map as the store returns it. Vertex properties arrive as lists
/// (every property is multi-valued in the store), edge properties may
/// already be scalars.
pub type PropertyMap = HashMap<String, serde_json::Value>;

/// Collapsed, caller-facing property map.
pub type ScalarMap = BTreeMap<String, serde_json::Value>;

/// One row of a compiled traversal, exactly as projected by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawVertexResult {
    pub id: serde_json::Value,
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
    /// Only projected for inbound/outbound traversals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<RawEdgeResult>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEdgeResult {
    pub id: serde_json::Value,
    pub from: serde_json::Value,
    pub to: serde_json::Value,
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualizationNode {
    pub id: String,
    pub label: String,
    pub properties: ScalarMap,
    pub edges: Vec<VisualizationEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualizationEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
    pub properties: ScalarMap,
}

/// Inbound/outbound edge counts of a single vertex.
///
/// Both counts set to `-1` means the vertex was not found or the query
/// failed; see [`EdgeCountResult::NOT_FOUND`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeCountResult {
    pub in_edges_count: i64,
    pub out_edges_count: i64,
}

impl EdgeCountResult {
    pub const NOT_FOUND: EdgeCountResult = EdgeCountResult {
        in_edges_count: -1,
        out_edges_count: -1,
    };

    pub fn new(in_edges_count: i64, out_edges_count: i64) -> Self {
        Self { in_edges_count, out_edges_count }
    }

    pub fn is_not_found(&self) -> bool {
        *self == Self::NOT_FOUND
    }
}
