// Store schema -> visualization schema
//
// The store wraps every vertex property value in a list, even single-valued
// ones. The visualization schema wants scalars, so each list collapses to its
// first element. Identifiers may be composite (GraphSON typed values, partition
// key pairs, ...) and are always rendered as strings on the way out.

use serde_json::Value;
use vizgraph_common::{
    PropertyMap, RawEdgeResult, RawVertexResult, ScalarMap, VisualizationEdge, VisualizationNode,
};

/// Convert store rows into visualization nodes, preserving row and edge order.
pub fn normalize(raw: Vec<RawVertexResult>) -> Vec<VisualizationNode> {
    raw.into_iter().map(normalize_vertex).collect()
}

pub fn normalize_vertex(vertex: RawVertexResult) -> VisualizationNode {
    VisualizationNode {
        id: stringify_id(&vertex.id),
        label: vertex.label,
        properties: collapse_properties(vertex.properties),
        edges: vertex
            .edges
            .unwrap_or_default()
            .into_iter()
            .map(normalize_edge)
            .collect(),
    }
}

pub fn normalize_edge(edge: RawEdgeResult) -> VisualizationEdge {
    VisualizationEdge {
        id: stringify_id(&edge.id),
        from: stringify_id(&edge.from),
        to: stringify_id(&edge.to),
        label: edge.label,
        properties: collapse_properties(edge.properties),
    }
}

/// Take the first element of every property value list.
///
/// Values that are already scalars pass through, nested list wrappers are
/// unwrapped until a non-list value is reached, and an empty list becomes
/// `null`.
pub fn collapse_properties(properties: PropertyMap) -> ScalarMap {
    properties
        .into_iter()
        .map(|(name, value)| (name, collapse_value(value)))
        .collect()
}

fn collapse_value(mut value: Value) -> Value {
    while let Value::Array(items) = value {
        value = items.into_iter().next().unwrap_or(Value::Null);
    }
    value
}

/// Strings pass through untouched; anything else becomes its JSON text.
pub fn stringify_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode adapter rows into [`RawVertexResult`]s.
pub fn decode_vertices(rows: Vec<Value>) -> Result<Vec<RawVertexResult>, serde_json::Error> {
    rows.into_iter().map(serde_json::from_value).collect()
}
