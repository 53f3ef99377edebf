use super::builder::{AnonStep, GremlinQuery, Projection, Traversal};
use super::Direction;
use serde_json::Value;

/// Path label under which the originating vertex is kept, so nested edge
/// projections can refer back to it after the cursor moved to the edge.
pub const NODE_ALIAS: &str = "node";

/// Upper bound on the number of vertices a compiled query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimit(u64);

impl NodeLimit {
    pub fn new(n: u64) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Read a client-supplied `nodeLimit`.
    ///
    /// Numbers and numeric strings are accepted. Anything that is not a
    /// finite value of at least 1 after truncation means "no limit".
    pub fn from_json(value: &Value) -> Option<Self> {
        let n = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !n.is_finite() || n < 1.0 {
            return None;
        }
        Self::new(n.trunc() as u64)
    }
}

/// Expand `expression` into a projected query for the visualization.
///
/// The limit caps the traversed rows; directional variants then dedup them
/// before the projection, so every vertex yields exactly one row.
pub fn compile(expression: &str, direction: Direction, limit: Option<NodeLimit>) -> GremlinQuery {
    let mut query = GremlinQuery::from_expression(expression);

    if let Some(limit) = limit {
        query = query.limit(limit.get());
    }
    if direction != Direction::SelfOnly {
        query = query.dedup();
    }

    let mut projection = Projection::new()
        .field("id", Traversal::id())
        .field("label", Traversal::label())
        .field("properties", Traversal::value_map());

    match direction {
        Direction::SelfOnly => {}
        Direction::Outbound => projection = projection.field("edges", edges(AnonStep::OutE, direction)),
        Direction::Inbound => projection = projection.field("edges", edges(AnonStep::InE, direction)),
    }

    query.alias(NODE_ALIAS).project(projection)
}

fn edges(edge_step: AnonStep, direction: Direction) -> Traversal {
    let current = Traversal::selected_id(NODE_ALIAS);
    let (from, to) = match direction {
        Direction::Inbound => (Traversal::new().then(AnonStep::OutV).then(AnonStep::Id), current),
        _ => (current, Traversal::new().then(AnonStep::InV).then(AnonStep::Id)),
    };

    let edge = Projection::new()
        .field("id", Traversal::id())
        .field("from", from)
        .field("to", to)
        .field("label", Traversal::label())
        .field("properties", Traversal::value_map());

    // fold() turns "no edges" into an empty list instead of dropping the row
    Traversal::new()
        .then(edge_step)
        .then(AnonStep::Project(edge))
        .then(AnonStep::Fold)
}
