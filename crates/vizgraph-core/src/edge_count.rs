use crate::query::{AnonStep, GremlinQuery, Projection, Traversal};
use crate::store::{graphson, GraphExecutor};
use vizgraph_common::EdgeCountResult;

/// `g.V('<id>').project('inEdgesCount', 'outEdgesCount')` counting both directions.
pub fn edge_count_query(node_id: &str) -> GremlinQuery {
    GremlinQuery::vertex(node_id).project(
        Projection::new()
            .field("inEdgesCount", Traversal::new().then(AnonStep::InE).then(AnonStep::Count))
            .field("outEdgesCount", Traversal::new().then(AnonStep::OutE).then(AnonStep::Count)),
    )
}

/// Count the edges of one vertex, or [`EdgeCountResult::NOT_FOUND`] when the
/// vertex does not exist or the store could not answer.
pub async fn edge_count(executor: &dyn GraphExecutor, node_id: &str) -> EdgeCountResult {
    let query = edge_count_query(node_id).render();

    let rows = match executor.execute(&query).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(node_id = %node_id, error = %e, "Edge count query failed");
            return EdgeCountResult::NOT_FOUND;
        }
    };

    let Some(first) = rows.into_iter().next() else {
        tracing::info!(node_id = %node_id, "Edge count: vertex not found");
        return EdgeCountResult::NOT_FOUND;
    };

    match serde_json::from_value(graphson::untype(first)) {
        Ok(counts) => counts,
        Err(e) => {
            tracing::error!(node_id = %node_id, error = %e, "Edge count row has unexpected shape");
            EdgeCountResult::NOT_FOUND
        }
    }
}
