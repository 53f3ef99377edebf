use crate::edge_count::edge_count;
use crate::fixtures::FixtureStore;
use crate::normalize::{decode_vertices, normalize};
use crate::query::{classify, compile, NodeLimit, QueryPlan};
use crate::store::GraphExecutor;
use serde::Deserialize;
use std::sync::Arc;
use vizgraph_common::{EdgeCountResult, VisualizationNode};

/// Body of `POST /query`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
    /// Kept raw: non-numeric values mean "no limit" rather than a bad request.
    #[serde(default)]
    pub node_limit: Option<serde_json::Value>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), node_limit: None }
    }

    pub fn with_node_limit(mut self, limit: serde_json::Value) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn limit(&self) -> Option<NodeLimit> {
        self.node_limit.as_ref().and_then(NodeLimit::from_json)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Fixture file contents, served verbatim.
    Fixture(String),
    Nodes(Vec<VisualizationNode>),
}

impl QueryOutcome {
    pub fn into_body(self) -> String {
        match self {
            QueryOutcome::Fixture(text) => text,
            QueryOutcome::Nodes(nodes) => {
                serde_json::to_string_pretty(&nodes).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

/// Request-handling core shared by all HTTP handlers.
pub struct VisualizationService {
    executor: Arc<dyn GraphExecutor>,
    fixtures: FixtureStore,
}

impl VisualizationService {
    pub fn new(executor: Arc<dyn GraphExecutor>, fixtures: FixtureStore) -> Self {
        Self { executor, fixtures }
    }

    /// Answer a traversal request. Never fails: any error is logged and
    /// degrades to an empty node list.
    pub async fn query(&self, request: &QueryRequest) -> QueryOutcome {
        let (expression, direction) = match classify(&request.query) {
            QueryPlan::Fixture(name) => {
                return match self.fixtures.load(&name).await {
                    Ok(text) => QueryOutcome::Fixture(text),
                    Err(e) => {
                        tracing::error!(fixture = %name, error = %e, "Failed to load fixture");
                        QueryOutcome::Nodes(Vec::new())
                    }
                };
            }
            QueryPlan::Traversal { expression, direction } => (expression, direction),
        };

        let compiled = compile(&expression, direction, request.limit()).render();
        tracing::info!(?direction, query = %compiled, "Compiled traversal");

        let rows = match self.executor.execute(&compiled).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "Traversal failed, answering with an empty graph");
                return QueryOutcome::Nodes(Vec::new());
            }
        };

        match decode_vertices(rows) {
            Ok(raw) => {
                let nodes = normalize(raw);
                tracing::debug!(nodes = nodes.len(), "Normalized traversal result");
                QueryOutcome::Nodes(nodes)
            }
            Err(e) => {
                tracing::error!(error = %e, "Traversal result has unexpected shape");
                QueryOutcome::Nodes(Vec::new())
            }
        }
    }

    pub async fn edge_count(&self, node_id: &str) -> EdgeCountResult {
        edge_count(self.executor.as_ref(), node_id).await
    }
}
