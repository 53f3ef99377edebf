pub mod query;
pub mod store;
pub mod normalize;
pub mod edge_count;
pub mod fixtures;
pub mod service;

pub use query::{classify, compile, Direction, GremlinQuery, NodeLimit, QueryPlan};
pub use store::{connect, GraphExecutor, GremlinHttpExecutor, GremlinWsExecutor, StoreError};
pub use normalize::normalize;
pub use edge_count::edge_count;
pub use fixtures::{FixtureError, FixtureStore};
pub use service::{QueryOutcome, QueryRequest, VisualizationService};

// Re-export common types for convenience
pub use vizgraph_common::{EdgeCountResult, RawEdgeResult, RawVertexResult, VisualizationEdge, VisualizationNode};
