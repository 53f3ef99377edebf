use axum::{
    extract::{Path, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use vizgraph_common::config::AppConfig;
use vizgraph_core::{FixtureStore, QueryRequest, VisualizationService};

type AppState = Arc<VisualizationService>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::info!("Loaded .env from: {:?}", path),
        Err(e) => tracing::warn!("Failed to load .env file: {}. Using system environment variables.", e),
    }

    let config = AppConfig::load()?;
    tracing::info!("Gremlin endpoint: {}", config.store.endpoint);
    tracing::info!("Database: {}, collection: {}", config.store.database, config.store.collection);
    if config.store.primary_key.is_empty() {
        tracing::warn!("No primary key configured; store requests will be sent with an empty password");
    }

    let executor = vizgraph_core::connect(&config.store)?;
    let fixtures = FixtureStore::new(&config.server.samples_dir);
    tracing::info!("Sample fixtures directory: {:?} (exists: {})", fixtures.dir(), fixtures.dir().exists());

    let state: AppState = Arc::new(VisualizationService::new(executor, fixtures));
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Gremlin visualization proxy listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to install CTRL+C handler: {}", e);
            }
            tracing::info!("Shutdown signal received.");
        })
        .await?;

    tracing::info!("Vizgraph server stopped.");
    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request());

    Router::new()
        .route("/", get(root))
        .route("/query", post(query))
        .route("/edgecount/:node_id", get(edge_count))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .into_inner(),
        )
        .with_state(state)
}

/// Pre-rendered JSON text; always 200 so a failed traversal never breaks the
/// visualization client.
fn json_text(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn root() -> &'static str {
    "Vizgraph Gremlin proxy is running"
}

async fn query(
    State(service): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Response {
    let body = service.query(&request).await.into_body();
    tracing::debug!("Query response: {}", body);
    json_text(body)
}

async fn edge_count(
    State(service): State<AppState>,
    Path(node_id): Path<String>,
) -> Response {
    let counts = service.edge_count(&node_id).await;
    let body = serde_json::to_string_pretty(&counts).unwrap_or_else(|_| "{}".to_string());
    json_text(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use vizgraph_core::{GraphExecutor, StoreError};

    struct StubExecutor {
        rows: Option<Vec<Value>>,
    }

    #[async_trait]
    impl GraphExecutor for StubExecutor {
        async fn execute(&self, _query: &str) -> Result<Vec<Value>, StoreError> {
            self.rows
                .clone()
                .ok_or_else(|| StoreError::Http { status: 401, body: "Unauthorized".into() })
        }
    }

    fn app(rows: Option<Vec<Value>>, samples: &std::path::Path) -> Router {
        let service = VisualizationService::new(Arc::new(StubExecutor { rows }), FixtureStore::new(samples));
        router(Arc::new(service))
    }

    async fn post_query(app: Router, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/query")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_query_returns_pretty_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![json!({ "id": "123", "label": "Person", "properties": { "name": ["Alice"] } })];

        let (status, body) = post_query(app(Some(rows), dir.path()), json!({ "query": "g.V('123')" })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains('\n'), "expected pretty-printed JSON");
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            parsed,
            json!([{ "id": "123", "label": "Person", "properties": { "name": "Alice" }, "edges": [] }])
        );
    }

    #[tokio::test]
    async fn test_query_failure_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) =
            post_query(app(None, dir.path()), json!({ "query": "g.V('1').out()", "nodeLimit": 5 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_sample_query_returns_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let content = "[\n  {\"id\": \"a\", \"label\": \"Sample\", \"properties\": {}, \"edges\": []}\n]";
        std::fs::write(dir.path().join("demo.json"), content).unwrap();

        let (status, body) = post_query(app(None, dir.path()), json!({ "query": "sample:demo" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, content);
    }

    #[tokio::test]
    async fn test_edge_count_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get_body(app(Some(vec![]), dir.path()), "/edgecount/999").await;
        assert_eq!(status, StatusCode::OK);
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, json!({ "inEdgesCount": -1, "outEdgesCount": -1 }));
    }

    #[tokio::test]
    async fn test_edge_count_found() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![json!({ "inEdgesCount": 3, "outEdgesCount": 1 })];
        let (_, body) = get_body(app(Some(rows), dir.path()), "/edgecount/123").await;
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, json!({ "inEdgesCount": 3, "outEdgesCount": 1 }));
    }

    #[tokio::test]
    async fn test_content_type_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder().uri("/edgecount/1").body(Body::empty()).unwrap();
        let response = app(None, dir.path()).oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_cors_allows_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/query")
            .header("origin", "http://localhost:8080")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(None, dir.path()).oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "http://localhost:8080");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }
}
