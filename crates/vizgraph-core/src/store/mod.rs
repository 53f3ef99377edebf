pub mod graphson;
pub mod http;
pub mod websocket;

pub use http::GremlinHttpExecutor;
pub use websocket::GremlinWsExecutor;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use vizgraph_common::config::StoreConfig;

/// Why a query produced no usable result.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("store reported status {code}: {message}")]
    Server { code: u16, message: String },

    #[error("failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected result payload: {0}")]
    UnexpectedPayload(String),

    #[error("no response from store within {0}s")]
    Timeout(u64),

    #[error("unsupported store endpoint {0:?}, expected ws://, wss://, http:// or https://")]
    UnsupportedEndpoint(String),
}

/// Runs one compiled query against the remote graph store.
///
/// An `Err` means "no usable result" and is distinct from a traversal that
/// legitimately matched nothing (`Ok` with an empty list).
#[async_trait]
pub trait GraphExecutor: Send + Sync {
    async fn execute(&self, query: &str) -> Result<Vec<serde_json::Value>, StoreError>;
}

/// Build the executor for `config.endpoint`, picked by URL scheme.
pub fn connect(config: &StoreConfig) -> Result<Arc<dyn GraphExecutor>, StoreError> {
    let endpoint = config.endpoint.to_ascii_lowercase();
    if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        Ok(Arc::new(GremlinWsExecutor::new(config)))
    } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(Arc::new(GremlinHttpExecutor::new(config)?))
    } else {
        Err(StoreError::UnsupportedEndpoint(config.endpoint.clone()))
    }
}
