use super::{graphson, GraphExecutor, StoreError};
use async_trait::async_trait;
use base64::Engine;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;
use vizgraph_common::config::StoreConfig;

// Gremlin Server response status codes
const STATUS_SUCCESS: u16 = 200;
const STATUS_NO_CONTENT: u16 = 204;
const STATUS_PARTIAL_CONTENT: u16 = 206;
const STATUS_AUTHENTICATE: u16 = 407;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestMessage {
    request_id: Uuid,
    op: &'static str,
    processor: &'static str,
    args: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    status: ResponseStatus,
    #[serde(default)]
    result: Option<ResponseResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseStatus {
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseResult {
    #[serde(default)]
    data: Value,
}

/// Executes queries over the Gremlin WebSocket protocol (`ws://`, `wss://`),
/// the only transport Cosmos DB's Gremlin API accepts.
///
/// Every `execute` opens its own connection, answers the SASL PLAIN
/// challenge with `/dbs/<db>/colls/<coll>` and the primary key, collects
/// all partial responses and closes the connection.
pub struct GremlinWsExecutor {
    endpoint: String,
    username: String,
    password: String,
    mime_type: String,
    timeout: Option<Duration>,
}

impl GremlinWsExecutor {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            username: config.auth_username(),
            password: config.primary_key.clone(),
            mime_type: config.mime_type.clone(),
            timeout: config.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Binary frame: mime length byte, mime type, JSON request.
    fn frame(&self, request: &RequestMessage) -> Result<Message, StoreError> {
        let body = serde_json::to_vec(request)?;
        let mime = self.mime_type.as_bytes();
        let mut payload = Vec::with_capacity(1 + mime.len() + body.len());
        payload.push(mime.len() as u8);
        payload.extend_from_slice(mime);
        payload.extend_from_slice(&body);
        Ok(Message::Binary(payload))
    }

    fn eval_request(&self, request_id: Uuid, query: &str) -> RequestMessage {
        RequestMessage {
            request_id,
            op: "eval",
            processor: "",
            args: json!({
                "gremlin": query,
                "bindings": {},
                "language": "gremlin-groovy",
            }),
        }
    }

    fn auth_request(&self, request_id: Uuid) -> RequestMessage {
        let credentials = format!("\0{}\0{}", self.username, self.password);
        RequestMessage {
            request_id,
            op: "authentication",
            processor: "",
            args: json!({
                "sasl": base64::engine::general_purpose::STANDARD.encode(credentials),
                "saslMechanism": "PLAIN",
            }),
        }
    }

    async fn submit(&self, query: &str) -> Result<Vec<Value>, StoreError> {
        let (mut socket, _) = connect_async(self.endpoint.as_str()).await?;
        let request_id = Uuid::new_v4();
        socket.send(self.frame(&self.eval_request(request_id, query))?).await?;

        let mut items = Vec::new();
        loop {
            let message = match socket.next().await {
                Some(message) => message?,
                None => return Err(StoreError::UnexpectedPayload("connection ended before final response".into())),
            };
            let text = match message {
                Message::Text(text) => text,
                Message::Binary(bytes) => String::from_utf8(bytes)
                    .map_err(|e| StoreError::UnexpectedPayload(e.to_string()))?,
                Message::Close(_) => {
                    return Err(StoreError::UnexpectedPayload("connection closed before final response".into()))
                }
                _ => continue,
            };

            let response: ResponseMessage = serde_json::from_str(&text)?;
            match response.status.code {
                STATUS_AUTHENTICATE => {
                    tracing::debug!("Answering SASL challenge");
                    socket.send(self.frame(&self.auth_request(request_id))?).await?;
                }
                STATUS_SUCCESS | STATUS_PARTIAL_CONTENT => {
                    if let Some(result) = response.result {
                        items.extend(graphson::rows(result.data)?);
                    }
                    if response.status.code == STATUS_SUCCESS {
                        break;
                    }
                }
                STATUS_NO_CONTENT => break,
                code => {
                    return Err(StoreError::Server { code, message: response.status.message });
                }
            }
        }

        if let Err(e) = socket.close(None).await {
            tracing::debug!(error = %e, "Closing Gremlin connection failed");
        }
        Ok(items)
    }
}

#[async_trait]
impl GraphExecutor for GremlinWsExecutor {
    async fn execute(&self, query: &str) -> Result<Vec<Value>, StoreError> {
        tracing::debug!(query = %query, "Submitting Gremlin query");

        let items = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.submit(query))
                .await
                .map_err(|_| StoreError::Timeout(limit.as_secs()))??,
            None => self.submit(query).await?,
        };

        tracing::debug!(rows = items.len(), "Gremlin query returned");
        Ok(items)
    }
}

#[cfg(test)]
#[path = "websocket_tests.rs"]
mod websocket_tests;
