use super::{graphson, GraphExecutor, StoreError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use vizgraph_common::config::StoreConfig;

#[derive(Debug, Clone, Serialize)]
struct SubmitRequest<'a> {
    gremlin: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    status: Option<ResponseStatus>,
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

/// Executes queries through the Gremlin Server HTTP endpoint (`http://`,
/// `https://`). Cosmos DB only serves WebSocket; use
/// [`GremlinWsExecutor`](super::GremlinWsExecutor) there.
///
/// Built once from [`StoreConfig`]; every `execute` is an independent,
/// freshly authenticated request.
pub struct GremlinHttpExecutor {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
    mime_type: String,
}

impl GremlinHttpExecutor {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            username: config.auth_username(),
            password: config.primary_key.clone(),
            mime_type: config.mime_type.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphExecutor for GremlinHttpExecutor {
    async fn execute(&self, query: &str) -> Result<Vec<Value>, StoreError> {
        tracing::debug!(query = %query, "Submitting Gremlin query");

        let res = self.client.post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", &self.mime_type)
            .json(&SubmitRequest { gremlin: query })
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(StoreError::Http { status: status.as_u16(), body });
        }

        let parsed: SubmitResponse = serde_json::from_str(&body)?;
        if let Some(st) = parsed.status {
            // 204 is "no content", a valid empty result
            if st.code != 200 && st.code != 204 {
                return Err(StoreError::Server { code: st.code, message: st.message });
            }
        }

        let items = match parsed.result {
            Some(result) => graphson::rows(result.data)?,
            None => Vec::new(),
        };
        tracing::debug!(rows = items.len(), "Gremlin query returned");
        tracing::trace!(payload = %body, "Raw Gremlin response");
        Ok(items)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
