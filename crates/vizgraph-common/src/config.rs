use serde::{Deserialize, Serialize};
use std::env;
use config::{Config, ConfigError, File, Environment};

// --- Constants for Default Configuration ---
pub const DEFAULT_STORE_ENDPOINT: &str = "ws://localhost:8182/gremlin";
pub const DEFAULT_STORE_MIME_TYPE: &str = "application/vnd.gremlin-v2.0+json";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_SAMPLES_DIR: &str = "samples";

/// Connection settings for the remote Gremlin store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub primary_key: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Unset means the request waits for the store indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_mime_type() -> String {
    DEFAULT_STORE_MIME_TYPE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub samples_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STORE_ENDPOINT.into(),
            database: String::new(),
            collection: String::new(),
            primary_key: String::new(),
            mime_type: DEFAULT_STORE_MIME_TYPE.into(),
            request_timeout_secs: None,
        }
    }
}

impl StoreConfig {
    /// SASL/basic username expected by Cosmos-style Gremlin endpoints.
    pub fn auth_username(&self) -> String {
        format!("/dbs/{}/colls/{}", self.database, self.collection)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            samples_dir: DEFAULT_SAMPLES_DIR.into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Default settings
            .set_default("store.endpoint", DEFAULT_STORE_ENDPOINT)?
            .set_default("store.database", "")?
            .set_default("store.collection", "")?
            .set_default("store.primary_key", "")?
            .set_default("store.mime_type", DEFAULT_STORE_MIME_TYPE)?
            .set_default("server.port", DEFAULT_SERVER_PORT as i64)?
            .set_default("server.samples_dir", DEFAULT_SAMPLES_DIR)?

            // File: config.toml
            .add_source(File::with_name("config").required(false))

            // Environment: VIZGRAPH_STORE__ENDPOINT=... -> store.endpoint
            .add_source(Environment::with_prefix("VIZGRAPH").prefix_separator("_").separator("__"))

            // Flat variable names used by existing deployments
            .set_override_option("store.endpoint", env::var("GREMLIN_ENDPOINT").ok())?
            .set_override_option("store.database", env::var("GREMLIN_DATABASE").ok())?
            .set_override_option("store.collection", env::var("GREMLIN_COLLECTION").ok())?
            .set_override_option("store.primary_key", env::var("GREMLIN_PRIMARY_KEY").ok())?
            .set_override_option("server.port", env::var("PORT").ok().and_then(|v| v.parse::<i64>().ok()))?

            .build()?;

        s.try_deserialize()
    }
}
