use anyhow::{Context, Result};
use std::env;

/// Database targeted on every replica.
pub const DB_NAME: &str = "test_database";

/// Collection receiving one document per routed request.
pub const COLLECTION_NAME: &str = "requests";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl StoreBackend {
    fn from_env(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "mem" => Ok(Self::Memory),
            _ => Err(anyhow::anyhow!("STORE_BACKEND must be one of: mongo, memory")),
        }
    }
}

/// Application configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Proxy-fronted endpoint; only the health probe goes through it.
    pub proxy_uri: String,
    pub store_backend: StoreBackend,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let proxy_uri =
            env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://nginx:27017/".to_string());

        let store_backend =
            StoreBackend::from_env(&env::var("STORE_BACKEND").unwrap_or_else(|_| "mongo".to_string()))?;

        Ok(Self {
            host,
            port,
            proxy_uri,
            store_backend,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
