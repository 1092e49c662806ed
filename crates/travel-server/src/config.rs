//! Server configuration
//!
//! Defaults overlaid with `TRAVEL_*` environment variables.

use anyhow::{Context, Result};
use ::config::{Config, Environment};
use serde::Deserialize;

/// Which store backs the collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Base of the reference URLs returned on create, without trailing slash
    pub public_url: String,
    pub storage: StorageKind,
    pub database_path: String,
    pub log_json: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix("TRAVEL").try_parsing(true))
    }

    fn from_source(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("bind_address", "127.0.0.1:5000")?
            .set_default("public_url", "http://127.0.0.1:5000")?
            .set_default("storage", "sqlite")?
            .set_default("database_path", "data/travel_planner.db")?
            .set_default("log_json", false)?
            .add_source(env)
            .build()
            .context("Failed to read configuration")?;

        let mut config: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.public_url = config.public_url.trim_end_matches('/').to_string();

        Ok(config)
    }
}
