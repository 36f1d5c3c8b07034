//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ASKDATA_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use askdata::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod agent;
mod ai;
mod error;
mod index;
mod server;
mod warehouse;

pub use agent::AgentConfig;
pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use index::IndexConfig;
pub use server::{Environment, ServerConfig};
pub use warehouse::WarehouseConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Loaded once at process start and passed by reference into the
/// constructors that need it; nothing reads the environment after load.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Warehouse configuration (Redshift connection)
    pub warehouse: WarehouseConfig,

    /// AI provider configuration (OpenAI completion + embeddings)
    #[serde(default)]
    pub ai: AiConfig,

    /// Semantic index configuration (Pinecone)
    #[serde(default)]
    pub index: IndexConfig,

    /// Agent loop configuration (step budget)
    #[serde(default)]
    pub agent: AgentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ASKDATA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ASKDATA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ASKDATA__WAREHOUSE__URL=...` -> `warehouse.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ASKDATA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.warehouse.validate()?;
        self.ai.validate()?;
        self.index.validate()?;
        self.agent.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
