//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid warehouse URL format")]
    InvalidWarehouseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid completion temperature (must be within 0.0..=2.0)")]
    InvalidTemperature,

    #[error("Index host must be an HTTPS URL")]
    IndexHostMustBeHttps,

    #[error("Invalid retrieval depth (top_k must be within 1..=50)")]
    InvalidTopK,

    #[error("Invalid agent step budget (must be within 1..=100)")]
    InvalidStepBudget,
}
