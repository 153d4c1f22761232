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
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid backend URL format")]
    InvalidBaasUrl,

    #[error("Backend URL must use HTTPS in production")]
    BaasUrlMustBeHttps,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid session resolve timeout")]
    InvalidResolveTimeout,

    #[error("Auth event buffer must be at least 1")]
    InvalidEventBuffer,

    #[error("Minimum password length must be between 1 and 128")]
    InvalidPasswordLength,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
