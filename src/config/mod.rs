//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CINEPASS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use cinepass::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.baas.url);
//! ```

mod auth;
mod baas;
mod environment;
mod error;
mod session;
mod telemetry;

pub use auth::AuthConfig;
pub use baas::BaasConfig;
pub use environment::Environment;
pub use error::{ConfigError, ValidationError};
pub use session::SessionConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,

    /// Hosted backend connection
    pub baas: BaasConfig,

    /// Initial identity resolution
    #[serde(default)]
    pub session: SessionConfig,

    /// Account policy
    #[serde(default)]
    pub auth: AuthConfig,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CINEPASS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CINEPASS__BAAS__URL=https://...` -> `baas.url = ...`
    /// - `CINEPASS__SESSION__RESOLVE_TIMEOUT_MS=3000` -> `session.resolve_timeout_ms = 3000`
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
                    .prefix("CINEPASS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - URL formats (HTTPS in production)
    /// - Non-empty API key
    /// - Timeout and buffer ranges
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.baas.validate(&self.environment)?;
        self.session.validate()?;
        self.auth.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("CINEPASS__BAAS__URL", "https://demo.example.co");
        env::set_var("CINEPASS__BAAS__ANON_KEY", "anon-key");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("CINEPASS__BAAS__URL");
        env::remove_var("CINEPASS__BAAS__ANON_KEY");
        env::remove_var("CINEPASS__ENVIRONMENT");
        env::remove_var("CINEPASS__SESSION__RESOLVE_TIMEOUT_MS");
        env::remove_var("CINEPASS__AUTH__REQUIRE_VERIFIED_EMAIL");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.baas.url, "https://demo.example.co");
        assert_eq!(config.baas.anon_key.expose_secret(), "anon-key");
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CINEPASS__SESSION__RESOLVE_TIMEOUT_MS", "1500");
        env::set_var("CINEPASS__AUTH__REQUIRE_VERIFIED_EMAIL", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.session.resolve_timeout_ms, 1500);
        assert!(!config.auth.require_verified_email);
    }

    #[test]
    fn test_production_rejects_plain_http() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CINEPASS__BAAS__URL", "http://demo.example.co");
        env::set_var("CINEPASS__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(config.validate(), Err(ValidationError::BaasUrlMustBeHttps));
    }

    #[test]
    fn test_missing_backend_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
