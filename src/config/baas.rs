//! Hosted backend configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::environment::Environment;
use super::error::ValidationError;

/// Hosted backend (REST tables and auth) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BaasConfig {
    /// Project base URL, e.g. `https://abc.example.co`
    pub url: String,

    /// Public anonymous API key
    pub anon_key: SecretString,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl BaasConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate backend configuration
    ///
    /// In production, requires HTTPS for the project URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("BAAS__URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidBaasUrl);
        }
        if environment.is_production() && !self.url.starts_with("https://") {
            return Err(ValidationError::BaasUrlMustBeHttps);
        }
        if self.anon_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("BAAS__ANON_KEY"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> BaasConfig {
        BaasConfig {
            url: url.to_string(),
            anon_key: SecretString::new("anon-key".to_string()),
            request_timeout_secs: default_request_timeout(),
        }
    }

    #[test]
    fn test_request_timeout_duration() {
        assert_eq!(config("https://x.example.co").request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validation_missing_url() {
        assert_eq!(
            config("").validate(&Environment::Development),
            Err(ValidationError::MissingRequired("BAAS__URL"))
        );
    }

    #[test]
    fn test_validation_rejects_non_http_scheme() {
        assert_eq!(
            config("ftp://x.example.co").validate(&Environment::Development),
            Err(ValidationError::InvalidBaasUrl)
        );
    }

    #[test]
    fn test_validation_production_requires_https() {
        let config = config("http://localhost:54321");
        // Allowed in development
        assert!(config.validate(&Environment::Development).is_ok());
        // Rejected in production
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::BaasUrlMustBeHttps)
        );
    }

    #[test]
    fn test_validation_empty_key() {
        let config = BaasConfig {
            anon_key: SecretString::new("  ".to_string()),
            ..config("https://x.example.co")
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let config = BaasConfig {
            request_timeout_secs: 0,
            ..config("https://x.example.co")
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidTimeout)
        );
    }
}
