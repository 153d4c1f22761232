//! Account policy configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Sign-up and sign-in policy
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// Reject sign-in until the email address is verified
    #[serde(default = "default_require_verified_email")]
    pub require_verified_email: bool,

    /// Minimum password length accepted at sign-up and sign-in
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

impl AuthConfig {
    /// Validate account policy
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_password_len == 0 || self.min_password_len > 128 {
            return Err(ValidationError::InvalidPasswordLength);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_verified_email: default_require_verified_email(),
            min_password_len: default_min_password_len(),
        }
    }
}

fn default_require_verified_email() -> bool {
    true
}

fn default_min_password_len() -> usize {
    6
}
