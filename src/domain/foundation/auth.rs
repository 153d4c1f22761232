//! Authentication types for the domain layer.
//!
//! These types describe the signed-in user as reported by the external auth
//! service. They have **no provider dependencies**: either BaaS backend can
//! populate them through the `AuthService` port.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{UserId, ValidationError};

/// The authenticated user, as cached by the session provider.
///
/// Owned by the external auth service; this crate only ever holds a
/// read-only copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The unique user identifier from the auth service.
    pub id: UserId,

    /// User's email address.
    pub email: String,

    /// Display name if the user set one at sign-up.
    pub display_name: Option<String>,

    /// Whether the auth service has verified the email address.
    pub email_verified: bool,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            email_verified,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Email and password pair used to sign in.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Validates and builds a credential pair.
    ///
    /// The email must contain an `@` and the password must be at least
    /// `min_password_len` characters.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        min_password_len: usize,
    ) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();
        let password = password.into();

        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        if password.chars().count() < min_password_len {
            return Err(ValidationError::invalid_format(
                "password",
                format!("must be at least {} characters", min_password_len),
            ));
        }

        Ok(Self { email, password })
    }
}

/// Which identities a sign-in may admit.
///
/// Auth adapters apply it before a session is stored or `SignedIn` is
/// published, so a rejected identity is never observed as signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInPolicy {
    pub require_verified_email: bool,
}

impl SignInPolicy {
    /// Admits every identity the auth service authenticates.
    pub const PERMISSIVE: SignInPolicy = SignInPolicy {
        require_verified_email: false,
    };

    /// Rejects identities with an unverified email.
    pub const VERIFIED_ONLY: SignInPolicy = SignInPolicy {
        require_verified_email: true,
    };

    /// Returns `EmailNotVerified` if the identity may not sign in.
    pub fn admit(&self, identity: &Identity) -> Result<(), AuthError> {
        if self.require_verified_email && !identity.email_verified {
            return Err(AuthError::EmailNotVerified);
        }
        Ok(())
    }
}

/// Profile data captured at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpProfile {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
}

impl SignUpProfile {
    /// Creates a profile with only the required full name.
    pub fn new(full_name: impl Into<String>) -> Result<Self, ValidationError> {
        let full_name = full_name.into().trim().to_string();
        if full_name.is_empty() {
            return Err(ValidationError::empty_field("full_name"));
        }
        Ok(Self {
            full_name,
            ..Default::default()
        })
    }

    /// Adds optional contact details.
    pub fn with_contact(mut self, phone: impl Into<String>, city: impl Into<String>) -> Self {
        self.phone = phone.into();
        self.city = city.into();
        self
    }
}

/// Authentication errors reported by the auth service or account commands.
///
/// These errors are **domain-centric**: they describe what went wrong from
/// the application's perspective, not the provider's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email/password did not match an account.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-in succeeded at the provider but the email is not yet verified.
    #[error("Email address has not been verified")]
    EmailNotVerified,

    /// Sign-up attempted with an email that already has an account.
    #[error("An account with this email already exists")]
    UserAlreadyExists,

    /// The session is no longer valid.
    #[error("Session expired")]
    SessionExpired,

    /// Input rejected before reaching the provider.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The auth service is unavailable (network, timeout, config).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
