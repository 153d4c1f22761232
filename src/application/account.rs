//! AccountService - sign-up, sign-in and sign-out commands.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, Credentials, Identity, SignInPolicy, SignUpProfile};
use crate::ports::AuthService;

/// Validates account input and applies the verification policy before
/// handing off to the auth service.
pub struct AccountService {
    auth: Arc<dyn AuthService>,
    policy: AuthConfig,
}

impl AccountService {
    pub fn new(auth: Arc<dyn AuthService>, policy: AuthConfig) -> Self {
        Self { auth, policy }
    }

    /// Creates an account. The new identity is usually unverified.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        phone: &str,
        city: &str,
    ) -> Result<Identity, AuthError> {
        let credentials = Credentials::new(email, password, self.policy.min_password_len)?;
        let profile = SignUpProfile::new(full_name)?.with_contact(phone, city);

        let identity = self.auth.sign_up(&credentials, &profile).await?;
        tracing::info!(user_id = %identity.id, verified = identity.email_verified, "account created");
        Ok(identity)
    }

    /// Signs in with email and password.
    ///
    /// When verified email is required, an unverified account gets
    /// `EmailNotVerified` and no session is ever published for it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let credentials = Credentials::new(email, password, self.policy.min_password_len)?;
        let policy = SignInPolicy {
            require_verified_email: self.policy.require_verified_email,
        };

        match self.auth.sign_in(&credentials, policy).await {
            Err(AuthError::EmailNotVerified) => {
                tracing::info!("sign-in rejected, email not verified");
                Err(AuthError::EmailNotVerified)
            }
            result => result,
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await
    }
}
