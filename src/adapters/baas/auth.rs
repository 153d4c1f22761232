//! GoTrue-dialect auth service.
//!
//! Signs users in and out against `/auth/v1`, keeps the resulting access
//! token on the shared [`BaasClient`] and republishes what happened as
//! [`AuthEvent`]s.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;

use super::client::{BaasClient, StoredSession};
use crate::domain::foundation::{
    AuthError, Credentials, Identity, SignInPolicy, SignUpProfile, Timestamp, UserId,
};
use crate::domain::session::AuthEvent;
use crate::ports::AuthService;

/// User object returned by the auth endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_confirmed_at: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

impl AuthUser {
    pub(crate) fn into_identity(self) -> Result<Identity, AuthError> {
        let id = UserId::new(self.id)?;
        let display_name = self
            .user_metadata
            .full_name
            .filter(|name| !name.trim().is_empty());
        Ok(Identity::new(
            id,
            self.email.unwrap_or_default(),
            display_name,
            self.email_confirmed_at.is_some(),
        ))
    }
}

/// Token grant returned by `/token?grant_type=password`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenGrant {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: AuthUser,
}

/// Sign-up responses carry either a bare user or a grant, depending on
/// whether email confirmation is enabled on the project.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Grant(TokenGrant),
    User(AuthUser),
}

/// Auth service backed by the hosted GoTrue endpoints.
pub struct BaasAuthService {
    client: Arc<BaasClient>,
    events: broadcast::Sender<AuthEvent>,
}

impl BaasAuthService {
    pub fn new(client: Arc<BaasClient>, event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self { client, events }
    }

    fn publish(&self, event: AuthEvent) {
        tracing::debug!(event = event.kind(), "publishing auth event");
        // Nobody may be subscribed yet.
        let _ = self.events.send(event);
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, AuthError> {
        let url = self.client.endpoint().auth_url(path);
        let request = self.client.authorize(self.client.http().post(&url).json(&body)).await;

        let response = request.send().await.map_err(|e| {
            tracing::error!(path, error = %e, "auth request failed");
            AuthError::service_unavailable(format!("Auth request failed: {}", e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let error = classify_auth_failure(status, &text);
        tracing::warn!(path, status = %status, error = %error, "auth request rejected");
        Err(error)
    }

    async fn remember(&self, session: StoredSession) -> Identity {
        let identity = session.identity.clone();
        self.client.store_session(session).await;
        identity
    }

    /// Logs out a token that was never stored.
    async fn revoke(&self, session: &StoredSession) {
        let url = self.client.endpoint().auth_url("logout");
        let request = self
            .client
            .authorize_with(self.client.http().post(&url), &session.access_token);
        if let Err(e) = request.send().await {
            tracing::warn!(user_id = %session.identity.id, error = %e, "failed to revoke rejected session");
        }
    }

    /// Drops a session the server no longer honours. The caller reports the
    /// expiry, so nothing is published here.
    async fn expire(&self) {
        if let Some(session) = self.client.clear_session().await {
            tracing::info!(user_id = %session.identity.id, "session cleared");
        }
    }
}

impl TokenGrant {
    fn into_session(self) -> Result<StoredSession, AuthError> {
        Ok(StoredSession {
            identity: self.user.into_identity()?,
            expires_at: self.expires_in.map(|secs| Timestamp::now().plus_secs(secs)),
            access_token: SecretString::new(self.access_token),
        })
    }
}

#[async_trait]
impl AuthService for BaasAuthService {
    async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
        let Some(session) = self.client.session().await else {
            return Ok(None);
        };

        if session.is_expired(Timestamp::now()) {
            tracing::info!(user_id = %session.identity.id, "access token expired");
            self.expire().await;
            return Ok(None);
        }

        let url = self.client.endpoint().auth_url("user");
        let request = self.client.authorize(self.client.http().get(&url)).await;
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "session lookup failed");
            AuthError::service_unavailable(format!("Session lookup failed: {}", e))
        })?;

        match response.status() {
            status if status.is_success() => {
                let user: AuthUser = response.json().await.map_err(|e| {
                    AuthError::service_unavailable(format!("Failed to parse user: {}", e))
                })?;
                Ok(Some(user.into_identity()?))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.expire().await;
                Ok(None)
            }
            status => Err(AuthError::service_unavailable(format!(
                "Session lookup returned {}",
                status
            ))),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        profile: &SignUpProfile,
    ) -> Result<Identity, AuthError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
            "data": {
                "full_name": profile.full_name,
                "phone": profile.phone,
                "city": profile.city,
            }
        });

        let response: SignUpResponse = self
            .post_json("signup", body)
            .await?
            .json()
            .await
            .map_err(|e| AuthError::service_unavailable(format!("Failed to parse sign-up: {}", e)))?;

        match response {
            SignUpResponse::Grant(grant) => {
                let identity = self.remember(grant.into_session()?).await;
                self.publish(AuthEvent::SignedIn(identity.clone()));
                Ok(identity)
            }
            SignUpResponse::User(user) => user.into_identity(),
        }
    }

    async fn sign_in(
        &self,
        credentials: &Credentials,
        policy: SignInPolicy,
    ) -> Result<Identity, AuthError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });

        let grant: TokenGrant = self
            .post_json("token?grant_type=password", body)
            .await?
            .json()
            .await
            .map_err(|e| AuthError::service_unavailable(format!("Failed to parse token: {}", e)))?;

        let session = grant.into_session()?;
        if let Err(e) = policy.admit(&session.identity) {
            tracing::info!(user_id = %session.identity.id, error = %e, "sign-in rejected by policy");
            self.revoke(&session).await;
            return Err(e);
        }

        let identity = self.remember(session).await;
        tracing::info!(user_id = %identity.id, "signed in");
        self.publish(AuthEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.client.session().await.is_some() {
            let url = self.client.endpoint().auth_url("logout");
            let request = self.client.authorize(self.client.http().post(&url)).await;

            // The local session ends regardless of what the server says.
            if let Err(e) = request.send().await {
                tracing::warn!(error = %e, "remote sign-out failed");
            }
        }

        self.client.clear_session().await;
        self.publish(AuthEvent::SignedOut);
        Ok(())
    }
}

/// Maps a rejected auth response to a domain error.
///
/// GoTrue reports failures as `{"error", "error_description"}` or
/// `{"code", "msg", "error_code"}` depending on the endpoint and version.
pub(crate) fn classify_auth_failure(status: StatusCode, body: &str) -> AuthError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return AuthError::service_unavailable(format!("Auth service returned {}", status));
    }

    let text = body.to_lowercase();
    if text.contains("email_not_confirmed") || text.contains("email not confirmed") {
        AuthError::EmailNotVerified
    } else if text.contains("user_already_exists") || text.contains("already registered") {
        AuthError::UserAlreadyExists
    } else if status == StatusCode::UNAUTHORIZED && text.contains("expired") {
        AuthError::SessionExpired
    } else {
        AuthError::InvalidCredentials
    }
}
