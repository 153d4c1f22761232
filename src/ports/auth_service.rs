//! Auth service port.
//!
//! The external auth service owns users and sessions. This port is the only
//! way the crate talks to it: one session lookup, a stream of auth events,
//! and the three account commands.
//!
//! # Example
//!
//! ```ignore
//! async fn who_is_there(auth: &dyn AuthService) -> Option<Identity> {
//!     auth.current_session().await.ok().flatten()
//! }
//! ```

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::{AuthError, Credentials, Identity, SignInPolicy, SignUpProfile};
use crate::domain::session::AuthEvent;

/// Port for the external authentication service.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from `current_session` when nobody is signed in
/// - Return `AuthError::ServiceUnavailable` for transport failures
/// - Publish `AuthEvent::SignedIn` after a successful `sign_in`, and
///   `AuthEvent::SignedOut` after `sign_out`, in the order they happen
/// - Apply the `SignInPolicy` before storing a session: a rejected identity
///   leaves no session behind and publishes nothing
/// - Not publish from `current_session`; callers report what a lookup finds
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Looks up the session the service currently holds.
    async fn current_session(&self) -> Result<Option<Identity>, AuthError>;

    /// Subscribes to auth events published after this call.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

    /// Creates an account. The new user may still need to verify their email.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        profile: &SignUpProfile,
    ) -> Result<Identity, AuthError>;

    /// Signs in with email and password, admitting only identities the
    /// policy accepts.
    async fn sign_in(
        &self,
        credentials: &Credentials,
        policy: SignInPolicy,
    ) -> Result<Identity, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
