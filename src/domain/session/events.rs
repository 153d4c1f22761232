//! Auth events and the identity changes derived from them.

use serde::Serialize;

use super::IdentityStatus;
use crate::domain::foundation::Identity;

/// Something that happened at the external auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Identity),
    SignedOut,
    /// The service ended the session on its own (token lifetime, revocation).
    SessionExpired,
    /// The service could not be reached while refreshing the session.
    RefreshFailed { reason: String },
}

impl AuthEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn(_) => "signed_in",
            AuthEvent::SignedOut => "signed_out",
            AuthEvent::SessionExpired => "session_expired",
            AuthEvent::RefreshFailed { .. } => "refresh_failed",
        }
    }
}

/// Why listeners are being notified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeCause {
    /// The initial lookup reached a terminal state.
    InitialResolution,
    SignedIn,
    SignedOut,
    SessionExpired,
    /// The auth service failed; the identity was left as it was.
    ServiceFailure { reason: String },
}

/// Notification delivered to identity listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityChange {
    /// State after the event was applied.
    pub status: IdentityStatus,
    pub cause: ChangeCause,
}

impl IdentityChange {
    pub fn new(status: IdentityStatus, cause: ChangeCause) -> Self {
        Self { status, cause }
    }

    /// True when the notification reports a failure and the identity is unchanged.
    pub fn is_noop(&self) -> bool {
        matches!(self.cause, ChangeCause::ServiceFailure { .. })
    }

    /// The identity after the change.
    pub fn identity(&self) -> Option<&Identity> {
        self.status.identity()
    }
}
