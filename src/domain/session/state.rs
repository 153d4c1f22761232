//! Identity resolution state.
//!
//! ```text
//! Pending ──► SignedIn(identity) ◄──► SignedOut
//!    └──────────────────────────────────▲
//! ```
//!
//! `Pending` is left exactly once, when the initial lookup finishes or times
//! out. Afterwards only auth events move between the two resolved states.

use serde::Serialize;

use crate::domain::foundation::Identity;

/// What the session provider currently knows about the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "identity", rename_all = "snake_case")]
pub enum IdentityStatus {
    /// The initial lookup has not finished yet.
    Pending,
    SignedIn(Identity),
    SignedOut,
}

impl IdentityStatus {
    /// Returns true once the initial lookup has finished.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, IdentityStatus::Pending)
    }

    /// Returns the signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            IdentityStatus::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, IdentityStatus::SignedIn(_))
    }
}

impl From<Option<Identity>> for IdentityStatus {
    fn from(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => IdentityStatus::SignedIn(identity),
            None => IdentityStatus::SignedOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn identity() -> Identity {
        Identity::new(UserId::new("u1").unwrap(), "u1@example.com", None, true)
    }

    #[test]
    fn pending_is_not_resolved() {
        assert!(!IdentityStatus::Pending.is_resolved());
        assert!(IdentityStatus::SignedOut.is_resolved());
        assert!(IdentityStatus::SignedIn(identity()).is_resolved());
    }

    #[test]
    fn identity_only_when_signed_in() {
        assert!(IdentityStatus::SignedOut.identity().is_none());
        assert_eq!(
            IdentityStatus::SignedIn(identity()).identity().map(|i| i.id.as_str()),
            Some("u1")
        );
    }

    #[test]
    fn option_converts_to_resolved_state() {
        assert_eq!(IdentityStatus::from(None), IdentityStatus::SignedOut);
        assert!(IdentityStatus::from(Some(identity())).is_signed_in());
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_string(&IdentityStatus::SignedOut).unwrap();
        assert_eq!(json, r#"{"state":"signed_out"}"#);
    }
}
