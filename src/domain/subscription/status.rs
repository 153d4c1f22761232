//! Subscription row status.

use serde::{Deserialize, Serialize};

/// Status column of a user subscription row.
///
/// Only `Active` entitles the user to anything beyond the free tier; every
/// other value, including ones this crate does not know, is treated the
/// same as having no subscription at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Pending,
    PastDue,
    Cancelled,
    Expired,
    #[serde(other)]
    Other,
}

impl SubscriptionStatus {
    /// Returns true if this status grants the plan's tier.
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_is_active() {
        assert!(SubscriptionStatus::Active.is_active());
        assert!(!SubscriptionStatus::PastDue.is_active());
        assert!(!SubscriptionStatus::Cancelled.is_active());
        assert!(!SubscriptionStatus::Other.is_active());
    }

    #[test]
    fn unknown_status_deserializes_as_other() {
        let status: SubscriptionStatus = serde_json::from_str("\"trialing\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Other);
    }

    #[test]
    fn status_uses_snake_case() {
        let status: SubscriptionStatus = serde_json::from_str("\"past_due\"").unwrap();
        assert_eq!(status, SubscriptionStatus::PastDue);
    }
}
