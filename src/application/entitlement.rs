//! EntitlementResolver - decides whether a user may play a piece of content.
//!
//! Every decision fails closed: when the subscription store cannot be read
//! the user is treated as having no subscription, which still grants
//! free-level content.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::catalog::ContentItem;
use crate::domain::foundation::Identity;
use crate::domain::subscription::{authoritative_subscription, PlanTier, TierLevel};
use crate::ports::SubscriptionReader;

/// Outcome of an access check, for routing the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Entitlement {
    Granted,
    /// The user must upgrade before playing.
    UpgradeRequired {
        current: TierLevel,
        required: TierLevel,
    },
}

impl Entitlement {
    pub fn is_granted(&self) -> bool {
        matches!(self, Entitlement::Granted)
    }
}

/// Resolves a user's effective tier and checks it against content.
///
/// Stateless apart from the reader; concurrent calls are independent.
pub struct EntitlementResolver {
    reader: Arc<dyn SubscriptionReader>,
}

impl EntitlementResolver {
    pub fn new(reader: Arc<dyn SubscriptionReader>) -> Self {
        Self { reader }
    }

    /// Returns true if the identity may access content at `required`.
    ///
    /// Anonymous callers only get free content. Store failures count as
    /// "no active subscription".
    pub async fn can_access(&self, identity: Option<&Identity>, required: TierLevel) -> bool {
        if identity.is_none() {
            return required.is_free();
        }
        self.effective_level(identity).await.satisfies(required)
    }

    /// Returns the tier level the identity is entitled to.
    pub async fn effective_level(&self, identity: Option<&Identity>) -> TierLevel {
        let Some(identity) = identity else {
            return TierLevel::FREE;
        };

        let rows = match self.reader.active_subscriptions(&identity.id).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(
                    user_id = %identity.id,
                    error = %e,
                    "subscription lookup failed, treating as free tier"
                );
                return TierLevel::FREE;
            }
        };

        let active_count = rows.iter().filter(|row| row.is_active()).count();
        if active_count > 1 {
            tracing::warn!(
                user_id = %identity.id,
                active_count,
                "multiple active subscriptions, using the most recent"
            );
        }

        let Some(subscription) = authoritative_subscription(&rows) else {
            tracing::debug!(user_id = %identity.id, "no active subscription");
            return TierLevel::FREE;
        };

        let tier = subscription.tier();
        if tier == PlanTier::Unrecognized {
            tracing::warn!(
                user_id = %identity.id,
                subscription_id = %subscription.id,
                plan_name = subscription.plan_name().unwrap_or_default(),
                "unrecognized plan name, treating as free tier"
            );
        }

        let level = tier.level();
        tracing::debug!(user_id = %identity.id, tier = ?tier, level = %level, "resolved tier");
        level
    }

    /// Checks a content item and reports what the user would need.
    pub async fn check(&self, identity: Option<&Identity>, item: &ContentItem) -> Entitlement {
        let current = self.effective_level(identity).await;
        if current.satisfies(item.required_level) {
            Entitlement::Granted
        } else {
            Entitlement::UpgradeRequired {
                current,
                required: item.required_level,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySubscriptionStore;
    use crate::domain::foundation::{
        MovieId, PlanId, StoreError, SubscriptionId, Timestamp, UserId,
    };
    use crate::domain::subscription::{PlanSummary, SubscriptionStatus, UserSubscription};

    fn identity(id: &str) -> Identity {
        Identity::new(UserId::new(id).unwrap(), format!("{}@example.com", id), None, true)
    }

    fn level(n: u8) -> TierLevel {
        TierLevel::new(n).unwrap()
    }

    fn row(id: &str, user: &str, plan: Option<&str>, created_at: &str) -> UserSubscription {
        UserSubscription {
            id: SubscriptionId::new(id).unwrap(),
            user_id: UserId::new(user).unwrap(),
            plan_id: PlanId::new("p").unwrap(),
            status: SubscriptionStatus::Active,
            current_period_start: None,
            current_period_end: None,
            created_at: Timestamp::parse_rfc3339(created_at).unwrap(),
            plan: plan.map(|name| PlanSummary {
                name: name.to_string(),
                price: None,
                video_quality: None,
                device_limit: None,
                simultaneous_streams: None,
                features: Vec::new(),
            }),
        }
    }

    fn resolver(store: InMemorySubscriptionStore) -> EntitlementResolver {
        EntitlementResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn anonymous_gets_free_content_only() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let resolver = EntitlementResolver::new(store.clone());

        assert!(resolver.can_access(None, TierLevel::FREE).await);
        assert!(!resolver.can_access(None, level(2)).await);
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn standard_plan_reaches_level_two_only() {
        let resolver = resolver(
            InMemorySubscriptionStore::new()
                .with_subscription(row("s1", "u1", Some("Standard"), "2024-01-01T00:00:00Z")),
        );
        let user = identity("u1");

        assert!(resolver.can_access(Some(&user), level(2)).await);
        assert!(!resolver.can_access(Some(&user), level(3)).await);
    }

    #[tokio::test]
    async fn plan_names_match_case_insensitively() {
        let resolver = resolver(
            InMemorySubscriptionStore::new()
                .with_subscription(row("s1", "u1", Some("  PREMIUM "), "2024-01-01T00:00:00Z")),
        );
        assert_eq!(resolver.effective_level(Some(&identity("u1"))).await, level(3));
    }

    #[tokio::test]
    async fn unrecognized_plan_is_free() {
        let resolver = resolver(
            InMemorySubscriptionStore::new()
                .with_subscription(row("s1", "u1", Some("Platinum"), "2024-01-01T00:00:00Z")),
        );
        let user = identity("u1");

        assert_eq!(resolver.effective_level(Some(&user)).await, TierLevel::FREE);
        assert!(!resolver.can_access(Some(&user), level(2)).await);
    }

    #[tokio::test]
    async fn missing_plan_join_counts_as_basic() {
        let resolver = resolver(
            InMemorySubscriptionStore::new()
                .with_subscription(row("s1", "u1", None, "2024-01-01T00:00:00Z")),
        );
        assert_eq!(resolver.effective_level(Some(&identity("u1"))).await, level(1));
    }

    #[tokio::test]
    async fn most_recent_active_row_wins() {
        let resolver = resolver(
            InMemorySubscriptionStore::new()
                .with_subscription(row("s-old", "u1", Some("Premium"), "2024-01-01T00:00:00Z"))
                .with_subscription(row("s-new", "u1", Some("Basic"), "2024-03-01T00:00:00Z")),
        );
        assert_eq!(resolver.effective_level(Some(&identity("u1"))).await, level(1));
    }

    #[tokio::test]
    async fn store_failure_fails_closed() {
        let resolver = resolver(
            InMemorySubscriptionStore::new()
                .with_subscription(row("s1", "u1", Some("Premium"), "2024-01-01T00:00:00Z"))
                .with_error(StoreError::unavailable("timeout")),
        );
        let user = identity("u1");

        assert!(!resolver.can_access(Some(&user), level(3)).await);
        assert!(resolver.can_access(Some(&user), TierLevel::FREE).await);
    }

    #[tokio::test]
    async fn check_reports_upgrade_path() {
        let resolver = resolver(
            InMemorySubscriptionStore::new()
                .with_subscription(row("s1", "u1", Some("Basic"), "2024-01-01T00:00:00Z")),
        );
        let item = ContentItem::new(MovieId::new("m1").unwrap(), "Dune", level(3));

        assert_eq!(
            resolver.check(Some(&identity("u1")), &item).await,
            Entitlement::UpgradeRequired {
                current: level(1),
                required: level(3)
            }
        );

        let free = ContentItem::new(MovieId::new("m2").unwrap(), "Short", TierLevel::FREE);
        assert!(resolver.check(None, &free).await.is_granted());
    }
}
