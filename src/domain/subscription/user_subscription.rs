//! A user's subscription row, joined to a summary of its plan.

use serde::{Deserialize, Serialize};

use super::{PlanTier, SubscriptionStatus};
use crate::domain::foundation::{PlanId, SubscriptionId, Timestamp, UserId};

/// Plan columns joined onto a subscription row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub name: String,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub video_quality: Option<String>,

    #[serde(default)]
    pub device_limit: Option<u32>,

    #[serde(default)]
    pub simultaneous_streams: Option<u32>,

    #[serde(default, deserialize_with = "super::plan::features_list")]
    pub features: Vec<String>,
}

/// One row of `user_subscriptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: SubscriptionId,

    pub user_id: UserId,

    pub plan_id: PlanId,

    pub status: SubscriptionStatus,

    #[serde(default)]
    pub current_period_start: Option<Timestamp>,

    #[serde(default)]
    pub current_period_end: Option<Timestamp>,

    pub created_at: Timestamp,

    /// Joined plan. The relational backend names the relation after the table.
    #[serde(default, alias = "subscription_plans")]
    pub plan: Option<PlanSummary>,
}

impl UserSubscription {
    /// Returns true if the row's status grants its plan.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the joined plan name, if the join produced one.
    pub fn plan_name(&self) -> Option<&str> {
        self.plan.as_ref().map(|plan| plan.name.as_str())
    }

    /// Returns the tier of this subscription.
    ///
    /// A row without a joined plan is treated as Basic.
    pub fn tier(&self) -> PlanTier {
        self.plan_name()
            .map(PlanTier::from_plan_name)
            .unwrap_or(PlanTier::Basic)
    }
}

/// Picks the one active subscription that decides a user's tier.
///
/// At most one active row should exist per user. When the store returns
/// several, the most recently created wins; equal creation times fall back
/// to the greatest subscription id so the choice never depends on row order.
pub fn authoritative_subscription(rows: &[UserSubscription]) -> Option<&UserSubscription> {
    rows.iter()
        .filter(|row| row.is_active())
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })
}
