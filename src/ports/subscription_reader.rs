//! Subscription reader port (read-only queries).
//!
//! Plans and subscriptions are written by an administrative process outside
//! this crate; here they are only read.

use async_trait::async_trait;

use crate::domain::foundation::{PlanId, StoreError, UserId};
use crate::domain::subscription::{SubscriptionPlan, UserSubscription};

/// Reader port for plans and user subscriptions.
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    /// Rows of `user_subscriptions` for the user with status `active`,
    /// each joined to its plan.
    ///
    /// Normally zero or one row. Callers must cope with more.
    async fn active_subscriptions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserSubscription>, StoreError>;

    /// Plans with `is_active = true`, cheapest first.
    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>, StoreError>;

    /// A single plan by id. Returns `None` if it does not exist.
    async fn get_plan(&self, plan_id: &PlanId) -> Result<Option<SubscriptionPlan>, StoreError>;
}
