//! In-memory subscription store for tests and local demos.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This adapter is not
//! meant for production.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{PlanId, StoreError, UserId};
use crate::domain::subscription::{PlanSummary, SubscriptionPlan, UserSubscription};
use crate::ports::SubscriptionReader;

/// Subscription store backed by in-process vectors.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    plans: RwLock<Vec<SubscriptionPlan>>,
    subscriptions: RwLock<Vec<UserSubscription>>,
    /// Optional error to return for every query (for error testing)
    force_error: RwLock<Option<StoreError>>,
    query_count: AtomicUsize,
}

impl InMemorySubscriptionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plan.
    pub fn with_plan(self, plan: SubscriptionPlan) -> Self {
        self.plans.write().unwrap().push(plan);
        self
    }

    /// Adds a subscription row.
    pub fn with_subscription(self, subscription: UserSubscription) -> Self {
        self.add_subscription(subscription);
        self
    }

    /// Forces all queries to return the specified error.
    pub fn with_error(self, error: StoreError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Adds a subscription row at runtime.
    pub fn add_subscription(&self, subscription: UserSubscription) {
        self.subscriptions.write().unwrap().push(subscription);
    }

    /// Sets the forced error at runtime.
    pub fn set_error(&self, error: StoreError) {
        *self.force_error.write().unwrap() = Some(error);
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Returns how many queries have been served or failed.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    fn begin_query(&self) -> Result<(), StoreError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        match self.force_error.read().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn summary_for(&self, plan_id: &PlanId) -> Option<PlanSummary> {
        self.plans
            .read()
            .unwrap()
            .iter()
            .find(|plan| &plan.id == plan_id)
            .map(|plan| PlanSummary {
                name: plan.name.clone(),
                price: Some(plan.price),
                video_quality: plan.video_quality.clone(),
                device_limit: Some(plan.device_limit),
                simultaneous_streams: Some(plan.simultaneous_streams),
                features: plan.features.clone(),
            })
    }
}

#[async_trait]
impl SubscriptionReader for InMemorySubscriptionStore {
    async fn active_subscriptions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserSubscription>, StoreError> {
        self.begin_query()?;

        let rows: Vec<UserSubscription> = self
            .subscriptions
            .read()
            .unwrap()
            .iter()
            .filter(|row| &row.user_id == user_id && row.is_active())
            .cloned()
            .collect();

        Ok(rows
            .into_iter()
            .map(|mut row| {
                if row.plan.is_none() {
                    row.plan = self.summary_for(&row.plan_id);
                }
                row
            })
            .collect())
    }

    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>, StoreError> {
        self.begin_query()?;

        let mut plans: Vec<SubscriptionPlan> = self
            .plans
            .read()
            .unwrap()
            .iter()
            .filter(|plan| plan.is_active)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(plans)
    }

    async fn get_plan(&self, plan_id: &PlanId) -> Result<Option<SubscriptionPlan>, StoreError> {
        self.begin_query()?;

        Ok(self
            .plans
            .read()
            .unwrap()
            .iter()
            .find(|plan| &plan.id == plan_id)
            .cloned())
    }
}
