//! PlanCatalog - plans on offer, decorated with their tier.

use std::sync::Arc;

use serde::Serialize;

use super::EntitlementResolver;
use crate::domain::foundation::Identity;
use crate::domain::subscription::{PlanBadge, PlanTier, SubscriptionPlan, TierLevel};
use crate::ports::SubscriptionReader;

/// A plan together with the tier it grants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOffer {
    pub plan: SubscriptionPlan,
    pub tier: PlanTier,
    pub level: TierLevel,
    pub badge: PlanBadge,
}

impl From<SubscriptionPlan> for PlanOffer {
    fn from(plan: SubscriptionPlan) -> Self {
        let tier = plan.tier();
        Self {
            tier,
            level: tier.level(),
            badge: tier.badge(),
            plan,
        }
    }
}

pub struct PlanCatalog {
    reader: Arc<dyn SubscriptionReader>,
    resolver: Arc<EntitlementResolver>,
}

impl PlanCatalog {
    pub fn new(reader: Arc<dyn SubscriptionReader>, resolver: Arc<EntitlementResolver>) -> Self {
        Self { reader, resolver }
    }

    /// Active plans, cheapest first. Empty when the store is unreachable.
    pub async fn active_plans(&self) -> Vec<PlanOffer> {
        let mut plans = match self.reader.list_active_plans().await {
            Ok(plans) => plans,
            Err(e) => {
                tracing::error!(error = %e, "failed to load subscription plans");
                return Vec::new();
            }
        };

        plans.retain(|plan| plan.is_active);
        plans.sort_by(|a, b| a.price.total_cmp(&b.price));

        for plan in plans.iter().filter(|plan| !plan.tier().is_recognized()) {
            tracing::warn!(plan_id = %plan.id, plan_name = %plan.name, "plan name has no tier");
        }

        plans.into_iter().map(PlanOffer::from).collect()
    }

    /// Plans that would raise the identity's tier. Free trials are never
    /// offered as upgrades.
    pub async fn upgrade_options(&self, identity: Option<&Identity>) -> Vec<PlanOffer> {
        let current = self.resolver.effective_level(identity).await;
        self.active_plans()
            .await
            .into_iter()
            .filter(|offer| !offer.tier.is_trial() && offer.level > current)
            .collect()
    }
}
