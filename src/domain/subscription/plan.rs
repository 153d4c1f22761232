//! Subscription plan records.

use serde::{Deserialize, Deserializer, Serialize};

use super::{PlanTier, TierLevel};
use crate::domain::foundation::PlanId;

/// How often a plan is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    #[serde(alias = "yearly")]
    Annual,
    #[serde(other)]
    Other,
}

/// A plan offered to users. Created by an administrative process; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,

    pub name: String,

    pub price: f64,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_billing_cycle")]
    pub billing_cycle: BillingCycle,

    #[serde(default)]
    pub video_quality: Option<String>,

    #[serde(default = "default_limit")]
    pub device_limit: u32,

    #[serde(default = "default_limit")]
    pub simultaneous_streams: u32,

    /// Stored either as a list or as a single string by different backends.
    #[serde(default, deserialize_with = "features_list")]
    pub features: Vec<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl SubscriptionPlan {
    /// Returns the tier derived from the plan name.
    pub fn tier(&self) -> PlanTier {
        PlanTier::from_plan_name(&self.name)
    }

    /// Returns the access level derived from the plan name.
    pub fn level(&self) -> TierLevel {
        self.tier().level()
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_billing_cycle() -> BillingCycle {
    BillingCycle::Monthly
}

fn default_limit() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeaturesRepr {
    List(Vec<String>),
    Single(String),
    Missing(()),
}

pub(super) fn features_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FeaturesRepr::deserialize(deserializer)? {
        FeaturesRepr::List(list) => list,
        FeaturesRepr::Single(feature) => vec![feature],
        FeaturesRepr::Missing(_) => Vec::new(),
    })
}
