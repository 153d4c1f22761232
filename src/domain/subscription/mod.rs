//! Subscription module - plans, tiers and user subscription rows.
//!
//! The tier table in `tier` is shared by access decisions and display.

mod plan;
mod status;
mod tier;
mod user_subscription;

pub use plan::{BillingCycle, SubscriptionPlan};
pub use status::SubscriptionStatus;
pub use tier::{PlanBadge, PlanTier, TierLevel};
pub use user_subscription::{authoritative_subscription, PlanSummary, UserSubscription};
