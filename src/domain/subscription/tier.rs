//! Plan tiers and tier levels.
//!
//! `PlanTier` is the one place that maps a plan name to an access level.
//! Both the entitlement resolver and the plan badge read from it, so the
//! mapping stays total (every name resolves) and monotonic (a higher plan
//! never maps below a lower one).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Integer ranking of subscription plans used for access comparison.
///
/// Always at least 1; level 1 is the universal free tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TierLevel(u8);

impl TierLevel {
    /// The free tier every visitor has, signed in or not.
    pub const FREE: TierLevel = TierLevel(1);

    /// Creates a tier level, rejecting 0.
    pub fn new(level: u8) -> Result<Self, ValidationError> {
        if level == 0 {
            return Err(ValidationError::out_of_range(
                "tier_level",
                1,
                u8::MAX as i64,
                0,
            ));
        }
        Ok(Self(level))
    }

    /// Returns the numeric level.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true if this is the free tier.
    pub fn is_free(&self) -> bool {
        *self == Self::FREE
    }

    /// Returns true if a holder of this level may access content that
    /// requires `required`.
    pub fn satisfies(&self, required: TierLevel) -> bool {
        *self >= required
    }
}

impl Default for TierLevel {
    fn default() -> Self {
        Self::FREE
    }
}

impl TryFrom<u8> for TierLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TierLevel> for u8 {
    fn from(level: TierLevel) -> Self {
        level.0
    }
}

impl fmt::Display for TierLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Known subscription plans, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    FreeTrial,
    Basic,
    Standard,
    Premium,
    Annual,
    /// A plan name the table does not know. Resolves to the free level.
    Unrecognized,
}

impl PlanTier {
    /// Recognized tiers in ascending order.
    pub const RANKED: [PlanTier; 5] = [
        PlanTier::FreeTrial,
        PlanTier::Basic,
        PlanTier::Standard,
        PlanTier::Premium,
        PlanTier::Annual,
    ];

    /// Maps a plan name to its tier.
    ///
    /// Matching ignores case and surrounding whitespace. Never fails:
    /// unknown names become `Unrecognized`.
    pub fn from_plan_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "free trial" => PlanTier::FreeTrial,
            "basic" => PlanTier::Basic,
            "standard" => PlanTier::Standard,
            "premium" => PlanTier::Premium,
            "annual" => PlanTier::Annual,
            _ => PlanTier::Unrecognized,
        }
    }

    /// Returns the access level granted by this tier.
    pub fn level(&self) -> TierLevel {
        match self {
            PlanTier::FreeTrial | PlanTier::Basic | PlanTier::Unrecognized => TierLevel::FREE,
            PlanTier::Standard => TierLevel(2),
            PlanTier::Premium | PlanTier::Annual => TierLevel(3),
        }
    }

    /// Returns false for names that fell through to the fallback.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, PlanTier::Unrecognized)
    }

    /// Returns true for the trial plan, which is never offered as an upgrade.
    pub fn is_trial(&self) -> bool {
        matches!(self, PlanTier::FreeTrial)
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanTier::FreeTrial => "Free Trial",
            PlanTier::Basic => "Basic",
            PlanTier::Standard => "Standard",
            PlanTier::Premium => "Premium",
            PlanTier::Annual => "Annual",
            PlanTier::Unrecognized => "Other",
        }
    }

    /// Returns the badge shown next to the plan.
    pub fn badge(&self) -> PlanBadge {
        match self {
            PlanTier::FreeTrial => PlanBadge::Gift,
            PlanTier::Basic => PlanBadge::Zap,
            PlanTier::Standard => PlanBadge::Star,
            PlanTier::Premium | PlanTier::Annual => PlanBadge::Crown,
            PlanTier::Unrecognized => PlanBadge::Check,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Icon family used by plan pickers and upgrade prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanBadge {
    Gift,
    Zap,
    Star,
    Crown,
    Check,
}
