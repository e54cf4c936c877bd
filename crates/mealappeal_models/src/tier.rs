//! Subscription tiers.
//!
//! The tier a user pays for decides which vision model analyses their meals and
//! how many tokens and how much image detail that analysis may use.

use mealappeal_error::{ModelsError, ModelsErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// MealAppeal subscription levels.
///
/// # Examples
///
/// ```
/// use mealappeal_models::SubscriptionTier;
///
/// let tier: SubscriptionTier = "premium_yearly".parse().unwrap();
/// assert_eq!(tier, SubscriptionTier::PremiumYearly);
/// assert_eq!(tier.override_key(), "OPENAI_MODEL_PREMIUM_YEARLY");
/// assert!("gold".parse::<SubscriptionTier>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    /// No subscription
    #[display("free")]
    Free,
    /// Monthly premium subscription
    #[display("premium_monthly")]
    PremiumMonthly,
    /// Yearly premium subscription
    #[display("premium_yearly")]
    PremiumYearly,
}

impl SubscriptionTier {
    /// Canonical tier name as stored on user profiles.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::PremiumMonthly => "premium_monthly",
            SubscriptionTier::PremiumYearly => "premium_yearly",
        }
    }

    /// Environment variable that overrides the model for this tier.
    pub fn override_key(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "OPENAI_MODEL_FREE",
            SubscriptionTier::PremiumMonthly => "OPENAI_MODEL_PREMIUM_MONTHLY",
            SubscriptionTier::PremiumYearly => "OPENAI_MODEL_PREMIUM_YEARLY",
        }
    }

    /// Whether the tier is a paid subscription.
    pub fn is_premium(&self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }
}

impl FromStr for SubscriptionTier {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionTier::Free),
            "premium_monthly" => Ok(SubscriptionTier::PremiumMonthly),
            "premium_yearly" => Ok(SubscriptionTier::PremiumYearly),
            other => Err(ModelsError::new(ModelsErrorKind::InvalidTier(
                other.to_string(),
            ))),
        }
    }
}
