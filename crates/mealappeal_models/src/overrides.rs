//! Per-tier model overrides supplied by the operator.

use crate::SubscriptionTier;
use std::collections::HashMap;

/// A source of operator overrides, consulted on every resolution.
///
/// Overrides take absolute precedence over tier policies and bypass
/// deprecation checks; keeping them pointed at live models is the operator's
/// responsibility.
pub trait OverrideSource: Send + Sync {
    /// Model id forced for `tier`, if any.
    fn model_for(&self, tier: SubscriptionTier) -> Option<String>;
}

impl<T: OverrideSource + ?Sized> OverrideSource for &T {
    fn model_for(&self, tier: SubscriptionTier) -> Option<String> {
        (**self).model_for(tier)
    }
}

impl<T: OverrideSource + ?Sized> OverrideSource for Box<T> {
    fn model_for(&self, tier: SubscriptionTier) -> Option<String> {
        (**self).model_for(tier)
    }
}

/// Reads `OPENAI_MODEL_FREE`, `OPENAI_MODEL_PREMIUM_MONTHLY` and
/// `OPENAI_MODEL_PREMIUM_YEARLY` from the process environment at call time.
///
/// Empty or whitespace-only values count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOverrides;

impl OverrideSource for EnvOverrides {
    fn model_for(&self, tier: SubscriptionTier) -> Option<String> {
        std::env::var(tier.override_key())
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Fixed overrides held in memory.
///
/// # Examples
///
/// ```
/// use mealappeal_models::{OverrideSource, StaticOverrides, SubscriptionTier};
///
/// let overrides = StaticOverrides::new().with(SubscriptionTier::Free, "gpt-4o");
/// assert_eq!(overrides.model_for(SubscriptionTier::Free).as_deref(), Some("gpt-4o"));
/// assert_eq!(overrides.model_for(SubscriptionTier::PremiumYearly), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticOverrides {
    models: HashMap<SubscriptionTier, String>,
}

impl StaticOverrides {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces `model_id` for `tier`.
    pub fn with(mut self, tier: SubscriptionTier, model_id: impl Into<String>) -> Self {
        self.models.insert(tier, model_id.into());
        self
    }
}

impl OverrideSource for StaticOverrides {
    fn model_for(&self, tier: SubscriptionTier) -> Option<String> {
        self.models.get(&tier).cloned()
    }
}

/// Never overrides anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideSource for NoOverrides {
    fn model_for(&self, _tier: SubscriptionTier) -> Option<String> {
        None
    }
}
