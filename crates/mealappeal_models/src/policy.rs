//! Tier policies: which model each subscription tier gets, and with what budget.

use crate::{ImageDetail, ModelDescriptor, ModelFeatures, ModelRegistry, SubscriptionTier};
use derive_getters::Getters;
use mealappeal_error::ModelsResult;
use serde::{Deserialize, Serialize};

/// Model choice and parameter overrides for one subscription tier.
///
/// Overrides are optional; `None` keeps the registry value of the model.
///
/// ```toml
/// [tiers.premium_monthly]
/// model = "gpt-4o"
/// safe_default = "gpt-4o"
/// max_tokens = 1500
/// image_detail = "high"
/// features = { premium_analysis = true, enhanced_accuracy = true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct TierPolicy {
    /// Nominal model id; may name a model not yet in the registry
    model: String,
    /// Model substituted when the nominal model is not registered
    safe_default: String,
    /// Tier token budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Tier image fidelity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_detail: Option<ImageDetail>,
    /// Tier capability flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    features: Option<ModelFeatures>,
}

impl TierPolicy {
    /// Policy with no overrides.
    pub fn new(model: impl Into<String>, safe_default: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            safe_default: safe_default.into(),
            max_tokens: None,
            image_detail: None,
            features: None,
        }
    }

    /// Sets the tier token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the tier image fidelity.
    pub fn with_image_detail(mut self, image_detail: ImageDetail) -> Self {
        self.image_detail = Some(image_detail);
        self
    }

    /// Sets the tier capability flags.
    pub fn with_features(mut self, features: ModelFeatures) -> Self {
        self.features = Some(features);
        self
    }

    /// Merges this tier's overrides onto `base`.
    pub fn apply(&self, base: &ModelDescriptor) -> ModelDescriptor {
        let mut merged = base.clone();
        if let Some(max_tokens) = self.max_tokens {
            merged = merged.with_max_tokens(max_tokens);
        }
        if let Some(image_detail) = self.image_detail {
            merged = merged.with_image_detail(image_detail);
        }
        if let Some(features) = self.features {
            merged = merged.with_features(features);
        }
        merged
    }
}

/// One policy per subscription tier.
///
/// Deserialization fails when any tier is missing, so lookups never have to
/// guess a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPolicyTable {
    free: TierPolicy,
    premium_monthly: TierPolicy,
    premium_yearly: TierPolicy,
}

impl TierPolicyTable {
    /// Creates a table from the three tier policies.
    pub fn new(free: TierPolicy, premium_monthly: TierPolicy, premium_yearly: TierPolicy) -> Self {
        Self {
            free,
            premium_monthly,
            premium_yearly,
        }
    }

    /// Policy for a tier.
    pub fn policy(&self, tier: SubscriptionTier) -> &TierPolicy {
        match tier {
            SubscriptionTier::Free => &self.free,
            SubscriptionTier::PremiumMonthly => &self.premium_monthly,
            SubscriptionTier::PremiumYearly => &self.premium_yearly,
        }
    }

    /// The tier's nominal descriptor with tier overrides applied.
    ///
    /// `None` when the nominal model is not registered; the resolver then
    /// substitutes the tier's safe default.
    pub fn descriptor_for_tier(
        &self,
        tier: SubscriptionTier,
        registry: &ModelRegistry,
    ) -> Option<ModelDescriptor> {
        let policy = self.policy(tier);
        registry
            .get_model_by_id(&policy.model)
            .map(|base| policy.apply(base))
    }

    /// Like [`TierPolicyTable::descriptor_for_tier`], for an unparsed tier name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTier` for names other than the three known tiers.
    pub fn descriptor_for_tier_name(
        &self,
        tier: &str,
        registry: &ModelRegistry,
    ) -> ModelsResult<Option<ModelDescriptor>> {
        let tier: SubscriptionTier = tier.parse()?;
        Ok(self.descriptor_for_tier(tier, registry))
    }
}
