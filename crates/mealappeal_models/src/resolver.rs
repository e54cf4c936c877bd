//! Tier-to-model resolution with operator overrides and deprecation fallback.
//!
//! Resolution order:
//! 1. An operator override naming a registered model wins outright.
//! 2. Otherwise the tier policy's nominal model, with tier overrides applied.
//! 3. A nominal model missing from the registry is replaced by the tier's
//!    safe default.
//! 4. A deprecated result is replaced by its registered fallback, following
//!    the chain to the first live model where one exists.
//!
//! Substitutions never fail. Each one emits a WARN-level `tracing` event with a
//! `substitution` field so operators can track silent model changes.

use crate::{
    EnvOverrides, ModelDescriptor, ModelRegistry, OverrideSource, SubscriptionTier, TierPolicy,
    TierPolicyTable,
};
use derive_getters::Getters;
use mealappeal_error::ModelsResult;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Where a resolved descriptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Operator override for the tier
    #[display("override")]
    Override,
    /// The tier policy's nominal model
    #[display("policy")]
    Policy,
    /// The tier's safe default, because the nominal model is not registered
    #[display("safe_default")]
    SafeDefault,
}

/// Outcome of resolving a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct Resolution {
    /// Tier that was resolved
    tier: SubscriptionTier,
    /// Effective descriptor for the vision API call
    descriptor: ModelDescriptor,
    /// How the model was chosen
    source: ResolutionSource,
    /// Deprecated model that was replaced via its fallback chain
    #[serde(skip_serializing_if = "Option::is_none")]
    deprecated_from: Option<String>,
}

impl Resolution {
    /// Consumes the resolution, keeping the descriptor.
    pub fn into_descriptor(self) -> ModelDescriptor {
        self.descriptor
    }
}

/// Picks the effective model for a subscription tier.
///
/// Registry and policies are immutable once the resolver is built, so a
/// single resolver can be shared across request handlers without locking.
///
/// # Examples
///
/// ```
/// use mealappeal_models::{ModelResolver, ModelsConfig, NoOverrides, SubscriptionTier};
///
/// let (registry, policies) = ModelsConfig::bundled().unwrap().into_parts().unwrap();
/// let resolver = ModelResolver::new(registry, policies).with_overrides(NoOverrides);
///
/// let model = resolver.resolve_model(SubscriptionTier::Free);
/// assert!(!model.deprecated());
/// ```
#[derive(Debug)]
pub struct ModelResolver<O = EnvOverrides> {
    registry: ModelRegistry,
    policies: TierPolicyTable,
    overrides: O,
}

impl ModelResolver<EnvOverrides> {
    /// Creates a resolver that reads overrides from the process environment.
    pub fn new(registry: ModelRegistry, policies: TierPolicyTable) -> Self {
        Self {
            registry,
            policies,
            overrides: EnvOverrides,
        }
    }
}

impl<O: OverrideSource> ModelResolver<O> {
    /// Replaces the override source.
    pub fn with_overrides<P: OverrideSource>(self, overrides: P) -> ModelResolver<P> {
        ModelResolver {
            registry: self.registry,
            policies: self.policies,
            overrides,
        }
    }

    /// The registry this resolver reads.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// The tier policies this resolver applies.
    pub fn policies(&self) -> &TierPolicyTable {
        &self.policies
    }

    /// Effective descriptor for `tier`.
    pub fn resolve_model(&self, tier: SubscriptionTier) -> ModelDescriptor {
        self.resolve(tier).into_descriptor()
    }

    /// Effective descriptor for an unparsed tier name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTier` for names other than the three known tiers;
    /// callers should reject the request instead of guessing a tier.
    pub fn resolve_model_by_name(&self, tier: &str) -> ModelsResult<ModelDescriptor> {
        let tier: SubscriptionTier = tier.parse()?;
        Ok(self.resolve_model(tier))
    }

    /// Resolves `tier`, reporting how the descriptor was chosen.
    #[instrument(skip(self))]
    pub fn resolve(&self, tier: SubscriptionTier) -> Resolution {
        if let Some(descriptor) = self.override_descriptor(tier) {
            debug!(model = %descriptor.model_id(), "Using operator override");
            return Resolution {
                tier,
                descriptor,
                source: ResolutionSource::Override,
                deprecated_from: None,
            };
        }

        let policy = self.policies.policy(tier);
        let (descriptor, source) = match self.policies.descriptor_for_tier(tier, &self.registry) {
            Some(descriptor) => (descriptor, ResolutionSource::Policy),
            None => (
                self.safe_default(tier, policy),
                ResolutionSource::SafeDefault,
            ),
        };

        let (descriptor, deprecated_from) = self.replace_deprecated(tier, policy, descriptor);
        debug!(model = %descriptor.model_id(), %source, "Resolved model");

        Resolution {
            tier,
            descriptor,
            source,
            deprecated_from,
        }
    }

    fn override_descriptor(&self, tier: SubscriptionTier) -> Option<ModelDescriptor> {
        let model_id = self.overrides.model_for(tier)?;
        match self.registry.get_model_by_id(&model_id) {
            Some(descriptor) => Some(descriptor.clone()),
            None => {
                warn!(
                    substitution = "override_unknown",
                    %tier,
                    key = tier.override_key(),
                    from = %model_id,
                    "Ignoring override for unregistered model"
                );
                None
            }
        }
    }

    fn safe_default(&self, tier: SubscriptionTier, policy: &TierPolicy) -> ModelDescriptor {
        let base = self
            .registry
            .get_model_by_id(policy.safe_default())
            .unwrap_or_else(|| self.registry.default_model());
        warn!(
            substitution = "safe_default",
            %tier,
            from = %policy.model(),
            to = %base.model_id(),
            "Tier model is not registered, using safe default"
        );
        policy.apply(base)
    }

    fn replace_deprecated(
        &self,
        tier: SubscriptionTier,
        policy: &TierPolicy,
        descriptor: ModelDescriptor,
    ) -> (ModelDescriptor, Option<String>) {
        if !*descriptor.deprecated() {
            return (descriptor, None);
        }

        match self.registry.fallback_chain_end(descriptor.model_id()) {
            Some((target, hops)) if hops > 0 => {
                let still_deprecated = *target.deprecated();
                warn!(
                    substitution = "deprecation_fallback",
                    %tier,
                    from = %descriptor.model_id(),
                    to = %target.model_id(),
                    hops,
                    still_deprecated,
                    deprecation_date = descriptor.deprecation_date().as_deref().unwrap_or("unknown"),
                    "Model is deprecated, using fallback"
                );
                let from = descriptor.model_id().clone();
                (policy.apply(target), Some(from))
            }
            _ => {
                warn!(
                    substitution = "deprecated_without_fallback",
                    %tier,
                    from = %descriptor.model_id(),
                    "Model is deprecated and has no registered fallback"
                );
                (descriptor, None)
            }
        }
    }
}
