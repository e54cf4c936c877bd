//! Tests for tier-to-model resolution.

mod test_utils;

use mealappeal_error::ModelsErrorKind;
use mealappeal_models::{
    ImageDetail, ModelFeatures, ModelRegistry, ModelResolver, ModelsConfig, NoOverrides,
    ResolutionSource, StaticOverrides, SubscriptionTier, TierPolicy, TierPolicyTable,
};
use strum::IntoEnumIterator;
use test_utils::{CapturedEvents, a_b_registry, deprecated, model, retired, uniform_policies};

fn bundled_resolver() -> ModelResolver<NoOverrides> {
    let (registry, policies) = ModelsConfig::bundled().unwrap().into_parts().unwrap();
    ModelResolver::new(registry, policies).with_overrides(NoOverrides)
}

#[test]
fn test_every_tier_resolves_to_live_registered_model() {
    let resolver = bundled_resolver();

    for tier in SubscriptionTier::iter() {
        let descriptor = resolver.resolve_model(tier);
        let registered = resolver
            .registry()
            .get_model_by_id(descriptor.model_id())
            .expect("resolved model must be registered");
        assert!(!registered.deprecated(), "{} resolved to deprecated model", tier);
        assert!(!descriptor.deprecated());
    }
}

#[test]
fn test_bundled_tiers_apply_budgets() {
    let resolver = bundled_resolver();

    let free = resolver.resolve_model(SubscriptionTier::Free);
    assert_eq!(free.model_id(), "gpt-4o-mini");
    assert_eq!(*free.max_tokens(), 1000);
    assert_eq!(*free.image_detail(), ImageDetail::Low);
    assert!(!free.features().premium_analysis);

    let yearly = resolver.resolve(SubscriptionTier::PremiumYearly);
    assert_eq!(*yearly.source(), ResolutionSource::Policy);
    assert_eq!(yearly.descriptor().model_id(), "gpt-4o");
    assert_eq!(*yearly.descriptor().max_tokens(), 2000);
    assert!(yearly.descriptor().features().premium_analysis);
    assert!(yearly.descriptor().features().long_context);
}

#[test]
fn test_override_with_registered_model_wins() {
    let (registry, policies) = ModelsConfig::bundled().unwrap().into_parts().unwrap();
    let expected = registry.get_model_by_id("gpt-4o").unwrap().clone();
    let resolver = ModelResolver::new(registry, policies)
        .with_overrides(StaticOverrides::new().with(SubscriptionTier::Free, "gpt-4o"));

    let resolution = resolver.resolve(SubscriptionTier::Free);
    assert_eq!(*resolution.source(), ResolutionSource::Override);
    // Exactly the registry descriptor: no tier overrides applied.
    assert_eq!(resolution.descriptor(), &expected);

    // Other tiers are untouched.
    let monthly = resolver.resolve(SubscriptionTier::PremiumMonthly);
    assert_eq!(*monthly.source(), ResolutionSource::Policy);
}

#[test]
fn test_override_bypasses_deprecation() {
    let resolver = ModelResolver::new(a_b_registry(), uniform_policies("A", "A"))
        .with_overrides(StaticOverrides::new().with(SubscriptionTier::PremiumMonthly, "B"));
    let events = CapturedEvents::default();

    let resolution = events.capture(|| resolver.resolve(SubscriptionTier::PremiumMonthly));

    assert_eq!(resolution.descriptor().model_id(), "B");
    assert!(*resolution.descriptor().deprecated());
    assert!(resolution.deprecated_from().is_none());
    assert!(events.substitutions("deprecation_fallback").is_empty());
}

#[test]
fn test_override_with_unknown_model_is_ignored() {
    let resolver = ModelResolver::new(a_b_registry(), uniform_policies("A", "A"))
        .with_overrides(StaticOverrides::new().with(SubscriptionTier::Free, "gpt-9-omni"));
    let events = CapturedEvents::default();

    let resolution = events.capture(|| resolver.resolve(SubscriptionTier::Free));

    assert_eq!(*resolution.source(), ResolutionSource::Policy);
    assert_eq!(resolution.descriptor().model_id(), "A");
    let ignored = events.substitutions("override_unknown");
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0].field("from"), Some("gpt-9-omni"));
    assert_eq!(ignored[0].field("key"), Some("OPENAI_MODEL_FREE"));
}

#[test]
fn test_deprecated_policy_model_follows_fallback() {
    let resolver =
        ModelResolver::new(a_b_registry(), uniform_policies("B", "A")).with_overrides(NoOverrides);
    let events = CapturedEvents::default();

    let resolution = events.capture(|| resolver.resolve(SubscriptionTier::Free));

    assert_eq!(
        resolution.descriptor(),
        a_b_registry().get_model_by_id("A").unwrap()
    );
    assert_eq!(resolution.deprecated_from().as_deref(), Some("B"));

    let fallbacks = events.substitutions("deprecation_fallback");
    assert_eq!(fallbacks.len(), 1);
    assert_eq!(fallbacks[0].field("from"), Some("B"));
    assert_eq!(fallbacks[0].field("to"), Some("A"));
    assert_eq!(events.warnings().len(), 1);
}

#[test]
fn test_fallback_chain_is_followed_to_live_model() {
    let registry = ModelRegistry::new(
        vec![
            model("live", 1.0, 2.0),
            deprecated("old", "older-replacement"),
            deprecated("older-replacement", "live"),
        ],
        "live",
    )
    .unwrap();
    let resolver =
        ModelResolver::new(registry, uniform_policies("old", "live")).with_overrides(NoOverrides);
    let events = CapturedEvents::default();

    let descriptor = events.capture(|| resolver.resolve_model(SubscriptionTier::PremiumYearly));

    assert_eq!(descriptor.model_id(), "live");
    let fallbacks = events.substitutions("deprecation_fallback");
    assert_eq!(fallbacks.len(), 1);
    assert_eq!(fallbacks[0].field("hops"), Some("2"));
}

#[test]
fn test_registered_fallback_is_used_even_when_itself_deprecated() {
    let registry = ModelRegistry::new(
        vec![model("A", 1.0, 2.0), deprecated("B", "C"), retired("C")],
        "A",
    )
    .unwrap();
    let resolver =
        ModelResolver::new(registry, uniform_policies("B", "A")).with_overrides(NoOverrides);
    let events = CapturedEvents::default();

    let resolution = events.capture(|| resolver.resolve(SubscriptionTier::Free));

    assert_eq!(resolution.descriptor().model_id(), "C");
    assert!(*resolution.descriptor().deprecated());
    assert_eq!(resolution.deprecated_from().as_deref(), Some("B"));

    let fallbacks = events.substitutions("deprecation_fallback");
    assert_eq!(fallbacks.len(), 1);
    assert_eq!(fallbacks[0].field("from"), Some("B"));
    assert_eq!(fallbacks[0].field("to"), Some("C"));
    assert_eq!(fallbacks[0].field("still_deprecated"), Some("true"));
    assert!(events.substitutions("deprecated_without_fallback").is_empty());
}

#[test]
fn test_fallback_cycle_stops_before_revisiting() {
    let registry = ModelRegistry::new(
        vec![model("A", 1.0, 2.0), deprecated("ping", "pong"), deprecated("pong", "ping")],
        "A",
    )
    .unwrap();
    let resolver =
        ModelResolver::new(registry, uniform_policies("ping", "A")).with_overrides(NoOverrides);

    let resolution = resolver.resolve(SubscriptionTier::PremiumMonthly);

    assert_eq!(resolution.descriptor().model_id(), "pong");
    assert_eq!(resolution.deprecated_from().as_deref(), Some("ping"));
}

#[test]
fn test_fallback_keeps_tier_budget() {
    let policies = TierPolicyTable::new(
        TierPolicy::new("B", "A")
            .with_max_tokens(321)
            .with_image_detail(ImageDetail::Low),
        TierPolicy::new("A", "A"),
        TierPolicy::new("A", "A"),
    );
    let resolver = ModelResolver::new(a_b_registry(), policies).with_overrides(NoOverrides);

    let descriptor = resolver.resolve_model(SubscriptionTier::Free);

    assert_eq!(descriptor.model_id(), "A");
    assert_eq!(*descriptor.max_tokens(), 321);
    assert_eq!(*descriptor.image_detail(), ImageDetail::Low);
}

#[test]
fn test_missing_nominal_model_uses_tier_safe_default() {
    let registry = ModelRegistry::new(
        vec![model("gpt-4o-mini", 0.15, 0.6), model("gpt-4o", 2.5, 10.0)],
        "gpt-4o-mini",
    )
    .unwrap();
    let policies = TierPolicyTable::new(
        TierPolicy::new("gpt-4o-mini", "gpt-4o-mini"),
        TierPolicy::new("gpt-4o", "gpt-4o"),
        TierPolicy::new("gpt-X-future", "gpt-4o").with_features(ModelFeatures::premium()),
    );
    let resolver = ModelResolver::new(registry, policies).with_overrides(NoOverrides);
    let events = CapturedEvents::default();

    let resolution = events.capture(|| resolver.resolve(SubscriptionTier::PremiumYearly));

    assert_eq!(*resolution.source(), ResolutionSource::SafeDefault);
    assert_eq!(resolution.descriptor().model_id(), "gpt-4o");
    assert!(resolution.descriptor().features().premium_analysis);

    let substitutions = events.substitutions("safe_default");
    assert_eq!(substitutions.len(), 1);
    assert_eq!(substitutions[0].field("from"), Some("gpt-X-future"));
    assert_eq!(substitutions[0].field("to"), Some("gpt-4o"));
}

#[test]
fn test_missing_safe_default_uses_registry_default() {
    let resolver = ModelResolver::new(a_b_registry(), uniform_policies("gone", "also-gone"))
        .with_overrides(NoOverrides);

    let resolution = resolver.resolve(SubscriptionTier::PremiumMonthly);

    assert_eq!(*resolution.source(), ResolutionSource::SafeDefault);
    assert_eq!(resolution.descriptor().model_id(), "A");
}

#[test]
fn test_deprecated_without_usable_fallback_is_returned_with_warning() {
    let registry =
        ModelRegistry::new(vec![model("A", 1.0, 2.0), deprecated("B", "nowhere")], "A").unwrap();
    let resolver =
        ModelResolver::new(registry, uniform_policies("B", "A")).with_overrides(NoOverrides);
    let events = CapturedEvents::default();

    let descriptor = events.capture(|| resolver.resolve_model(SubscriptionTier::Free));

    assert_eq!(descriptor.model_id(), "B");
    assert_eq!(events.substitutions("deprecated_without_fallback").len(), 1);
    assert!(events.substitutions("deprecation_fallback").is_empty());
}

#[test]
fn test_resolve_by_name() {
    let resolver = bundled_resolver();

    let descriptor = resolver.resolve_model_by_name("premium_monthly").unwrap();
    assert_eq!(descriptor.model_id(), "gpt-4o");

    let err = resolver.resolve_model_by_name("platinum").unwrap_err();
    assert_eq!(
        err.kind(),
        &ModelsErrorKind::InvalidTier("platinum".to_string())
    );
}

#[test]
fn test_resolver_is_shareable_across_threads() {
    let resolver = std::sync::Arc::new(bundled_resolver());

    let handles: Vec<_> = SubscriptionTier::iter()
        .map(|tier| {
            let resolver = resolver.clone();
            std::thread::spawn(move || resolver.resolve_model(tier).model_id().clone())
        })
        .collect();

    for handle in handles {
        let model_id = handle.join().unwrap();
        assert!(resolver.registry().contains(&model_id));
    }
}
