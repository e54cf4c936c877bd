//! Tests for model migration advice.

mod test_utils;

use mealappeal_models::{MigrationReason, ModelRegistry, should_migrate_model};
use test_utils::{a_b_registry, deprecated, model};

#[test]
fn test_live_model_needs_no_migration() {
    let advice = should_migrate_model(&a_b_registry(), "A");

    assert!(!*advice.should_migrate());
    assert!(advice.reason().is_none());
    assert!(advice.suggested_model_id().is_none());
}

#[test]
fn test_deprecated_model_suggests_fallback() {
    let advice = should_migrate_model(&a_b_registry(), "B");

    assert!(*advice.should_migrate());
    assert_eq!(
        advice.reason(),
        &Some(MigrationReason::Deprecated {
            deprecation_date: Some("2024-12-31".to_string()),
        })
    );
    assert_eq!(advice.suggested_model_id().as_deref(), Some("A"));
}

#[test]
fn test_unknown_model_suggests_registry_default() {
    let advice = should_migrate_model(&a_b_registry(), "gpt-4-1106-vision-preview");

    assert!(*advice.should_migrate());
    assert_eq!(advice.reason(), &Some(MigrationReason::UnknownModel));
    assert_eq!(advice.suggested_model_id().as_deref(), Some("A"));
}

#[test]
fn test_broken_fallback_suggests_registry_default() {
    let registry = ModelRegistry::new(
        vec![model("A", 1.0, 2.0), deprecated("B", "missing")],
        "A",
    )
    .unwrap();

    let advice = should_migrate_model(&registry, "B");

    assert!(*advice.should_migrate());
    assert_eq!(advice.suggested_model_id().as_deref(), Some("A"));
}

#[test]
fn test_builtin_deprecated_models_all_have_suggestions() {
    let registry = ModelRegistry::builtin().unwrap();

    for model_id in ["gpt-4-turbo", "gpt-4-vision-preview"] {
        let advice = should_migrate_model(&registry, model_id);
        assert!(*advice.should_migrate(), "{}", model_id);
        let suggested = advice.suggested_model_id().as_deref().unwrap();
        assert!(!*registry.get_model_by_id(suggested).unwrap().deprecated());
    }
}

#[test]
fn test_advice_serializes_for_operators() {
    let advice = should_migrate_model(&a_b_registry(), "B");
    let json = serde_json::to_value(&advice).unwrap();

    assert_eq!(json["should_migrate"], true);
    assert_eq!(json["reason"]["kind"], "deprecated");
    assert_eq!(json["suggested_model_id"], "A");
}
