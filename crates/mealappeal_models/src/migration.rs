//! Operator diagnostics: should a configured model id be replaced?

use crate::ModelRegistry;
use derive_getters::Getters;
use serde::Serialize;

/// Why a model should be replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MigrationReason {
    /// The registry does not know the model
    #[display("model is not registered")]
    UnknownModel,
    /// The model is retired
    #[display("model is deprecated (retires {})", deprecation_date.as_deref().unwrap_or("on an unannounced date"))]
    Deprecated {
        /// Informational retirement date
        deprecation_date: Option<String>,
    },
}

/// Advice returned by [`should_migrate_model`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct MigrationAdvice {
    /// Whether the model should be replaced
    should_migrate: bool,
    /// Why, when `should_migrate` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<MigrationReason>,
    /// Registered, non-deprecated replacement
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_model_id: Option<String>,
}

impl MigrationAdvice {
    fn keep() -> Self {
        Self {
            should_migrate: false,
            reason: None,
            suggested_model_id: None,
        }
    }

    fn migrate(reason: MigrationReason, suggested_model_id: String) -> Self {
        Self {
            should_migrate: true,
            reason: Some(reason),
            suggested_model_id: Some(suggested_model_id),
        }
    }
}

/// Checks whether `model_id` (typically an override value) should be replaced.
///
/// Deprecated models are pointed at the end of their fallback chain, or the
/// registry default when the chain is broken. Unknown models are pointed at
/// the registry default.
///
/// # Examples
///
/// ```
/// use mealappeal_models::{should_migrate_model, ModelRegistry};
///
/// let registry = ModelRegistry::builtin().unwrap();
/// let advice = should_migrate_model(&registry, "gpt-4-vision-preview");
/// assert!(*advice.should_migrate());
/// assert_eq!(advice.suggested_model_id().as_deref(), Some("gpt-4o"));
///
/// assert!(!should_migrate_model(&registry, "gpt-4o").should_migrate());
/// ```
pub fn should_migrate_model(registry: &ModelRegistry, model_id: &str) -> MigrationAdvice {
    let Some(model) = registry.get_model_by_id(model_id) else {
        return MigrationAdvice::migrate(
            MigrationReason::UnknownModel,
            registry.default_model().model_id().clone(),
        );
    };

    if !*model.deprecated() {
        return MigrationAdvice::keep();
    }

    let suggested = registry
        .follow_fallbacks(model_id)
        .map(|(live, _)| live)
        .unwrap_or_else(|| registry.default_model());

    MigrationAdvice::migrate(
        MigrationReason::Deprecated {
            deprecation_date: model.deprecation_date().clone(),
        },
        suggested.model_id().clone(),
    )
}
