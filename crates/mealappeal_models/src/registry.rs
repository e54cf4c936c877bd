//! The model registry: every vision model the service knows about.

use crate::ModelDescriptor;
use mealappeal_error::{ModelsError, ModelsErrorKind, ModelsResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// What a caller optimises for when asking for a recommendation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
    /// Best nutrition estimates
    #[display("accuracy")]
    Accuracy,
    /// Lowest latency
    #[display("speed")]
    Speed,
    /// Lowest spend
    #[display("cost")]
    Cost,
}

impl std::str::FromStr for UseCase {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accuracy" => Ok(UseCase::Accuracy),
            "speed" => Ok(UseCase::Speed),
            "cost" => Ok(UseCase::Cost),
            other => Err(ModelsError::new(ModelsErrorKind::InvalidArgument(format!(
                "unknown use case: {}",
                other
            )))),
        }
    }
}

/// Preferred model per use case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Model for the most accurate analysis
    pub accuracy: String,
    /// Model for the fastest analysis
    pub speed: String,
    /// Model for the cheapest analysis
    pub cost: String,
}

impl Recommendations {
    /// Preferred model id for a use case.
    pub fn model_for(&self, use_case: UseCase) -> &str {
        match use_case {
            UseCase::Accuracy => &self.accuracy,
            UseCase::Speed => &self.speed,
            UseCase::Cost => &self.cost,
        }
    }
}

impl Default for Recommendations {
    fn default() -> Self {
        Self {
            accuracy: "gpt-4o".to_string(),
            speed: "gpt-4o-mini".to_string(),
            cost: "gpt-4o-mini".to_string(),
        }
    }
}

/// A data error in the registry that resolution tolerates but operators should fix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RegistryIssue {
    /// `fallback_model_id` names a model the registry does not contain
    #[display("{} falls back to unknown model {}", model_id, fallback_model_id)]
    DanglingFallback {
        /// Model carrying the pointer
        model_id: String,
        /// Missing target
        fallback_model_id: String,
    },
    /// A model names itself as its fallback
    #[display("{} falls back to itself", model_id)]
    SelfFallback {
        /// Offending model
        model_id: String,
    },
    /// Deprecated model with no replacement
    #[display("{} is deprecated without a fallback", model_id)]
    MissingFallback {
        /// Offending model
        model_id: String,
    },
    /// Following fallbacks from this model never reaches a live model
    #[display("fallback chain from {} loops", model_id)]
    FallbackCycle {
        /// Start of the chain
        model_id: String,
    },
}

/// Read-only set of known models, keyed by model id.
///
/// Built once at startup (usually from [`crate::ModelsConfig`]) and injected
/// into the resolver.
///
/// # Examples
///
/// ```
/// use mealappeal_models::ModelRegistry;
///
/// let registry = ModelRegistry::builtin().unwrap();
/// assert!(registry.get_model_by_id("gpt-4o-mini").is_some());
/// assert!(registry.get_model_by_id("gpt-X-future").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, ModelDescriptor>,
    default_model_id: String,
    recommendations: Recommendations,
}

impl ModelRegistry {
    /// Builds a registry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegistry` for duplicate ids, temperatures outside
    /// `[0, 1]`, negative or non-finite prices, a zero token budget, or a
    /// default model that is missing or deprecated. Dangling fallbacks are
    /// accepted; see [`ModelRegistry::integrity_issues`].
    pub fn new(
        models: impl IntoIterator<Item = ModelDescriptor>,
        default_model_id: impl Into<String>,
    ) -> ModelsResult<Self> {
        let default_model_id = default_model_id.into();
        let mut by_id = HashMap::new();

        for model in models {
            validate_descriptor(&model)?;
            let id = model.model_id().clone();
            if by_id.insert(id.clone(), model).is_some() {
                return Err(invalid(format!("duplicate model id {}", id)));
            }
        }

        match by_id.get(&default_model_id) {
            None => {
                return Err(invalid(format!(
                    "default model {} is not registered",
                    default_model_id
                )));
            }
            Some(model) if *model.deprecated() => {
                return Err(invalid(format!(
                    "default model {} is deprecated",
                    default_model_id
                )));
            }
            Some(_) => {}
        }

        debug!(models = by_id.len(), default = %default_model_id, "Built model registry");

        Ok(Self {
            models: by_id,
            default_model_id,
            recommendations: Recommendations::default(),
        })
    }

    /// Replaces the use-case recommendation table.
    pub fn with_recommendations(mut self, recommendations: Recommendations) -> Self {
        self.recommendations = recommendations;
        self
    }

    /// Looks up a model. `None` is a recoverable condition; callers apply a default.
    pub fn get_model_by_id(&self, model_id: &str) -> Option<&ModelDescriptor> {
        self.models.get(model_id)
    }

    /// Whether the registry knows `model_id`.
    pub fn contains(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    /// The registry-wide default, guaranteed present and not deprecated.
    pub fn default_model(&self) -> &ModelDescriptor {
        // Checked in `new`; the map is never mutated afterwards.
        &self.models[&self.default_model_id]
    }

    /// Number of registered models, deprecated ones included.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the registry is empty. Always false for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// All models not marked deprecated.
    ///
    /// Sorted by id for stable output; callers must not depend on the order.
    pub fn available_models(&self) -> Vec<&ModelDescriptor> {
        let mut available: Vec<_> = self
            .models
            .values()
            .filter(|model| !*model.deprecated())
            .collect();
        available.sort_by(|a, b| a.model_id().cmp(b.model_id()));
        available
    }

    /// Preferred model for a use case, or the registry default when the
    /// preferred model is not registered or is deprecated.
    pub fn recommended_model(&self, use_case: UseCase) -> &ModelDescriptor {
        let preferred = self.recommendations.model_for(use_case);
        match self.get_model_by_id(preferred) {
            Some(model) if !*model.deprecated() => model,
            Some(_) => {
                debug!(%use_case, preferred, "Recommended model is deprecated, using default");
                self.default_model()
            }
            None => {
                debug!(%use_case, preferred, "Recommended model not registered, using default");
                self.default_model()
            }
        }
    }

    /// Follows deprecation pointers from `model_id` to the first live model.
    ///
    /// Returns the live model and the number of hops taken (zero when
    /// `model_id` itself is live). `None` when the model is unknown, the chain
    /// ends at a deprecated model without a registered fallback, or it loops.
    pub fn follow_fallbacks(&self, model_id: &str) -> Option<(&ModelDescriptor, usize)> {
        self.fallback_chain_end(model_id)
            .filter(|(model, _)| !*model.deprecated())
    }

    /// Follows deprecation pointers from `model_id` as far as they stay
    /// registered.
    ///
    /// Stops at the first live model, at a deprecated model whose fallback is
    /// missing or unregistered, or before revisiting a model. The returned
    /// model may still be deprecated; `hops` is zero when no pointer could be
    /// followed. `None` only when `model_id` is unknown.
    pub fn fallback_chain_end(&self, model_id: &str) -> Option<(&ModelDescriptor, usize)> {
        let mut current = self.get_model_by_id(model_id)?;
        let mut seen = HashSet::from([current.model_id().as_str()]);
        let mut hops = 0;

        while *current.deprecated() {
            let Some(next) = current
                .fallback_model_id()
                .as_deref()
                .and_then(|id| self.get_model_by_id(id))
            else {
                break;
            };
            if !seen.insert(next.model_id().as_str()) {
                break;
            }
            current = next;
            hops += 1;
        }

        Some((current, hops))
    }

    /// Data errors that resolution tolerates at runtime.
    ///
    /// An empty list means every deprecated model reaches a live replacement.
    pub fn integrity_issues(&self) -> Vec<RegistryIssue> {
        let mut ids: Vec<_> = self.models.keys().collect();
        ids.sort();

        let mut issues = Vec::new();
        for id in ids {
            let model = &self.models[id];
            match model.fallback_model_id() {
                Some(fallback) if fallback == id => {
                    issues.push(RegistryIssue::SelfFallback {
                        model_id: id.clone(),
                    });
                }
                Some(fallback) if !self.contains(fallback) => {
                    issues.push(RegistryIssue::DanglingFallback {
                        model_id: id.clone(),
                        fallback_model_id: fallback.clone(),
                    });
                }
                Some(_) if *model.deprecated() && self.loops_from(id) => {
                    issues.push(RegistryIssue::FallbackCycle {
                        model_id: id.clone(),
                    });
                }
                None if *model.deprecated() => {
                    issues.push(RegistryIssue::MissingFallback {
                        model_id: id.clone(),
                    });
                }
                _ => {}
            }
        }
        issues
    }

    fn loops_from(&self, model_id: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = model_id;
        while let Some(model) = self.get_model_by_id(current) {
            if !*model.deprecated() {
                return false;
            }
            if !seen.insert(current) {
                return true;
            }
            match model.fallback_model_id() {
                Some(next) => current = next.as_str(),
                None => return false,
            }
        }
        false
    }
}

fn validate_descriptor(model: &ModelDescriptor) -> ModelsResult<()> {
    let id = model.model_id();
    let temperature = *model.temperature();
    if !(0.0..=1.0).contains(&temperature) {
        return Err(invalid(format!(
            "{} temperature {} is outside [0, 1]",
            id, temperature
        )));
    }
    let cost = model.cost_per_million_tokens();
    if !(cost.input.is_finite() && cost.output.is_finite()) || cost.input < 0.0 || cost.output < 0.0
    {
        return Err(invalid(format!("{} has an invalid price {:?}", id, cost)));
    }
    if *model.max_tokens() == 0 {
        return Err(invalid(format!("{} has a zero token budget", id)));
    }
    Ok(())
}

#[track_caller]
fn invalid(message: String) -> ModelsError {
    ModelsError::new(ModelsErrorKind::InvalidRegistry(message))
}
