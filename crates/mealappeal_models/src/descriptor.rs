//! Model descriptors: the operating envelope of one AI vision model.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Image fidelity requested from the vision API.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    /// Downscaled image, cheapest
    #[display("low")]
    Low,
    /// Full-resolution tiles
    #[display("high")]
    High,
    /// Let the vision API decide
    #[default]
    #[display("auto")]
    Auto,
}

/// Price per million tokens in USD.
///
/// Used only for estimation and accounting logs, never billed directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelCost {
    /// USD per million input tokens
    pub input: f64,
    /// USD per million output tokens
    pub output: f64,
}

impl ModelCost {
    /// Creates a new cost pair.
    pub fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Informational capability flags consumed by callers to branch UI and behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelFeatures {
    /// Detailed nutrition breakdown and coaching text
    pub premium_analysis: bool,
    /// Second-pass portion estimation
    pub enhanced_accuracy: bool,
    /// Meal history may be included as context
    pub long_context: bool,
}

impl ModelFeatures {
    /// Flags for a premium tier: everything but long context.
    pub fn premium() -> Self {
        Self {
            premium_analysis: true,
            enhanced_accuracy: true,
            long_context: false,
        }
    }
}

/// Full parameter and cost envelope for one AI vision model.
///
/// # Examples
///
/// ```
/// use mealappeal_models::{ImageDetail, ModelCost, ModelDescriptor};
///
/// let descriptor = ModelDescriptor::builder()
///     .model_id("gpt-4o-mini")
///     .display_name("GPT-4o mini")
///     .max_tokens(1000u32)
///     .temperature(0.3)
///     .image_detail(ImageDetail::Low)
///     .cost_per_million_tokens(ModelCost::new(0.15, 0.60))
///     .build()
///     .unwrap();
///
/// assert_eq!(descriptor.model_id(), "gpt-4o-mini");
/// assert!(!descriptor.deprecated());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ModelDescriptor {
    /// Vision API model name
    model_id: String,
    /// Human-readable label
    display_name: String,
    /// Upper bound on response length requested from the API
    max_tokens: u32,
    /// Sampling temperature in `[0, 1]`
    temperature: f64,
    /// Requested image fidelity
    #[builder(default)]
    #[serde(default)]
    image_detail: ImageDetail,
    /// Estimation-only pricing
    cost_per_million_tokens: ModelCost,
    /// Capability flags
    #[builder(default)]
    #[serde(default)]
    features: ModelFeatures,
    /// Retired by the provider; resolution follows `fallback_model_id`
    #[builder(default)]
    #[serde(default)]
    deprecated: bool,
    /// Informational retirement date
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deprecation_date: Option<String>,
    /// Replacement used while this model is deprecated
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback_model_id: Option<String>,
}

impl ModelDescriptor {
    /// Creates a new builder for `ModelDescriptor`.
    pub fn builder() -> ModelDescriptorBuilder {
        ModelDescriptorBuilder::default()
    }

    /// Replaces the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replaces the requested image fidelity.
    pub fn with_image_detail(mut self, image_detail: ImageDetail) -> Self {
        self.image_detail = image_detail;
        self
    }

    /// Replaces the capability flags.
    pub fn with_features(mut self, features: ModelFeatures) -> Self {
        self.features = features;
        self
    }
}
