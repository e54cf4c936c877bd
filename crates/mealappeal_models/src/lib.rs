//! AI vision model selection for MealAppeal meal analysis.
//!
//! Given a user's subscription tier, this crate decides which vision model
//! analyses the meal photo and with what token budget and image detail. It
//! also estimates what the call will cost.
//!
//! - [`ModelRegistry`] - every known model and its envelope
//! - [`TierPolicyTable`] - the nominal model and overrides per tier
//! - [`ModelResolver`] - overrides, safe defaults and deprecation fallback
//! - [`estimate_cost`] - USD estimate from token counts
//! - [`should_migrate_model`] - operator diagnostics for configured model ids
//!
//! Registry and policies load once from [`ModelsConfig`] and are read-only
//! afterwards; everything here is synchronous and safe to share across threads.
//!
//! ```
//! use mealappeal_models::{estimate_cost, ModelResolver, ModelsConfig, NoOverrides};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (registry, policies) = ModelsConfig::bundled()?.into_parts()?;
//! let resolver = ModelResolver::new(registry, policies).with_overrides(NoOverrides);
//!
//! let model = resolver.resolve_model_by_name("premium_monthly")?;
//! let usd = estimate_cost(&model, 1_200, 350)?;
//! assert!(usd > 0.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod cost;
mod descriptor;
mod migration;
mod overrides;
mod policy;
mod registry;
mod resolver;
mod tier;

pub use config::ModelsConfig;
pub use cost::{CostBreakdown, estimate_cost, estimate_cost_breakdown};
pub use descriptor::{
    ImageDetail, ModelCost, ModelDescriptor, ModelDescriptorBuilder, ModelDescriptorBuilderError,
    ModelFeatures,
};
pub use migration::{MigrationAdvice, MigrationReason, should_migrate_model};
pub use overrides::{EnvOverrides, NoOverrides, OverrideSource, StaticOverrides};
pub use policy::{TierPolicy, TierPolicyTable};
pub use registry::{ModelRegistry, Recommendations, RegistryIssue, UseCase};
pub use resolver::{ModelResolver, Resolution, ResolutionSource};
pub use tier::SubscriptionTier;
