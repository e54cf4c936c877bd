//! Analysis cost estimation.

use crate::ModelDescriptor;
use derive_getters::Getters;
use mealappeal_error::{ModelsError, ModelsErrorKind, ModelsResult};
use serde::Serialize;

const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;

/// Estimated spend for one analysis call, split by direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Getters)]
pub struct CostBreakdown {
    /// USD spent on prompt and image tokens
    input_usd: f64,
    /// USD spent on response tokens
    output_usd: f64,
    /// Sum of both
    total_usd: f64,
}

/// Estimated USD cost of one call to `descriptor`'s model.
///
/// # Errors
///
/// Returns `InvalidArgument` when either token count is negative.
///
/// # Examples
///
/// ```
/// use mealappeal_models::{estimate_cost, ModelRegistry};
///
/// let registry = ModelRegistry::builtin().unwrap();
/// let model = registry.get_model_by_id("gpt-4o").unwrap();
/// let cost = estimate_cost(model, 1_000_000, 1_000_000).unwrap();
/// let price = model.cost_per_million_tokens();
/// assert_eq!(cost, price.input + price.output);
/// ```
pub fn estimate_cost(
    descriptor: &ModelDescriptor,
    input_tokens: i64,
    output_tokens: i64,
) -> ModelsResult<f64> {
    Ok(estimate_cost_breakdown(descriptor, input_tokens, output_tokens)?.total_usd)
}

/// Like [`estimate_cost`], keeping the input and output shares apart.
///
/// # Errors
///
/// Returns `InvalidArgument` when either token count is negative.
pub fn estimate_cost_breakdown(
    descriptor: &ModelDescriptor,
    input_tokens: i64,
    output_tokens: i64,
) -> ModelsResult<CostBreakdown> {
    for (name, count) in [("input_tokens", input_tokens), ("output_tokens", output_tokens)] {
        if count < 0 {
            return Err(ModelsError::new(ModelsErrorKind::InvalidArgument(format!(
                "{} must not be negative, got {}",
                name, count
            ))));
        }
    }

    let price = descriptor.cost_per_million_tokens();
    let input_usd = (input_tokens as f64 / TOKENS_PER_PRICE_UNIT) * price.input;
    let output_usd = (output_tokens as f64 / TOKENS_PER_PRICE_UNIT) * price.output;

    Ok(CostBreakdown {
        input_usd,
        output_usd,
        total_usd: input_usd + output_usd,
    })
}
