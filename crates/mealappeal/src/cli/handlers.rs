//! Command handlers.
//!
//! Every command prints JSON to the given writer so the output can be piped
//! into other tooling.

use super::{Cli, Commands};
use mealappeal_models::{
    CostBreakdown, ModelResolver, ModelsConfig, OverrideSource, SubscriptionTier,
    estimate_cost_breakdown, should_migrate_model,
};
use serde::Serialize;
use std::io::Write;
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// The registry has data errors.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("{} registry issue(s) found", count)]
pub struct CheckFailed {
    count: usize,
}

#[derive(Serialize)]
struct CostReport<'a> {
    tier: SubscriptionTier,
    model_id: &'a str,
    input_tokens: i64,
    output_tokens: i64,
    #[serde(flatten)]
    cost: CostBreakdown,
}

#[derive(Serialize)]
struct MigrationReport<'a, T: Serialize> {
    model_id: &'a str,
    #[serde(flatten)]
    advice: T,
}

/// Load configuration and execute the parsed command.
///
/// Tier overrides are read from the environment (`OPENAI_MODEL_<TIER>`).
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => ModelsConfig::from_file(path)?,
        None => ModelsConfig::load()?,
    };
    let (registry, policies) = config.into_parts()?;
    debug!(models = registry.len(), "Configuration loaded");

    execute(&cli.command, &ModelResolver::new(registry, policies), out)
}

fn execute<O: OverrideSource>(
    command: &Commands,
    resolver: &ModelResolver<O>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = resolver.registry();

    match command {
        Commands::Resolve { tier } => {
            let tiers = match tier {
                Some(tier) => vec![SubscriptionTier::from(*tier)],
                None => SubscriptionTier::iter().collect(),
            };
            let resolutions: Vec<_> = tiers.into_iter().map(|t| resolver.resolve(t)).collect();
            print_json(out, &resolutions)?;
        }

        Commands::Models => {
            print_json(out, &registry.available_models())?;
        }

        Commands::Recommend { use_case } => {
            print_json(out, registry.recommended_model((*use_case).into()))?;
        }

        Commands::Migrate { model_id } => {
            let advice = should_migrate_model(registry, model_id);
            print_json(out, &MigrationReport { model_id, advice })?;
        }

        Commands::Cost {
            tier,
            input,
            output,
        } => {
            let tier = SubscriptionTier::from(*tier);
            let descriptor = resolver.resolve_model(tier);
            let cost = estimate_cost_breakdown(&descriptor, *input, *output)?;
            print_json(
                out,
                &CostReport {
                    tier,
                    model_id: descriptor.model_id(),
                    input_tokens: *input,
                    output_tokens: *output,
                    cost,
                },
            )?;
        }

        Commands::Check => {
            let issues: Vec<String> = registry
                .integrity_issues()
                .iter()
                .map(ToString::to_string)
                .collect();
            print_json(out, &issues)?;
            if !issues.is_empty() {
                return Err(CheckFailed {
                    count: issues.len(),
                }
                .into());
            }
            info!("Registry has no data errors");
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(
    out: &mut impl Write,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
