//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use mealappeal_models::{SubscriptionTier, UseCase};
use std::path::PathBuf;

/// MealAppeal model policy - inspect which AI vision model each subscription tier gets
#[derive(Parser, Debug)]
#[command(name = "mealappeal")]
#[command(about = "Inspect MealAppeal's tier-based AI model selection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Load this configuration file instead of the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the effective model for a tier (all tiers when omitted)
    Resolve {
        /// Subscription tier
        tier: Option<TierArg>,
    },

    /// List models that are not deprecated
    Models,

    /// Show the recommended model for a use case
    Recommend {
        /// What to optimise for
        use_case: UseCaseArg,
    },

    /// Check whether a model id should be replaced
    Migrate {
        /// Model id, e.g. the value of an OPENAI_MODEL_* variable
        model_id: String,
    },

    /// Estimate the cost of one analysis for a tier
    Cost {
        /// Subscription tier
        tier: TierArg,

        /// Prompt and image tokens
        #[arg(long, allow_negative_numbers = true)]
        input: i64,

        /// Response tokens
        #[arg(long, allow_negative_numbers = true)]
        output: i64,
    },

    /// Report registry data errors; exits non-zero when any are found
    Check,
}

/// Subscription tier argument
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum TierArg {
    /// Free tier
    Free,
    /// Monthly premium
    PremiumMonthly,
    /// Yearly premium
    PremiumYearly,
}

impl From<TierArg> for SubscriptionTier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Free => SubscriptionTier::Free,
            TierArg::PremiumMonthly => SubscriptionTier::PremiumMonthly,
            TierArg::PremiumYearly => SubscriptionTier::PremiumYearly,
        }
    }
}

/// Use case argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UseCaseArg {
    /// Best estimates
    Accuracy,
    /// Fastest response
    Speed,
    /// Lowest spend
    Cost,
}

impl From<UseCaseArg> for UseCase {
    fn from(arg: UseCaseArg) -> Self {
        match arg {
            UseCaseArg::Accuracy => UseCase::Accuracy,
            UseCaseArg::Speed => UseCase::Speed,
            UseCaseArg::Cost => UseCase::Cost,
        }
    }
}
