//! MealAppeal model policy CLI.
//!
//! This binary exposes the model resolution policy to operators:
//! - Show which model each subscription tier resolves to
//! - List, recommend and migrate registered models
//! - Estimate per-analysis cost and check registry integrity

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, run};

    // Pick up OPENAI_MODEL_* overrides from a local .env
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    run(&cli, &mut std::io::stdout().lock())?;

    Ok(())
}
