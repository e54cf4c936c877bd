//! Configuration for the model registry and tier policies.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from mealappeal.toml)
//! - User overrides (./mealappeal.toml or ~/.config/mealappeal/mealappeal.toml)
//! - Automatic merging with user values taking precedence
//!
//! Per-tier model overrides (`OPENAI_MODEL_<TIER>`) are not part of this
//! file-based configuration; the resolver reads them on every call.

use crate::{ModelDescriptor, ModelRegistry, Recommendations, TierPolicyTable};
use config::{Config, File, FileFormat};
use mealappeal_error::{ConfigError, MealAppealError, MealAppealResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../mealappeal.toml");

/// Top-level model configuration.
///
/// # Example
///
/// ```toml
/// default_model = "gpt-4o-mini"
///
/// [[models]]
/// model_id = "gpt-4o-mini"
/// display_name = "GPT-4o mini"
/// max_tokens = 1000
/// temperature = 0.3
/// image_detail = "low"
/// cost_per_million_tokens = { input = 0.15, output = 0.60 }
///
/// [tiers.free]
/// model = "gpt-4o-mini"
/// safe_default = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Registry-wide default, used when nothing better is available
    pub default_model: String,

    /// Every known model
    pub models: Vec<ModelDescriptor>,

    /// Model choice per subscription tier
    pub tiers: TierPolicyTable,

    /// Preferred model per use case
    #[serde(default)]
    pub recommendations: Recommendations,
}

impl ModelsConfig {
    /// Parse the bundled defaults only, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse, which indicates a
    /// packaging bug.
    pub fn bundled() -> MealAppealResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| config_error("Failed to read bundled configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse bundled configuration", e))
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> MealAppealResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                config_error(
                    &format!(
                        "Failed to read configuration from {}",
                        path.as_ref().display()
                    ),
                    e,
                )
            })?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (mealappeal.toml shipped with the library)
    /// 2. User config in home directory (~/.config/mealappeal/mealappeal.toml)
    /// 3. User config in current directory (./mealappeal.toml)
    ///
    /// User config files are optional and will be silently skipped if not found.
    /// A user file that defines `[[models]]` replaces the bundled model list.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mealappeal_models::ModelsConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let (registry, policies) = ModelsConfig::load()?.into_parts()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> MealAppealResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let home_config =
            dirs::home_dir().map(|home| home.join(".config/mealappeal/mealappeal.toml"));
        Self::load_layered(
            home_config
                .into_iter()
                .chain([PathBuf::from("mealappeal.toml")]),
        )
    }

    /// Load the bundled defaults with `user_files` layered on top, later files
    /// taking precedence.
    ///
    /// Tables merge key by key, so a user file only needs the values it
    /// changes. Arrays such as `[[models]]` replace the earlier value whole.
    /// Files that do not exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed or the merged
    /// configuration is incomplete.
    pub fn load_layered(
        user_files: impl IntoIterator<Item = impl AsRef<Path>>,
    ) -> MealAppealResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        for path in user_files {
            let path = path.as_ref();
            debug!(path = %path.display(), "Adding optional configuration layer");
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Validate and split into the registry and tier policy table the
    /// resolver is built from.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegistry` if the model list cannot back a resolver.
    pub fn into_parts(self) -> MealAppealResult<(ModelRegistry, TierPolicyTable)> {
        let registry = ModelRegistry::new(self.models, self.default_model)?
            .with_recommendations(self.recommendations);
        Ok((registry, self.tiers))
    }
}

impl ModelRegistry {
    /// Registry from the bundled configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled configuration is malformed.
    pub fn builtin() -> MealAppealResult<Self> {
        Ok(ModelsConfig::bundled()?.into_parts()?.0)
    }
}

impl TierPolicyTable {
    /// Tier policies from the bundled configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled configuration is malformed.
    pub fn builtin() -> MealAppealResult<Self> {
        Ok(ModelsConfig::bundled()?.tiers)
    }
}

#[track_caller]
fn config_error(context: &str, err: config::ConfigError) -> MealAppealError {
    MealAppealError::from(ConfigError::new(format!("{}: {}", context, err)))
}
