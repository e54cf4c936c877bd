//! Errors raised while loading the model registry and tier policies.

/// A `mealappeal.toml` layer could not be read, parsed or deserialized.
///
/// The message carries the `config` crate's description; `line` and `file`
/// point at the loader that gave up.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What went wrong, including the offending layer when known
    pub message: String,
    /// Loader line
    pub line: u32,
    /// Loader source file
    pub file: &'static str,
}

impl ConfigError {
    /// Records `message` against the calling loader.
    ///
    /// # Examples
    ///
    /// ```
    /// use mealappeal_error::ConfigError;
    ///
    /// let err = ConfigError::new("missing field `premium_yearly` in tiers");
    /// assert!(err.message.contains("premium_yearly"));
    /// assert!(err.to_string().starts_with("Configuration Error: missing field"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: caller.line(),
            file: caller.file(),
        }
    }
}
