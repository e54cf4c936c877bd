//! Top-level error wrapper types.

use crate::{ConfigError, ModelsError};

/// Every error the MealAppeal crates can surface.
///
/// # Examples
///
/// ```
/// use mealappeal_error::{ConfigError, MealAppealError};
///
/// let err: MealAppealError = ConfigError::new("unreadable file").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MealAppealErrorKind {
    /// Model policy error (invalid tier, invalid argument, invalid registry)
    #[from(ModelsError)]
    Models(ModelsError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// MealAppeal error with kind discrimination.
///
/// # Examples
///
/// ```
/// use mealappeal_error::{ConfigError, MealAppealResult};
///
/// fn might_fail() -> MealAppealResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("MealAppeal Error: {}", _0)]
pub struct MealAppealError(Box<MealAppealErrorKind>);

impl MealAppealError {
    /// Create a new error from a kind.
    pub fn new(kind: MealAppealErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MealAppealErrorKind {
        &self.0
    }
}

impl<T> From<T> for MealAppealError
where
    T: Into<MealAppealErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for MealAppeal operations.
pub type MealAppealResult<T> = std::result::Result<T, MealAppealError>;
