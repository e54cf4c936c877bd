//! Error types for the MealAppeal model policy library.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Missing or deprecated models are not errors anywhere in the library; they
//! are resolved by substitution. The only fatal conditions are an unknown
//! subscription tier, invalid arguments, and malformed configuration.
//!
//! # Examples
//!
//! ```
//! use mealappeal_error::{MealAppealResult, ModelsError, ModelsErrorKind};
//!
//! fn parse_tier(name: &str) -> MealAppealResult<()> {
//!     Err(ModelsError::new(ModelsErrorKind::InvalidTier(name.to_string())))?
//! }
//!
//! assert!(parse_tier("gold").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod models;

pub use config::ConfigError;
pub use error::{MealAppealError, MealAppealErrorKind, MealAppealResult};
pub use models::{ModelsError, ModelsErrorKind, ModelsResult};
