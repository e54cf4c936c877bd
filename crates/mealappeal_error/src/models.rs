//! Model policy errors.

/// Model policy error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelsErrorKind {
    /// Subscription tier outside `free`, `premium_monthly`, `premium_yearly`
    #[display("Invalid tier: {}", _0)]
    InvalidTier(String),

    /// Argument rejected by a pure computation (e.g. negative token counts)
    #[display("Invalid argument: {}", _0)]
    InvalidArgument(String),

    /// Registry contents that cannot back a resolver
    #[display("Invalid registry: {}", _0)]
    InvalidRegistry(String),
}

/// Model policy error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at {}:{}", kind, file, line)]
pub struct ModelsError {
    /// The specific error kind
    pub kind: ModelsErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new models error.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ModelsErrorKind {
        &self.kind
    }
}

impl From<ModelsErrorKind> for ModelsError {
    #[track_caller]
    fn from(kind: ModelsErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for model policy operations.
pub type ModelsResult<T> = Result<T, ModelsError>;
