//! Shared error types for the engine

use thiserror::Error;

/// Main error type for metastat operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input. Every violated constraint is
    /// collected before the error is raised, never just the first.
    #[error("Invalid data: {}", violations.join("; "))]
    InvalidData { violations: Vec<String> },

    /// Zero studies or zero comparisons supplied
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid-data error from a list of violations
    pub fn invalid_data(violations: Vec<String>) -> Self {
        Self::InvalidData { violations }
    }

    /// Create an insufficient-data error
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// The collected violations, when this is an invalid-data error
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            Self::InvalidData { violations } => Some(violations),
            _ => None,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
