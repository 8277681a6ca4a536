//! Error types for the term-drift library.
//!
//! All fallible operations return [`TermError`] through the crate-wide
//! [`Result`] alias. Operational problems with the data (a failed query, an
//! empty table, a non-numeric check value) are *not* errors: checks absorb
//! them into an unset outcome and log a diagnostic instead.

use thiserror::Error;

/// The main error type for the term-drift library.
#[derive(Error, Debug)]
pub enum TermError {
    /// A distribution comparison could not be computed from the sample.
    #[error("Distribution comparison failed ({method}): {message}")]
    Comparison {
        /// Name of the statistical method, e.g. "ks" or "chi_square"
        method: String,
        /// Detailed error message
        message: String,
    },

    /// A partition filter template could not be resolved.
    #[error("Template resolution failed for '{template}': {message}")]
    TemplateResolution {
        /// The template that failed to resolve
        template: String,
        /// Detailed error message
        message: String,
    },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Security-related error.
    #[error("Security error: {0}")]
    SecurityError(String),
}

/// A type alias for `Result<T, TermError>`.
///
/// This is the standard `Result` type used throughout term-drift.
pub type Result<T> = std::result::Result<T, TermError>;

impl TermError {
    /// Creates a new comparison error for the given statistical method.
    pub fn comparison(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Comparison {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates a new template resolution error.
    pub fn template_resolution(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateResolution {
            template: template.into(),
            message: message.into(),
        }
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<TermError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            TermError::Internal(inner) => TermError::Internal(format!("{msg}: {inner}")),
            other => TermError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                TermError::Internal(inner) => TermError::Internal(format!("{msg}: {inner}")),
                other => TermError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}
