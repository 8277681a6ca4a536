//! Input hardening for values that end up in generated SQL.
//!
//! Column and table names are interpolated into sample queries verbatim, so
//! they are checked against a strict identifier grammar, and no dot-separated
//! part may be a bare statement keyword.

use crate::error::{Result, TermError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest accepted identifier, in bytes.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Longest accepted partition filter, in bytes.
pub const MAX_FILTER_LENGTH: usize = 5000;

/// Validation of SQL identifiers.
pub struct SqlSecurity;

impl SqlSecurity {
    /// Validates a column or (optionally qualified) table name.
    ///
    /// # Examples
    /// ```rust
    /// use term_drift::security::SqlSecurity;
    ///
    /// assert!(SqlSecurity::validate_identifier("amount").is_ok());
    /// assert!(SqlSecurity::validate_identifier("sales.orders").is_ok());
    ///
    /// assert!(SqlSecurity::validate_identifier("amount; DROP TABLE orders").is_err());
    /// assert!(SqlSecurity::validate_identifier(&"col_".repeat(100)).is_err());
    /// ```
    pub fn validate_identifier(identifier: &str) -> Result<()> {
        if identifier.trim().is_empty() {
            return Err(TermError::SecurityError(
                "SQL identifier cannot be empty or whitespace-only".to_string(),
            ));
        }

        if identifier.len() > MAX_IDENTIFIER_LENGTH {
            return Err(TermError::SecurityError(format!(
                "SQL identifier too long (max {MAX_IDENTIFIER_LENGTH} characters)"
            )));
        }

        InputValidator::validate_no_null_bytes(identifier, "SQL identifier")?;

        static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::expect_used)]
            Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*$")
                .expect("Hard-coded regex pattern should be valid")
        });

        if !IDENTIFIER_REGEX.is_match(identifier) {
            return Err(TermError::SecurityError(format!(
                "Invalid SQL identifier format: '{identifier}'. Identifiers must start with a letter or underscore and contain only letters, numbers, underscores, and dots"
            )));
        }

        Self::check_reserved_segments(identifier)
    }

    /// Whole segments only: `updated_at` is a column, `update` is not.
    fn check_reserved_segments(identifier: &str) -> Result<()> {
        const RESERVED_KEYWORDS: &[&str] = &[
            "union", "select", "insert", "update", "delete", "drop", "create", "alter", "exec",
            "declare", "cursor", "fetch",
        ];

        match identifier.split('.').find(|segment| {
            RESERVED_KEYWORDS
                .iter()
                .any(|keyword| segment.eq_ignore_ascii_case(keyword))
        }) {
            Some(segment) => Err(TermError::SecurityError(format!(
                "SQL identifier segment '{segment}' is a reserved keyword"
            ))),
            None => Ok(()),
        }
    }
}

/// Validation of numeric and free-text configuration values.
pub struct InputValidator;

impl InputValidator {
    /// Rejects NaN and infinite values.
    pub fn validate_threshold(value: f64, name: &str) -> Result<()> {
        if !value.is_finite() {
            return Err(TermError::SecurityError(format!(
                "Invalid {name} value: must be finite (not NaN or infinite)"
            )));
        }
        Ok(())
    }

    /// Rejects strings longer than `max_length` bytes.
    pub fn validate_string_length(value: &str, max_length: usize, name: &str) -> Result<()> {
        if value.len() > max_length {
            return Err(TermError::SecurityError(format!(
                "{name} too long: {} characters (max {max_length})",
                value.len()
            )));
        }
        Ok(())
    }

    /// Rejects strings containing null bytes.
    pub fn validate_no_null_bytes(value: &str, name: &str) -> Result<()> {
        if value.contains('\0') {
            return Err(TermError::SecurityError(format!(
                "{name} cannot contain null bytes"
            )));
        }
        Ok(())
    }
}
