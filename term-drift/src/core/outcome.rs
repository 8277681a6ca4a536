//! Check outcomes and check values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The verdict of a check evaluation.
///
/// A check that has not reached a verdict (never evaluated, aborted, or
/// configured without thresholds) carries `None` instead of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    /// The check value is acceptable
    Pass,
    /// The check value matched the warn threshold
    Warn,
    /// The check value matched the fail threshold
    Fail,
}

impl CheckOutcome {
    /// Returns true if this is a Pass outcome.
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass)
    }

    /// Returns true if this is a Warn outcome.
    pub fn is_warn(&self) -> bool {
        matches!(self, CheckOutcome::Warn)
    }

    /// Returns true if this is a Fail outcome.
    pub fn is_fail(&self) -> bool {
        matches!(self, CheckOutcome::Fail)
    }

    /// Returns the lowercase name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::Pass => "pass",
            CheckOutcome::Warn => "warn",
            CheckOutcome::Fail => "fail",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scalar a check computes and classifies.
///
/// Comparators produce numbers, but the shared threshold machinery accepts
/// any scalar so it can detect and report values it cannot classify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    /// A numeric value such as a p-value
    Number(f64),
    /// A boolean value
    Boolean(bool),
    /// A textual value
    Text(String),
}

impl CheckValue {
    /// Returns the numeric value, or `None` when the value cannot be compared
    /// against numeric bounds. NaN is not a usable number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CheckValue::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Returns true if [`as_number`](Self::as_number) would succeed.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }
}

impl From<f64> for CheckValue {
    fn from(value: f64) -> Self {
        CheckValue::Number(value)
    }
}

impl From<bool> for CheckValue {
    fn from(value: bool) -> Self {
        CheckValue::Boolean(value)
    }
}

impl From<String> for CheckValue {
    fn from(value: String) -> Self {
        CheckValue::Text(value)
    }
}

impl From<&str> for CheckValue {
    fn from(value: &str) -> Self {
        CheckValue::Text(value.to_string())
    }
}

impl fmt::Display for CheckValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckValue::Number(v) => write!(f, "{v}"),
            CheckValue::Boolean(v) => write!(f, "{v}"),
            CheckValue::Text(v) => write!(f, "'{v}'"),
        }
    }
}
