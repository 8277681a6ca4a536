//! Threshold predicates and the shared outcome classification rule.

use super::{CheckLocation, CheckOutcome, CheckValue};
use crate::prelude::*;
use crate::security::InputValidator;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

/// A rule over up to four numeric bounds that decides whether a value is bad.
///
/// When both a lower bound (`gt`/`gte`) and an upper bound (`lt`/`lte`) are
/// configured and the lower bound lies above the upper bound, the predicate
/// describes a *split zone* and a value is bad if it satisfies any bound.
/// In every other case a value is bad only if it satisfies all configured
/// bounds. A predicate without bounds never judges a value bad.
///
/// # Examples
///
/// ```rust
/// use term_drift::core::ThresholdPredicate;
///
/// // "fail when < 0.05"
/// let fail = ThresholdPredicate::less_than(0.05);
/// assert!(fail.is_bad(0.01));
/// assert!(!fail.is_bad(0.05));
///
/// // "warn when not between 0.1 and 0.9"
/// let warn = ThresholdPredicate::not_between(0.1, 0.9);
/// assert!(warn.is_bad(0.95));
/// assert!(!warn.is_bad(0.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPredicate {
    /// Bad when the value is less than this bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    /// Bad when the value is less than or equal to this bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
    /// Bad when the value is greater than this bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    /// Bad when the value is greater than or equal to this bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
}

impl ThresholdPredicate {
    /// Creates a predicate with no bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bad when `value < bound`.
    pub fn less_than(bound: f64) -> Self {
        Self::new().with_lt(bound)
    }

    /// Bad when `value <= bound`.
    pub fn less_than_or_equal(bound: f64) -> Self {
        Self::new().with_lte(bound)
    }

    /// Bad when `value > bound`.
    pub fn greater_than(bound: f64) -> Self {
        Self::new().with_gt(bound)
    }

    /// Bad when `value >= bound`.
    pub fn greater_than_or_equal(bound: f64) -> Self {
        Self::new().with_gte(bound)
    }

    /// Bad when `min <= value <= max`.
    pub fn between(min: f64, max: f64) -> Self {
        Self::new().with_gte(min).with_lte(max)
    }

    /// Bad when `value < min` or `value > max`.
    pub fn not_between(min: f64, max: f64) -> Self {
        Self::new().with_lt(min).with_gt(max)
    }

    /// Sets the `lt` bound.
    pub fn with_lt(mut self, bound: f64) -> Self {
        self.lt = Some(bound);
        self
    }

    /// Sets the `lte` bound.
    pub fn with_lte(mut self, bound: f64) -> Self {
        self.lte = Some(bound);
        self
    }

    /// Sets the `gt` bound.
    pub fn with_gt(mut self, bound: f64) -> Self {
        self.gt = Some(bound);
        self
    }

    /// Sets the `gte` bound.
    pub fn with_gte(mut self, bound: f64) -> Self {
        self.gte = Some(bound);
        self
    }

    /// Returns true if no bound is configured.
    pub fn is_empty(&self) -> bool {
        self.lt.is_none() && self.lte.is_none() && self.gt.is_none() && self.gte.is_none()
    }

    /// Validates that every configured bound is finite.
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            ("lt", self.lt),
            ("lte", self.lte),
            ("gt", self.gt),
            ("gte", self.gte),
        ];
        for (name, bound) in bounds {
            if let Some(bound) = bound {
                InputValidator::validate_threshold(bound, name)?;
            }
        }
        Ok(())
    }

    /// Returns true if the lower bound lies above the upper bound.
    pub fn is_split_zone(&self) -> bool {
        match (self.gt.or(self.gte), self.lt.or(self.lte)) {
            (Some(lower), Some(upper)) => lower > upper,
            _ => false,
        }
    }

    /// Decides whether `value` is bad according to this predicate.
    pub fn is_bad(&self, value: f64) -> bool {
        if self.is_empty() {
            return false;
        }

        if self.is_split_zone() {
            self.lt.is_some_and(|b| value < b)
                || self.lte.is_some_and(|b| value <= b)
                || self.gt.is_some_and(|b| value > b)
                || self.gte.is_some_and(|b| value >= b)
        } else {
            self.lt.map_or(true, |b| value < b)
                && self.lte.map_or(true, |b| value <= b)
                && self.gt.map_or(true, |b| value > b)
                && self.gte.map_or(true, |b| value >= b)
        }
    }
}

impl fmt::Display for ThresholdPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(b) = self.lt {
            parts.push(format!("< {b}"));
        }
        if let Some(b) = self.lte {
            parts.push(format!("<= {b}"));
        }
        if let Some(b) = self.gt {
            parts.push(format!("> {b}"));
        }
        if let Some(b) = self.gte {
            parts.push(format!(">= {b}"));
        }

        if parts.is_empty() {
            return f.write_str("never");
        }
        let joiner = if self.is_split_zone() { " or " } else { " and " };
        write!(f, "when {}", parts.join(joiner))
    }
}

/// Classifies a check value against optional warn and fail predicates.
///
/// Stateless and shared by every check variant. Fail is tested before warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    /// Returns the outcome for `value`, or `None` when no verdict is made.
    ///
    /// No verdict is made when the value is unset, when neither threshold is
    /// configured, or when the value is not numeric. The last case logs one
    /// error naming `location`.
    pub fn evaluate(
        value: Option<&CheckValue>,
        warn: Option<&ThresholdPredicate>,
        fail: Option<&ThresholdPredicate>,
        location: &CheckLocation,
    ) -> Option<CheckOutcome> {
        let value = value?;
        if warn.is_none() && fail.is_none() {
            debug!(
                check.location = %location,
                "No thresholds configured, check value is reported without an outcome"
            );
            return None;
        }

        let Some(number) = value.as_number() else {
            error!(
                check.location = %location,
                check.value = %value,
                "Cannot evaluate check: Expected a numeric value, but was {value}"
            );
            return None;
        };

        let outcome = if fail.is_some_and(|t| t.is_bad(number)) {
            CheckOutcome::Fail
        } else if warn.is_some_and(|t| t.is_bad(number)) {
            CheckOutcome::Warn
        } else {
            CheckOutcome::Pass
        };
        Some(outcome)
    }
}
