//! The common contract every check variant implements.

use super::{CheckOutcome, CheckValue, ScanContext};
use crate::prelude::*;
use crate::query::QueryExecutor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Debug};

/// Where a check was declared, used to point log messages at the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckLocation {
    /// File the check was loaded from
    pub file_path: String,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub col: usize,
}

impl CheckLocation {
    /// Creates a new location.
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }

    /// A location for checks built in code rather than loaded from a file.
    pub fn unknown() -> Self {
        Self::new("<unknown>", 0, 0)
    }
}

impl Default for CheckLocation {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CheckLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.col)
    }
}

/// Values computed earlier in the scan that a check may consult.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInputs {
    /// Metric values computed by the scan, keyed by metric identity
    pub metrics: HashMap<String, f64>,
    /// Values recorded by previous scans, keyed by identity
    pub historic_values: HashMap<String, serde_json::Value>,
}

impl EvaluationInputs {
    /// Creates empty inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a metric value.
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Adds a historic value.
    pub fn with_historic_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.historic_values.insert(name.into(), value.into());
        self
    }
}

/// A check that is evaluated once per scan and reports a value and outcome.
///
/// Implementations own their value/outcome state. `evaluate` either reaches
/// a verdict or leaves the outcome unset; it returns `Err` only for
/// failures the check cannot absorb.
///
/// # Examples
///
/// ```rust,ignore
/// use term_drift::core::{EvaluationInputs, ScanCheck, ScanContext};
/// use term_drift::distribution::DistributionCheck;
///
/// let mut check = DistributionCheck::new(config);
/// check.evaluate(&ScanContext::new(), &executor, &EvaluationInputs::new()).await?;
/// if let Some(outcome) = check.outcome() {
///     println!("{} -> {outcome}", check.name());
/// }
/// ```
#[async_trait]
pub trait ScanCheck: Debug + Send + Sync {
    /// Evaluates the check against the data reachable through `executor`.
    async fn evaluate(
        &mut self,
        ctx: &ScanContext,
        executor: &dyn QueryExecutor,
        inputs: &EvaluationInputs,
    ) -> Result<()>;

    /// Returns the name of the check.
    fn name(&self) -> &str;

    /// Returns where the check was declared.
    fn location(&self) -> &CheckLocation;

    /// Returns the verdict of the last evaluation, if one was reached.
    fn outcome(&self) -> Option<CheckOutcome>;

    /// Returns the value computed by the last evaluation, if any.
    fn value(&self) -> Option<&CheckValue>;

    /// Projects configuration and result state into the reporting payload.
    fn cloud_diagnostics(&self) -> Result<serde_json::Value>;

    /// Projects configuration and result state into a payload for log output.
    fn log_diagnostics(&self) -> Result<serde_json::Value>;
}

/// A boxed check for use in collections.
pub type BoxedCheck = Box<dyn ScanCheck>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let location = CheckLocation::new("checks/orders.json", 12, 7);
        assert_eq!(location.to_string(), "checks/orders.json:12:7");
        assert_eq!(CheckLocation::default().to_string(), "<unknown>:0:0");
    }

    #[test]
    fn test_evaluation_inputs_builder() {
        let inputs = EvaluationInputs::new()
            .with_metric("row_count", 42.0)
            .with_historic_value("last_p_value", 0.3);

        assert_eq!(inputs.metrics.get("row_count"), Some(&42.0));
        assert_eq!(
            inputs.historic_values.get("last_p_value"),
            Some(&serde_json::json!(0.3))
        );
    }
}
