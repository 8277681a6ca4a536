//! Scan runner for organizing and running checks.

use super::{BoxedCheck, CheckOutcome, CheckValue, EvaluationInputs, ScanCheck, ScanContext};
use crate::log_check;
use crate::logging::truncate_field;
use crate::prelude::*;
use crate::query::QueryExecutor;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, instrument, warn, Level};

/// A collection of checks evaluated together against one executor.
///
/// Checks run sequentially in insertion order. A check that returns an error
/// is recorded as an issue and the scan continues with the next check.
///
/// # Examples
///
/// ```rust,no_run
/// use datafusion::prelude::*;
/// use term_drift::core::{Scan, ScanContext, ThresholdPredicate};
/// use term_drift::distribution::{DistributionCheck, DistributionCheckConfig, ReferenceDistribution};
/// use term_drift::query::DataFusionExecutor;
///
/// # async fn example(ctx: SessionContext) -> term_drift::prelude::Result<()> {
/// let config = DistributionCheckConfig::builder()
///     .column("amount")
///     .table("orders")
///     .reference(ReferenceDistribution::continuous(vec![10.0, 11.0, 12.5]))
///     .fail(ThresholdPredicate::less_than(0.05))
///     .build()?;
///
/// let mut scan = Scan::builder("nightly")
///     .context(ScanContext::new().with_data_source_name("warehouse"))
///     .check(DistributionCheck::new(config))
///     .build();
///
/// let report = scan.run(&DataFusionExecutor::new(ctx)).await;
/// if report.has_failures() {
///     for issue in &report.issues {
///         println!("{}: {}", issue.check_name, issue.message);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Scan {
    name: String,
    ctx: ScanContext,
    inputs: EvaluationInputs,
    log_config: LogConfig,
    checks: Vec<BoxedCheck>,
}

impl Scan {
    /// Creates a new builder.
    pub fn builder(name: impl Into<String>) -> ScanBuilder {
        ScanBuilder::new(name)
    }

    /// Returns the name of the scan.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the context checks are evaluated in.
    pub fn context(&self) -> &ScanContext {
        &self.ctx
    }

    /// Returns the checks of this scan.
    pub fn checks(&self) -> &[BoxedCheck] {
        &self.checks
    }

    /// Evaluates every check and summarizes the outcomes.
    #[instrument(skip(self, executor), fields(
        scan.name = %self.name,
        scan.checks = self.checks.len(),
        data_source = %self.ctx.data_source_name()
    ))]
    pub async fn run(&mut self, executor: &dyn QueryExecutor) -> ScanReport {
        if self.log_config.is_enabled(Level::INFO) {
            info!(
                scan.name = %self.name,
                scan.checks = self.checks.len(),
                "Starting scan"
            );
        }
        let start_time = Instant::now();
        let mut report = ScanReport::new(&self.name);

        for check in &mut self.checks {
            log_check!(
                self.log_config,
                check.name = %check.name(),
                check.location = %check.location(),
                "Evaluating check"
            );

            match check.evaluate(&self.ctx, executor, &self.inputs).await {
                Ok(()) => {
                    match check.outcome() {
                        Some(CheckOutcome::Pass) => report.metrics.passed += 1,
                        Some(CheckOutcome::Warn) => {
                            report.metrics.warned += 1;
                            report.add_issue(ScanIssue::from_outcome(&**check));
                        }
                        Some(CheckOutcome::Fail) => {
                            report.metrics.failed += 1;
                            report.add_issue(ScanIssue::from_outcome(&**check));
                        }
                        None => report.metrics.not_evaluated += 1,
                    }
                    if self.log_config.is_enabled(Level::INFO) {
                        info!(
                            check.name = %check.name(),
                            check.outcome = check.outcome().map_or("not evaluated", |o| o.as_str()),
                            check.value = ?check.value(),
                            "Check evaluated"
                        );
                    }
                }
                Err(e) => {
                    report.metrics.errored += 1;
                    error!(
                        check.name = %check.name(),
                        check.location = %check.location(),
                        error = %truncate_field(&e.to_string(), self.log_config.max_field_length),
                        error.type = "check_evaluation",
                        "Error evaluating check"
                    );
                    report.add_issue(ScanIssue {
                        check_name: check.name().to_string(),
                        location: check.location().to_string(),
                        outcome: None,
                        message: format!("Error evaluating check: {e}"),
                    });
                }
            }

            if self.log_config.log_check_details {
                match check.log_diagnostics() {
                    Ok(details) => log_check!(
                        self.log_config,
                        check.name = %check.name(),
                        check.diagnostics = %truncate_field(
                            &details.to_string(),
                            self.log_config.max_field_length
                        ),
                        "Check diagnostics"
                    ),
                    Err(e) => warn!(check.name = %check.name(), error = %e, "Could not render check diagnostics"),
                }
            }

            match check.cloud_diagnostics() {
                Ok(diagnostics) => report.results.push(CheckReport {
                    name: check.name().to_string(),
                    outcome: check.outcome(),
                    value: check.value().cloned(),
                    diagnostics,
                }),
                Err(e) => warn!(
                    check.name = %check.name(),
                    error = %e,
                    "Could not serialize check diagnostics"
                ),
            }
        }

        report.metrics.total = self.checks.len();
        report.metrics.execution_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            scan.name = %self.name,
            metrics.passed = report.metrics.passed,
            metrics.warned = report.metrics.warned,
            metrics.failed = report.metrics.failed,
            metrics.not_evaluated = report.metrics.not_evaluated,
            metrics.errored = report.metrics.errored,
            metrics.duration_ms = report.metrics.execution_time_ms,
            scan.result = %if report.has_failures() { "failed" } else { "passed" },
            "Scan completed"
        );

        report
    }
}

/// Builder for [`Scan`].
#[derive(Debug)]
pub struct ScanBuilder {
    name: String,
    ctx: ScanContext,
    inputs: EvaluationInputs,
    log_config: LogConfig,
    checks: Vec<BoxedCheck>,
}

impl ScanBuilder {
    /// Creates a builder for a scan with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ctx: ScanContext::new(),
            inputs: EvaluationInputs::new(),
            log_config: LogConfig::default(),
            checks: Vec::new(),
        }
    }

    /// Sets the context checks are evaluated in.
    pub fn context(mut self, ctx: ScanContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Sets the metrics and historic values passed to each check.
    pub fn inputs(mut self, inputs: EvaluationInputs) -> Self {
        self.inputs = inputs;
        self
    }

    /// Sets logging verbosity for the run.
    pub fn log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Adds a check.
    pub fn check(mut self, check: impl ScanCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Adds already boxed checks.
    pub fn checks<I>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = BoxedCheck>,
    {
        self.checks.extend(checks);
        self
    }

    /// Builds the scan.
    pub fn build(self) -> Scan {
        Scan {
            name: self.name,
            ctx: self.ctx,
            inputs: self.inputs,
            log_config: self.log_config,
            checks: self.checks,
        }
    }
}

/// Counts of check outcomes in a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMetrics {
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    /// Checks without an outcome: no thresholds, no data or a non-numeric value
    pub not_evaluated: usize,
    pub errored: usize,
    pub execution_time_ms: u64,
}

/// A check that warned, failed or errored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanIssue {
    pub check_name: String,
    pub location: String,
    /// `None` when the check errored
    pub outcome: Option<CheckOutcome>,
    pub message: String,
}

impl ScanIssue {
    fn from_outcome(check: &dyn ScanCheck) -> Self {
        let outcome = check.outcome();
        let value = check
            .value()
            .map_or_else(|| "no value".to_string(), CheckValue::to_string);
        Self {
            check_name: check.name().to_string(),
            location: check.location().to_string(),
            outcome,
            message: format!(
                "Check {} with value {value}",
                outcome.map_or("not evaluated", |o| o.as_str())
            ),
        }
    }
}

/// The state of one check after a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub outcome: Option<CheckOutcome>,
    pub value: Option<CheckValue>,
    pub diagnostics: serde_json::Value,
}

/// Summary of a scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_name: String,
    pub metrics: ScanMetrics,
    pub results: Vec<CheckReport>,
    pub issues: Vec<ScanIssue>,
}

impl ScanReport {
    /// Creates an empty report.
    pub fn new(scan_name: impl Into<String>) -> Self {
        Self {
            scan_name: scan_name.into(),
            metrics: ScanMetrics::default(),
            results: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Records an issue.
    pub fn add_issue(&mut self, issue: ScanIssue) {
        self.issues.push(issue);
    }

    /// Returns true if any check failed or errored.
    pub fn has_failures(&self) -> bool {
        self.metrics.failed > 0 || self.metrics.errored > 0
    }

    /// Returns true if any check warned.
    pub fn has_warnings(&self) -> bool {
        self.metrics.warned > 0
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
