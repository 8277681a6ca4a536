//! The distribution check: sample a column, compare, classify.

use super::comparator::{Comparison, DistributionComparator, ReferenceComparator};
use super::diagnostics::{CloudDiagnostics, LogDiagnostics, ThresholdDiagnostics};
use super::DistributionCheckConfig;
use crate::core::{
    CheckLocation, CheckOutcome, CheckValue, EvaluationInputs, ScanCheck, ScanContext,
    ThresholdEvaluator,
};
use crate::prelude::*;
use crate::query::{QueryBuilder, QueryExecutor, QueryResult, TemplateResolver, VariableResolver};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Name under which the sample query is submitted to the executor.
pub const VALUES_QUERY_NAME: &str = "get_values_for_distro_check";

/// Compares the distribution of a column against a reference distribution.
///
/// The check's value is the p-value of the comparison. With thresholds
/// configured, the value is classified into an outcome (fail before warn);
/// without thresholds, the value is reported but not judged.
///
/// A query that fails or returns no rows leaves value and outcome unset and
/// is not an error. A failed comparison is.
///
/// # Examples
///
/// ```rust,no_run
/// use datafusion::prelude::*;
/// use term_drift::core::{EvaluationInputs, ScanCheck, ScanContext, ThresholdPredicate};
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
/// let mut check = DistributionCheck::new(config);
/// let executor = DataFusionExecutor::new(ctx);
/// check
///     .evaluate(&ScanContext::new(), &executor, &EvaluationInputs::new())
///     .await?;
/// println!("{:?} {:?}", check.value(), check.outcome());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DistributionCheck {
    name: String,
    config: DistributionCheckConfig,
    comparator: Arc<dyn DistributionComparator>,
    resolver: Arc<dyn TemplateResolver>,
    query: Option<QueryResult>,
    comparison: Option<Comparison>,
    sample_size: Option<usize>,
    value: Option<CheckValue>,
    outcome: Option<CheckOutcome>,
}

impl DistributionCheck {
    /// Creates a check using the built-in comparator and `${ var }` resolver.
    pub fn new(config: DistributionCheckConfig) -> Self {
        Self {
            name: config.name(),
            config,
            comparator: Arc::new(ReferenceComparator::new()),
            resolver: Arc::new(VariableResolver),
            query: None,
            comparison: None,
            sample_size: None,
            value: None,
            outcome: None,
        }
    }

    /// Replaces the statistical comparator.
    pub fn with_comparator(mut self, comparator: Arc<dyn DistributionComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Replaces the partition filter resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn TemplateResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DistributionCheckConfig {
        &self.config
    }

    /// Returns the last executed sample query.
    pub fn query(&self) -> Option<&QueryResult> {
        self.query.as_ref()
    }

    /// Returns the full comparison of the last evaluation.
    pub fn comparison(&self) -> Option<Comparison> {
        self.comparison
    }

    /// Builds the sample query for this check.
    pub fn values_query(&self, ctx: &ScanContext) -> Result<String> {
        let partition = self.config.partition();
        QueryBuilder::new(self.resolver.as_ref(), ctx).build_values_query(
            self.config.column(),
            &partition.table_name,
            partition.filter.as_deref(),
            self.config.sample_limit(),
        )
    }

    /// Classifies the current value against the configured thresholds.
    pub fn set_outcome_from_value(&mut self) {
        self.outcome = ThresholdEvaluator::evaluate(
            self.value.as_ref(),
            self.config.warn(),
            self.config.fail(),
            self.config.location(),
        );
    }

    /// Returns the reporting payload for this check.
    pub fn diagnostics(&self) -> CloudDiagnostics {
        CloudDiagnostics {
            value: self.value.clone(),
            fail: self.config.fail().map(ThresholdDiagnostics::from),
            warn: self.config.warn().map(ThresholdDiagnostics::from),
        }
    }

    /// Returns the check state for log output.
    pub fn log_report(&self) -> LogDiagnostics {
        let partition = self.config.partition();
        LogDiagnostics {
            name: self.name.clone(),
            column: self.config.column().to_string(),
            table: partition.table_name.clone(),
            partition_filter: partition.filter.clone(),
            location: self.config.location().to_string(),
            method: self.config.reference().method_name().to_string(),
            outcome: self.outcome,
            value: self.value.clone(),
            statistic: self.comparison.map(|c| c.statistic),
            sample_size: self.sample_size,
            query: self.query.as_ref().map(|q| q.sql().to_string()),
            query_error: self
                .query
                .as_ref()
                .and_then(|q| q.error().map(str::to_string)),
            query_duration_ms: self
                .query
                .as_ref()
                .map(|q| q.duration().as_millis() as u64),
        }
    }

    fn reset(&mut self) {
        self.query = None;
        self.comparison = None;
        self.sample_size = None;
        self.value = None;
        self.outcome = None;
    }
}

#[async_trait]
impl ScanCheck for DistributionCheck {
    #[instrument(skip(self, ctx, executor, _inputs), fields(
        check.name = %self.name,
        column = %self.config.column(),
        table = %self.config.partition().table_name
    ))]
    async fn evaluate(
        &mut self,
        ctx: &ScanContext,
        executor: &dyn QueryExecutor,
        _inputs: &EvaluationInputs,
    ) -> Result<()> {
        self.reset();

        let sql = self.values_query(ctx)?;
        debug!(check.name = %self.name, query.sql = %sql, "Sampling column values");
        let result = executor.execute(VALUES_QUERY_NAME, &sql).await;

        if !result.has_rows() {
            warn!(
                check.name = %self.name,
                query.error = ?result.error(),
                "Distribution check not evaluated: no values returned"
            );
            self.query = Some(result);
            return Ok(());
        }

        let sample = result.first_column_values();
        self.query = Some(result);
        self.sample_size = Some(sample.len());

        let comparison = self.comparator.compare(&self.config, &sample)?;
        self.comparison = Some(comparison);
        self.value = Some(CheckValue::Number(comparison.p_value));
        self.set_outcome_from_value();

        info!(
            check.name = %self.name,
            sample.size = sample.len(),
            comparison.statistic = comparison.statistic,
            comparison.p_value = comparison.p_value,
            check.outcome = ?self.outcome,
            "Distribution check evaluated"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> &CheckLocation {
        self.config.location()
    }

    fn outcome(&self) -> Option<CheckOutcome> {
        self.outcome
    }

    fn value(&self) -> Option<&CheckValue> {
        self.value.as_ref()
    }

    fn cloud_diagnostics(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.diagnostics())?)
    }

    fn log_diagnostics(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.log_report())?)
    }
}
