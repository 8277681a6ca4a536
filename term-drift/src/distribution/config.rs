//! Configuration of a distribution check.

use super::ReferenceDistribution;
use crate::core::{CheckLocation, ThresholdPredicate};
use crate::prelude::*;
use crate::query::DEFAULT_ROW_LIMIT;
use crate::security::{InputValidator, SqlSecurity, MAX_FILTER_LENGTH};
use serde::{Deserialize, Serialize};

/// The table, and optionally the subset of its rows, a check samples from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Fully qualified table name
    pub table_name: String,
    /// Boolean filter template selecting the partition's rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Partition {
    /// A partition covering the whole table.
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            filter: None,
        }
    }

    /// Restricts the partition with a filter template.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

fn default_sample_limit() -> Option<u64> {
    Some(DEFAULT_ROW_LIMIT)
}

/// Immutable configuration of a distribution check.
///
/// Built with [`DistributionCheckConfig::builder`] or loaded from JSON with
/// [`DistributionCheckConfig::from_json`]; both validate identifiers and
/// threshold bounds.
///
/// # Examples
///
/// ```rust
/// use term_drift::core::ThresholdPredicate;
/// use term_drift::distribution::{DistributionCheckConfig, ReferenceDistribution};
///
/// # fn example() -> term_drift::prelude::Result<()> {
/// let config = DistributionCheckConfig::builder()
///     .column("amount")
///     .table("orders")
///     .reference(ReferenceDistribution::continuous(vec![10.0, 12.5, 9.0]))
///     .fail(ThresholdPredicate::less_than(0.05))
///     .warn(ThresholdPredicate::less_than(0.10))
///     .build()?;
///
/// assert_eq!(config.name(), "distribution_difference(amount)");
/// assert_eq!(config.sample_limit(), Some(1_000_000));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionCheckConfig {
    #[serde(default)]
    name: Option<String>,
    column: String,
    partition: Partition,
    reference: ReferenceDistribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warn: Option<ThresholdPredicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fail: Option<ThresholdPredicate>,
    #[serde(default)]
    location: CheckLocation,
    #[serde(default = "default_sample_limit")]
    sample_limit: Option<u64>,
}

impl DistributionCheckConfig {
    /// Creates a new builder.
    pub fn builder() -> DistributionCheckConfigBuilder {
        DistributionCheckConfigBuilder::default()
    }

    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        SqlSecurity::validate_identifier(&self.column)?;
        SqlSecurity::validate_identifier(&self.partition.table_name)?;
        if let Some(filter) = &self.partition.filter {
            InputValidator::validate_no_null_bytes(filter, "Partition filter")?;
            InputValidator::validate_string_length(filter, MAX_FILTER_LENGTH, "Partition filter")?;
        }
        self.reference.validate()?;
        for threshold in [&self.warn, &self.fail].into_iter().flatten() {
            threshold.validate()?;
            if threshold.is_empty() {
                return Err(TermError::Configuration(
                    "Threshold must configure at least one bound".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Returns the check name, defaulting to `distribution_difference(<column>)`.
    pub fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("distribution_difference({})", self.column))
    }

    /// Returns the sampled column.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the sampled partition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Returns the reference distribution.
    pub fn reference(&self) -> &ReferenceDistribution {
        &self.reference
    }

    /// Returns the warn threshold, if configured.
    pub fn warn(&self) -> Option<&ThresholdPredicate> {
        self.warn.as_ref()
    }

    /// Returns the fail threshold, if configured.
    pub fn fail(&self) -> Option<&ThresholdPredicate> {
        self.fail.as_ref()
    }

    /// Returns true if at least one threshold is configured.
    pub fn has_thresholds(&self) -> bool {
        self.warn.is_some() || self.fail.is_some()
    }

    /// Returns where the check was declared.
    pub fn location(&self) -> &CheckLocation {
        &self.location
    }

    /// Returns the maximum number of sampled rows, `None` for unbounded.
    pub fn sample_limit(&self) -> Option<u64> {
        self.sample_limit
    }
}

/// Builder for [`DistributionCheckConfig`].
#[derive(Debug, Clone)]
pub struct DistributionCheckConfigBuilder {
    name: Option<String>,
    column: Option<String>,
    table: Option<String>,
    filter: Option<String>,
    reference: Option<ReferenceDistribution>,
    warn: Option<ThresholdPredicate>,
    fail: Option<ThresholdPredicate>,
    location: CheckLocation,
    sample_limit: Option<u64>,
}

impl Default for DistributionCheckConfigBuilder {
    fn default() -> Self {
        Self {
            name: None,
            column: None,
            table: None,
            filter: None,
            reference: None,
            warn: None,
            fail: None,
            location: CheckLocation::unknown(),
            sample_limit: default_sample_limit(),
        }
    }
}

impl DistributionCheckConfigBuilder {
    /// Sets an explicit check name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the column to sample.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Sets the fully qualified table to sample.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Restricts the sample to rows matching a filter template.
    pub fn partition_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets table and filter from a [`Partition`].
    pub fn partition(mut self, partition: Partition) -> Self {
        self.table = Some(partition.table_name);
        self.filter = partition.filter;
        self
    }

    /// Sets the reference distribution.
    pub fn reference(mut self, reference: ReferenceDistribution) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Sets the warn threshold.
    pub fn warn(mut self, threshold: ThresholdPredicate) -> Self {
        self.warn = Some(threshold);
        self
    }

    /// Sets the fail threshold.
    pub fn fail(mut self, threshold: ThresholdPredicate) -> Self {
        self.fail = Some(threshold);
        self
    }

    /// Sets the declaration site used in log messages.
    pub fn location(mut self, location: CheckLocation) -> Self {
        self.location = location;
        self
    }

    /// Caps the number of sampled rows.
    pub fn sample_limit(mut self, limit: u64) -> Self {
        self.sample_limit = Some(limit);
        self
    }

    /// Samples every matching row.
    pub fn unbounded_sample(mut self) -> Self {
        self.sample_limit = None;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the column, table or reference is missing, if an
    /// identifier is invalid, or if a threshold has no or non-finite bounds.
    pub fn build(self) -> Result<DistributionCheckConfig> {
        let column = self
            .column
            .ok_or_else(|| TermError::Configuration("Distribution check requires a column".into()))?;
        let table = self
            .table
            .ok_or_else(|| TermError::Configuration("Distribution check requires a table".into()))?;
        let reference = self.reference.ok_or_else(|| {
            TermError::Configuration("Distribution check requires a reference distribution".into())
        })?;

        let config = DistributionCheckConfig {
            name: self.name,
            column,
            partition: Partition {
                table_name: table,
                filter: self.filter,
            },
            reference,
            warn: self.warn,
            fail: self.fail,
            location: self.location,
            sample_limit: self.sample_limit,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceDistribution {
        ReferenceDistribution::continuous(vec![1.0, 2.0, 3.0])
    }

    #[test]
    fn test_builder_defaults() {
        let config = DistributionCheckConfig::builder()
            .column("amount")
            .table("orders")
            .reference(reference())
            .build()
            .unwrap();

        assert_eq!(config.column(), "amount");
        assert_eq!(config.partition(), &Partition::table("orders"));
        assert_eq!(config.sample_limit(), Some(DEFAULT_ROW_LIMIT));
        assert!(!config.has_thresholds());
        assert_eq!(config.location(), &CheckLocation::unknown());
    }

    #[test]
    fn test_builder_requires_fields() {
        let missing_column = DistributionCheckConfig::builder()
            .table("orders")
            .reference(reference())
            .build();
        assert!(matches!(missing_column, Err(TermError::Configuration(_))));

        let missing_reference = DistributionCheckConfig::builder()
            .column("amount")
            .table("orders")
            .build();
        assert!(missing_reference
            .unwrap_err()
            .to_string()
            .contains("reference distribution"));
    }

    #[test]
    fn test_builder_rejects_invalid_identifiers() {
        let result = DistributionCheckConfig::builder()
            .column("amount; DROP TABLE orders")
            .table("orders")
            .reference(reference())
            .build();
        assert!(matches!(result, Err(TermError::SecurityError(_))));
    }

    #[test]
    fn test_builder_accepts_audit_column_names() {
        for column in ["created_at", "updated_at", "deleted_at", "resp_time_ms", "exp_date"] {
            let config = DistributionCheckConfig::builder()
                .column(column)
                .table("user_updates")
                .reference(reference())
                .build()
                .unwrap();
            assert_eq!(config.column(), column);
        }

        let json = r#"{
            "column": "selected_plan",
            "partition": {"table_name": "user_updates"},
            "reference": {"method": "ks", "sample": [1.0, 2.0]}
        }"#;
        assert!(DistributionCheckConfig::from_json(json).is_ok());
    }

    #[test]
    fn test_builder_rejects_empty_threshold() {
        let result = DistributionCheckConfig::builder()
            .column("amount")
            .table("orders")
            .reference(reference())
            .warn(ThresholdPredicate::new())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_partition_and_limit() {
        let config = DistributionCheckConfig::builder()
            .name("amount drift")
            .column("amount")
            .partition(Partition::table("sales.orders").with_filter("region = 'eu'"))
            .reference(reference())
            .unbounded_sample()
            .build()
            .unwrap();

        assert_eq!(config.name(), "amount drift");
        assert_eq!(config.partition().filter.as_deref(), Some("region = 'eu'"));
        assert_eq!(config.sample_limit(), None);
    }

    #[test]
    fn test_from_json() {
        let config = DistributionCheckConfig::from_json(
            r#"{
                "column": "amount",
                "partition": {"table_name": "orders", "filter": "day = '${ day }'"},
                "reference": {"method": "ks", "sample": [1.0, 2.0]},
                "fail": {"lt": 0.05},
                "location": {"file_path": "checks.json", "line": 4, "col": 9}
            }"#,
        )
        .unwrap();

        assert_eq!(config.fail(), Some(&ThresholdPredicate::less_than(0.05)));
        assert_eq!(config.warn(), None);
        assert_eq!(config.sample_limit(), Some(DEFAULT_ROW_LIMIT));
        assert_eq!(config.location().to_string(), "checks.json:4:9");
    }

    #[test]
    fn test_from_json_validates() {
        let result = DistributionCheckConfig::from_json(
            r#"{
                "column": "amount",
                "partition": {"table_name": "orders"},
                "reference": {"method": "ks", "sample": []}
            }"#,
        );
        assert!(matches!(result, Err(TermError::Configuration(_))));
    }
}
