//! Integration tests for structured logging of distribution checks.

use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use datafusion::scalar::ScalarValue;
use std::sync::Arc;
use term_drift::core::{
    CheckLocation, EvaluationInputs, Scan, ScanCheck, ScanContext, ThresholdPredicate,
};
use term_drift::distribution::{
    Comparison, DistributionCheck, DistributionCheckConfig, DistributionComparator,
    ReferenceDistribution,
};
use term_drift::prelude::{LogConfig, Result};
use term_drift::query::DataFusionExecutor;

/// Test helper to capture structured logs
struct LogCapture {
    logs: Arc<std::sync::Mutex<Vec<String>>>,
}

impl LogCapture {
    fn new() -> Self {
        Self {
            logs: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    fn captured_logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let s = String::from_utf8_lossy(buf).to_string();
        self.logs.lock().unwrap().push(s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn json_subscriber(capture: &LogCapture) -> impl tracing::Subscriber + Send + Sync {
    let logs = capture.logs.clone();
    tracing_subscriber::fmt()
        .json()
        .with_writer(move || LogCapture { logs: logs.clone() })
        .with_env_filter("info,term_drift=debug")
        .finish()
}

fn create_test_context() -> SessionContext {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "amount",
        DataType::Float64,
        true,
    )]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0]))],
    )
    .unwrap();
    let ctx = SessionContext::new();
    let provider = MemTable::try_new(schema, vec![vec![batch]]).unwrap();
    ctx.register_table("orders", Arc::new(provider)).unwrap();
    ctx
}

/// A comparator whose p-value is not a number.
#[derive(Debug)]
struct UndefinedComparator;

impl DistributionComparator for UndefinedComparator {
    fn compare(
        &self,
        _config: &DistributionCheckConfig,
        _sample: &[ScalarValue],
    ) -> Result<Comparison> {
        Ok(Comparison {
            statistic: f64::NAN,
            p_value: f64::NAN,
        })
    }
}

fn levels(logs: &[String], level: &str) -> Vec<String> {
    let needle = format!("\"level\":\"{level}\"");
    logs.iter().filter(|l| l.contains(&needle)).cloned().collect()
}

#[tokio::test]
async fn test_non_numeric_value_logs_one_error() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(json_subscriber(&capture));

    let config = DistributionCheckConfig::builder()
        .column("amount")
        .table("orders")
        .reference(ReferenceDistribution::continuous(vec![1.0, 2.0, 3.0]))
        .fail(ThresholdPredicate::less_than(0.05))
        .location(CheckLocation::new("checks/orders.json", 12, 4))
        .build()
        .unwrap();
    let mut check =
        DistributionCheck::new(config).with_comparator(Arc::new(UndefinedComparator));
    let executor = DataFusionExecutor::new(create_test_context());

    check
        .evaluate(&ScanContext::new(), &executor, &EvaluationInputs::new())
        .await
        .unwrap();

    assert_eq!(check.outcome(), None);

    let logs = capture.captured_logs();
    let errors = levels(&logs, "ERROR");
    assert_eq!(errors.len(), 1, "expected exactly one error, got {errors:?}");
    assert!(errors[0].contains("Expected a numeric value, but was NaN"));
    assert!(errors[0].contains("checks/orders.json:12:4"));
}

#[tokio::test]
async fn test_soft_abort_logs_warning() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(json_subscriber(&capture));

    let config = DistributionCheckConfig::builder()
        .column("amount")
        .table("orders")
        .partition_filter("amount > 100")
        .reference(ReferenceDistribution::continuous(vec![1.0, 2.0, 3.0]))
        .fail(ThresholdPredicate::less_than(0.05))
        .build()
        .unwrap();
    let mut check = DistributionCheck::new(config);
    let executor = DataFusionExecutor::new(create_test_context());

    check
        .evaluate(&ScanContext::new(), &executor, &EvaluationInputs::new())
        .await
        .unwrap();

    let logs = capture.captured_logs();
    let warnings = levels(&logs, "WARN");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("no values returned"));
    assert!(warnings[0].contains("distribution_difference(amount)"));
    assert!(levels(&logs, "ERROR").is_empty());
}

#[tokio::test]
async fn test_evaluation_logs_structured_fields() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(json_subscriber(&capture));

    let config = DistributionCheckConfig::builder()
        .column("amount")
        .table("orders")
        .reference(ReferenceDistribution::continuous(vec![1.0, 2.0, 3.0]))
        .fail(ThresholdPredicate::less_than(0.05))
        .build()
        .unwrap();
    let mut check = DistributionCheck::new(config);
    let executor = DataFusionExecutor::new(create_test_context());

    check
        .evaluate(&ScanContext::new(), &executor, &EvaluationInputs::new())
        .await
        .unwrap();

    let logs = capture.captured_logs().join("");
    assert!(logs.contains("Distribution check evaluated"));
    assert!(logs.contains("\"sample.size\":3"));
    assert!(logs.contains("\"comparison.p_value\":1.0"));
    assert!(logs.contains("get_values_for_distro_check"));
}

fn scan_with(log_config: LogConfig) -> Scan {
    let config = DistributionCheckConfig::builder()
        .column("amount")
        .table("orders")
        .reference(ReferenceDistribution::continuous(vec![1.0, 2.0, 3.0]))
        .fail(ThresholdPredicate::less_than(0.05))
        .build()
        .unwrap();
    Scan::builder("nightly")
        .log_config(log_config)
        .check(DistributionCheck::new(config))
        .build()
}

#[tokio::test]
async fn test_production_log_config_keeps_only_summary() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(json_subscriber(&capture));

    let mut scan = scan_with(LogConfig::production());
    let report = scan.run(&DataFusionExecutor::new(create_test_context())).await;
    assert_eq!(report.metrics.passed, 1);

    let logs = capture.captured_logs().join("");
    assert!(!logs.contains("\"message\":\"Starting scan\""));
    assert!(!logs.contains("\"message\":\"Check evaluated\""));
    assert!(logs.contains("\"message\":\"Scan completed\""));
}

#[tokio::test]
async fn test_default_log_config_reports_each_check() {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(json_subscriber(&capture));

    let mut scan = scan_with(LogConfig::default());
    scan.run(&DataFusionExecutor::new(create_test_context())).await;

    let logs = capture.captured_logs().join("");
    assert!(logs.contains("\"message\":\"Starting scan\""));
    assert!(logs.contains("\"message\":\"Check evaluated\""));
    assert!(logs.contains("\"message\":\"Scan completed\""));
}
