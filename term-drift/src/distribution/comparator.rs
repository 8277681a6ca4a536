//! The statistical comparison seam and the built-in comparator.

use super::stats::{chi_square_goodness_of_fit, ks_two_sample};
use super::{DistributionCheckConfig, ReferenceDistribution};
use crate::prelude::*;
use datafusion::scalar::ScalarValue;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, instrument};

/// The result of comparing an observed sample with a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The test statistic
    pub statistic: f64,
    /// The significance of the difference; small values indicate drift
    pub p_value: f64,
}

/// Compares an observed sample against the configured reference.
///
/// Errors (empty or malformed samples) propagate to the caller of the check.
pub trait DistributionComparator: Debug + Send + Sync {
    /// Returns the statistic and p-value for `sample`.
    fn compare(
        &self,
        config: &DistributionCheckConfig,
        sample: &[ScalarValue],
    ) -> Result<Comparison>;
}

/// Compares samples with the test implied by the reference kind.
///
/// Continuous references use the two-sample Kolmogorov-Smirnov test and
/// categorical references use Pearson's chi-square test. Null sample values
/// are dropped before testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceComparator;

impl ReferenceComparator {
    /// Creates a new comparator.
    pub fn new() -> Self {
        Self
    }
}

impl DistributionComparator for ReferenceComparator {
    #[instrument(skip_all, fields(
        column = %config.column(),
        method = config.reference().method_name(),
        sample.size = sample.len()
    ))]
    fn compare(
        &self,
        config: &DistributionCheckConfig,
        sample: &[ScalarValue],
    ) -> Result<Comparison> {
        let method = config.reference().method_name();
        let (statistic, p_value) = match config.reference() {
            ReferenceDistribution::Continuous { sample: reference } => {
                let observed = numeric_values(sample, method)?;
                if reference.is_empty() {
                    return Err(TermError::comparison(method, "reference sample is empty"));
                }
                ks_two_sample(&observed, reference)
            }
            ReferenceDistribution::Categorical { frequencies } => {
                let observed = categorical_values(sample);
                if observed.is_empty() {
                    return Err(TermError::comparison(
                        method,
                        "sample has no non-null values",
                    ));
                }
                if frequencies.values().all(|f| *f <= 0.0) {
                    return Err(TermError::comparison(
                        method,
                        "reference has no positive frequencies",
                    ));
                }
                chi_square_goodness_of_fit(&observed, frequencies)
            }
        };

        debug!(statistic, p_value, "Distribution comparison computed");
        Ok(Comparison { statistic, p_value })
    }
}

/// Converts non-null scalars to `f64`, rejecting non-numeric values.
fn numeric_values(sample: &[ScalarValue], method: &str) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(sample.len());
    for scalar in sample {
        if scalar.is_null() {
            continue;
        }
        let value = scalar_to_f64(scalar).ok_or_else(|| {
            TermError::comparison(
                method,
                format!(
                    "expected numeric sample values, found {}",
                    scalar.data_type()
                ),
            )
        })?;
        if !value.is_finite() {
            continue;
        }
        values.push(value);
    }

    if values.is_empty() {
        return Err(TermError::comparison(
            method,
            "sample has no non-null numeric values",
        ));
    }
    Ok(values)
}

fn scalar_to_f64(scalar: &ScalarValue) -> Option<f64> {
    match scalar {
        ScalarValue::Float64(Some(v)) => Some(*v),
        ScalarValue::Float32(Some(v)) => Some(f64::from(*v)),
        ScalarValue::Int8(Some(v)) => Some(f64::from(*v)),
        ScalarValue::Int16(Some(v)) => Some(f64::from(*v)),
        ScalarValue::Int32(Some(v)) => Some(f64::from(*v)),
        ScalarValue::Int64(Some(v)) => Some(*v as f64),
        ScalarValue::UInt8(Some(v)) => Some(f64::from(*v)),
        ScalarValue::UInt16(Some(v)) => Some(f64::from(*v)),
        ScalarValue::UInt32(Some(v)) => Some(f64::from(*v)),
        ScalarValue::UInt64(Some(v)) => Some(*v as f64),
        ScalarValue::Decimal128(Some(v), _, scale) => Some(*v as f64 / 10f64.powi(i32::from(*scale))),
        _ => None,
    }
}

/// Renders non-null scalars as category labels.
fn categorical_values(sample: &[ScalarValue]) -> Vec<String> {
    sample
        .iter()
        .filter(|scalar| !scalar.is_null())
        .map(|scalar| match scalar {
            ScalarValue::Utf8(Some(s))
            | ScalarValue::LargeUtf8(Some(s))
            | ScalarValue::Utf8View(Some(s)) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}
