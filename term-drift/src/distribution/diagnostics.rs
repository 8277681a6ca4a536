//! Transport shapes for distribution check results.

use crate::core::{CheckOutcome, CheckValue, ThresholdPredicate};
use serde::{Deserialize, Serialize};

/// The four bounds of a threshold, always present and `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdDiagnostics {
    pub less_than: Option<f64>,
    pub less_than_or_equal: Option<f64>,
    pub greater_than: Option<f64>,
    pub greater_than_or_equal: Option<f64>,
}

impl From<&ThresholdPredicate> for ThresholdDiagnostics {
    fn from(threshold: &ThresholdPredicate) -> Self {
        Self {
            less_than: threshold.lt,
            less_than_or_equal: threshold.lte,
            greater_than: threshold.gt,
            greater_than_or_equal: threshold.gte,
        }
    }
}

/// The payload uploaded for a distribution check.
///
/// ```json
/// {"value": 0.02, "fail": {"lessThan": 0.05, "lessThanOrEqual": null, ...}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudDiagnostics {
    pub value: Option<CheckValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<ThresholdDiagnostics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn: Option<ThresholdDiagnostics>,
}

/// Check state rendered for log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDiagnostics {
    pub name: String,
    pub column: String,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_filter: Option<String>,
    pub location: String,
    pub method: String,
    pub outcome: Option<CheckOutcome>,
    pub value: Option<CheckValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_threshold_fields_are_camel_case_and_nullable() {
        let diagnostics = ThresholdDiagnostics::from(&ThresholdPredicate::less_than(0.05));
        assert_eq!(
            serde_json::to_value(&diagnostics).unwrap(),
            json!({
                "lessThan": 0.05,
                "lessThanOrEqual": null,
                "greaterThan": null,
                "greaterThanOrEqual": null
            })
        );
    }

    #[test]
    fn test_absent_thresholds_are_omitted() {
        let diagnostics = CloudDiagnostics {
            value: None,
            fail: None,
            warn: None,
        };
        assert_eq!(
            serde_json::to_value(&diagnostics).unwrap(),
            json!({"value": null})
        );
    }
}
