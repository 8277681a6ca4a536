//! Reference distributions that observed samples are compared against.

use crate::prelude::*;
use crate::security::InputValidator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A previously captured reference distribution.
///
/// How the reference was obtained is outside this crate; checks only read
/// it. The variant decides which statistical test the built-in comparator
/// applies.
///
/// ```rust
/// use term_drift::distribution::ReferenceDistribution;
///
/// let reference: ReferenceDistribution =
///     serde_json::from_str(r#"{"method": "ks", "sample": [1.0, 2.0, 3.0]}"#).unwrap();
/// assert_eq!(reference.method_name(), "ks");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum ReferenceDistribution {
    /// A sample of a continuous variable, compared with a two-sample
    /// Kolmogorov-Smirnov test.
    #[serde(rename = "ks")]
    Continuous {
        /// Reference observations
        sample: Vec<f64>,
    },
    /// Relative frequencies of a categorical variable, compared with
    /// Pearson's chi-square goodness-of-fit test.
    #[serde(rename = "chi_square")]
    Categorical {
        /// Category label to relative frequency (need not sum to one)
        frequencies: BTreeMap<String, f64>,
    },
}

impl ReferenceDistribution {
    /// Creates a continuous reference from observations.
    pub fn continuous(sample: impl Into<Vec<f64>>) -> Self {
        Self::Continuous {
            sample: sample.into(),
        }
    }

    /// Creates a categorical reference from `(label, frequency)` pairs.
    pub fn categorical<I, S>(frequencies: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::Categorical {
            frequencies: frequencies
                .into_iter()
                .map(|(label, freq)| (label.into(), freq))
                .collect(),
        }
    }

    /// Returns the short name of the statistical method.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Continuous { .. } => "ks",
            Self::Categorical { .. } => "chi_square",
        }
    }

    /// Validates that the reference can be compared against.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Continuous { sample } => {
                if sample.is_empty() {
                    return Err(TermError::Configuration(
                        "Continuous reference distribution has no observations".to_string(),
                    ));
                }
                for value in sample {
                    InputValidator::validate_threshold(*value, "reference observation")?;
                }
            }
            Self::Categorical { frequencies } => {
                let mut total = 0.0;
                for (label, freq) in frequencies {
                    InputValidator::validate_threshold(*freq, "reference frequency")?;
                    if *freq < 0.0 {
                        return Err(TermError::Configuration(format!(
                            "Reference frequency for '{label}' is negative"
                        )));
                    }
                    total += freq;
                }
                if total <= 0.0 {
                    return Err(TermError::Configuration(
                        "Categorical reference distribution has no positive frequencies"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
