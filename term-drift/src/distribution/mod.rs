//! Distribution checks.
//!
//! A [`DistributionCheck`] samples one column, compares the sample with a
//! [`ReferenceDistribution`] through a [`DistributionComparator`], keeps the
//! p-value as its check value and classifies it against optional warn/fail
//! thresholds.
//!
//! ```text
//! QueryBuilder ─▶ QueryExecutor ─▶ first column ─▶ DistributionComparator
//!                                                        │ p-value
//!                                                        ▼
//!                                             ThresholdEvaluator ─▶ outcome
//! ```

mod check;
mod comparator;
mod config;
mod diagnostics;
mod reference;
mod stats;

pub use check::{DistributionCheck, VALUES_QUERY_NAME};
pub use comparator::{Comparison, DistributionComparator, ReferenceComparator};
pub use config::{DistributionCheckConfig, DistributionCheckConfigBuilder, Partition};
pub use diagnostics::{CloudDiagnostics, LogDiagnostics, ThresholdDiagnostics};
pub use reference::ReferenceDistribution;
pub use stats::{chi_square_goodness_of_fit, ks_two_sample};
