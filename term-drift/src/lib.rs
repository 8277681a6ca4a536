//! # Term Drift - Distribution Checks for Rust
//!
//! Term Drift detects when the values of a column stop looking like a known
//! reference distribution. It samples the column with DataFusion, compares the
//! sample with the reference using a statistical test, and classifies the
//! resulting p-value against warn and fail thresholds.
//!
//! ## Quick Start
//!
//! ```rust
//! use term_drift::prelude::*;
//! use term_drift::core::{Scan, ThresholdPredicate};
//! use term_drift::distribution::{DistributionCheck, DistributionCheckConfig, ReferenceDistribution};
//! use term_drift::query::DataFusionExecutor;
//! use datafusion::prelude::*;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let config = DistributionCheckConfig::builder()
//!     .column("amount")
//!     .table("orders")
//!     .partition_filter("order_day = '${ day }'")
//!     .reference(ReferenceDistribution::continuous(vec![12.0, 15.5, 9.9, 20.1]))
//!     .warn(ThresholdPredicate::less_than(0.10))
//!     .fail(ThresholdPredicate::less_than(0.05))
//!     .build()?;
//!
//! let ctx = SessionContext::new();
//! // ... register the orders table ...
//!
//! let mut scan = Scan::builder("orders_drift")
//!     .context(ScanContext::new().with_variable("day", "2024-01-31"))
//!     .check(DistributionCheck::new(config))
//!     .build();
//!
//! let report = scan.run(&DataFusionExecutor::new(ctx)).await;
//! for result in &report.results {
//!     println!("{}: {:?} ({:?})", result.name, result.outcome, result.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Thresholds
//!
//! A [`core::ThresholdPredicate`] holds up to four bounds (`lt`, `lte`, `gt`,
//! `gte`). A value is bad when it satisfies every configured bound, unless the
//! lower bound lies above the upper bound, in which case the predicate is a
//! split zone and satisfying any bound is enough. Fail takes precedence over
//! warn.
//!
//! ## Statistical methods
//!
//! | Reference | Test | Statistic |
//! |-----------|------|-----------|
//! | `continuous` sample | two-sample Kolmogorov-Smirnov | D |
//! | `categorical` frequencies | Pearson chi-square | χ² |
//!
//! Custom tests plug in through [`distribution::DistributionComparator`].
//!
//! ## Architecture
//!
//! - **`core`**: the check contract, scan context, thresholds and scan runner
//! - **`query`**: sample query construction, filter templates and execution
//! - **`distribution`**: the distribution check, its configuration and tests
//! - **`security`**: identifier and input validation
//! - **`logging`**: logging presets and subscriber setup

pub mod core;
pub mod distribution;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod query;
pub mod security;
