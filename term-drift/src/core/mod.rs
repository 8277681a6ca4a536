//! Core types shared by every check.
//!
//! ## Overview
//!
//! - **[`ScanCheck`]**: the contract a check variant implements
//! - **[`ScanContext`]**: scan-level information passed explicitly to checks
//! - **[`ThresholdPredicate`]** / **[`ThresholdEvaluator`]**: the warn/fail
//!   classification rule every check composes
//! - **[`CheckOutcome`]** / **[`CheckValue`]**: what a check reports
//! - **[`Scan`]**: runs a set of checks and summarizes them in a [`ScanReport`]
//!
//! ## Architecture
//!
//! ```text
//! Scan (ScanContext)
//!     ├── ScanCheck ── QueryExecutor ──▶ value ──▶ ThresholdEvaluator ──▶ outcome
//!     └── ScanCheck ── ...
//! ```
//!
//! ## Outcome precedence
//!
//! A value that matches the fail threshold fails even if it also matches the
//! warn threshold. A check without thresholds, or whose value is missing or
//! non-numeric, has no outcome.

mod check;
mod context;
mod outcome;
mod scan;
mod threshold;

pub use check::{BoxedCheck, CheckLocation, EvaluationInputs, ScanCheck};
pub use context::ScanContext;
pub use outcome::{CheckOutcome, CheckValue};
pub use scan::{CheckReport, Scan, ScanBuilder, ScanIssue, ScanMetrics, ScanReport};
pub use threshold::{ThresholdEvaluator, ThresholdPredicate};
