//! Prelude for commonly used types and traits in term-drift.

pub use crate::core::{CheckOutcome, CheckValue, ScanCheck, ScanContext};
pub use crate::error::{ErrorContext, Result, TermError};
pub use crate::logging::LogConfig;
