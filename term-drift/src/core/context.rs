//! Scan context passed explicitly to checks and template resolvers.
//!
//! Everything a check needs to know about the surrounding scan travels in a
//! [`ScanContext`] argument; there is no task-local or global scan state.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Runtime information about the scan a check is evaluated in.
///
/// # Examples
///
/// ```rust
/// use term_drift::core::ScanContext;
///
/// let ctx = ScanContext::new()
///     .with_data_source_name("warehouse")
///     .with_variable("day", "2024-01-31");
/// assert_eq!(ctx.variable("day"), Some("2024-01-31"));
/// assert_eq!(ctx.data_source_name(), "warehouse");
/// ```
#[derive(Debug, Clone)]
pub struct ScanContext {
    data_source_name: Arc<str>,
    scan_time: DateTime<Utc>,
    variables: HashMap<String, String>,
}

impl ScanContext {
    /// Creates a context for the default data source, timestamped now.
    pub fn new() -> Self {
        Self {
            data_source_name: Arc::from("default"),
            scan_time: Utc::now(),
            variables: HashMap::new(),
        }
    }

    /// Sets the name of the data source being scanned.
    pub fn with_data_source_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.data_source_name = name.into();
        self
    }

    /// Sets the scan time.
    pub fn with_scan_time(mut self, scan_time: DateTime<Utc>) -> Self {
        self.scan_time = scan_time;
        self
    }

    /// Adds a variable available to filter templates.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Returns the name of the data source being scanned.
    pub fn data_source_name(&self) -> &str {
        &self.data_source_name
    }

    /// Returns the time the scan started.
    pub fn scan_time(&self) -> DateTime<Utc> {
        self.scan_time
    }

    /// Looks up an explicitly set template variable.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Returns the value for `name`, including built-in variables.
    ///
    /// `scan_time` resolves to the scan time in RFC 3339 format unless a
    /// variable with that name was set explicitly.
    pub fn resolve_variable(&self, name: &str) -> Option<String> {
        match self.variable(name) {
            Some(value) => Some(value.to_string()),
            None if name == "scan_time" => Some(self.scan_time.to_rfc3339()),
            None => None,
        }
    }
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new()
    }
}
