//! Logging utilities and configuration for Term Drift.
//!
//! Checks and the scan runner log through `tracing` with structured fields
//! (`check.name`, `check.outcome`, `query.sql`, ...). This module holds the
//! verbosity presets a [`Scan`](crate::core::Scan) runs with and a helper
//! that installs a `tracing-subscriber`.

use tracing::Level;

/// Verbosity settings applied by [`Scan`](crate::core::Scan) while it runs.
///
/// The scan summary is always logged. Per-check outcome lines follow
/// `base_level`; progress and diagnostics are opt-in via
/// [`log_check!`](crate::log_check).
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Most verbose level at which the scan runner reports progress
    pub base_level: Level,
    /// Whether to log per-check progress and diagnostics payloads
    pub log_check_details: bool,
    /// Longest logged field value before truncation, in bytes
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_check_details: false,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Returns true if events at `level` pass `base_level`.
    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.base_level
    }

    /// Logs every check with its full diagnostics.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_check_details: true,
            max_field_length: 1024,
        }
    }

    /// Logs warnings and scan summaries only.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_check_details: false,
            max_field_length: 128,
        }
    }
}

/// Logs at debug level when per-check details are enabled in a [`LogConfig`].
#[macro_export]
macro_rules! log_check {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_check_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Truncates a string to at most `max_length` bytes, on a char boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Installing a global subscriber.
pub mod setup {
    use tracing::Level;

    /// Output format of the installed subscriber.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum LogFormat {
        /// Human readable lines
        #[default]
        Pretty,
        /// One JSON object per event
        Json,
    }

    /// Subscriber settings.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Level for every target other than `term_drift`
        pub default_level: Level,
        /// Level for the `term_drift` target
        pub drift_level: Level,
        pub format: LogFormat,
        /// Replaces the generated filter directives when set
        pub directives: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                default_level: Level::INFO,
                drift_level: Level::DEBUG,
                format: LogFormat::Pretty,
                directives: None,
            }
        }
    }

    impl LoggingConfig {
        /// JSON output, warnings from dependencies, info from checks.
        pub fn production() -> Self {
            Self {
                default_level: Level::WARN,
                drift_level: Level::INFO,
                format: LogFormat::Json,
                directives: None,
            }
        }

        /// Sets the level for the `term_drift` target.
        pub fn with_drift_level(mut self, level: Level) -> Self {
            self.drift_level = level;
            self
        }

        /// Sets the output format.
        pub fn with_format(mut self, format: LogFormat) -> Self {
            self.format = format;
            self
        }

        /// Uses `directives` verbatim as the filter.
        pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
            self.directives = Some(directives.into());
            self
        }

        /// Returns the `EnvFilter` directives for this configuration.
        pub fn filter_directives(&self) -> String {
            match &self.directives {
                Some(directives) => directives.clone(),
                None => format!(
                    "{},term_drift={}",
                    self.default_level.as_str().to_lowercase(),
                    self.drift_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs a global subscriber. `RUST_LOG` takes precedence over the
    /// configured directives.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use term_drift::logging::setup::{init_logging, LogFormat, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::default().with_format(LogFormat::Json)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.filter_directives()))?;

        let fmt_layer = match config.format {
            LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::setup::{LogFormat, LoggingConfig};
    use super::*;

    #[test]
    fn test_log_config_presets() {
        let default = LogConfig::default();
        assert_eq!(default.base_level, Level::INFO);
        assert!(!default.log_check_details);

        let verbose = LogConfig::verbose();
        assert!(verbose.log_check_details);
        assert_eq!(verbose.max_field_length, 1024);

        assert_eq!(LogConfig::production().base_level, Level::WARN);
    }

    #[test]
    fn test_base_level_gating() {
        let production = LogConfig::production();
        assert!(production.is_enabled(Level::ERROR));
        assert!(production.is_enabled(Level::WARN));
        assert!(!production.is_enabled(Level::INFO));

        assert!(LogConfig::default().is_enabled(Level::INFO));
        assert!(!LogConfig::default().is_enabled(Level::DEBUG));
        assert!(LogConfig::verbose().is_enabled(Level::DEBUG));
    }

    #[test]
    fn test_truncate_field() {
        assert_eq!(truncate_field("hello", 10), "hello");
        assert_eq!(
            truncate_field("this is a very long text that should be truncated", 10),
            "this is a ...(truncated)"
        );
        assert_eq!(truncate_field("région", 2), "r...(truncated)");
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(
            LoggingConfig::production().filter_directives(),
            "warn,term_drift=info"
        );
        assert_eq!(LoggingConfig::production().format, LogFormat::Json);

        let config = LoggingConfig::default().with_directives("term_drift=trace");
        assert_eq!(config.filter_directives(), "term_drift=trace");
    }
}
