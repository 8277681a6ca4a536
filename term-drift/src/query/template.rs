//! Resolution of partition filter templates into literal SQL.

use crate::core::ScanContext;
use crate::prelude::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

/// Resolves a filter template against a scan context.
pub trait TemplateResolver: Debug + Send + Sync {
    /// Returns the literal SQL boolean expression for `template`.
    fn resolve(&self, template: &str, ctx: &ScanContext) -> Result<String>;
}

/// Substitutes `${ name }` placeholders with scan context variables.
///
/// Unknown variables are an error, never an empty substitution.
///
/// # Examples
///
/// ```rust
/// use term_drift::core::ScanContext;
/// use term_drift::query::{TemplateResolver, VariableResolver};
///
/// let ctx = ScanContext::new().with_variable("day", "2024-01-31");
/// let sql = VariableResolver
///     .resolve("order_date = DATE '${ day }'", &ctx)
///     .unwrap();
/// assert_eq!(sql, "order_date = DATE '2024-01-31'");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableResolver;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\$\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}")
        .expect("Hard-coded regex pattern should be valid")
});

impl TemplateResolver for VariableResolver {
    fn resolve(&self, template: &str, ctx: &ScanContext) -> Result<String> {
        let mut resolved = String::with_capacity(template.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = ctx.resolve_variable(name.as_str()).ok_or_else(|| {
                TermError::template_resolution(
                    template,
                    format!("unknown variable '{}'", name.as_str()),
                )
            })?;
            resolved.push_str(&template[last..whole.start()]);
            resolved.push_str(&value);
            last = whole.end();
        }
        resolved.push_str(&template[last..]);

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_without_placeholders_is_unchanged() {
        let ctx = ScanContext::new();
        let sql = VariableResolver.resolve("amount > 0", &ctx).unwrap();
        assert_eq!(sql, "amount > 0");
    }

    #[test]
    fn test_multiple_placeholders() {
        let ctx = ScanContext::new()
            .with_variable("start", "2024-01-01")
            .with_variable("end", "2024-02-01");
        let sql = VariableResolver
            .resolve("ts >= '${start}' AND ts < '${ end }'", &ctx)
            .unwrap();
        assert_eq!(sql, "ts >= '2024-01-01' AND ts < '2024-02-01'");
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let ctx = ScanContext::new();
        let err = VariableResolver
            .resolve("region = '${ region }'", &ctx)
            .unwrap_err();
        assert!(matches!(err, TermError::TemplateResolution { .. }));
        assert!(err.to_string().contains("unknown variable 'region'"));
    }
}
