//! SQL construction for column value samples.

use super::TemplateResolver;
use crate::core::ScanContext;
use crate::prelude::*;

/// Default upper bound on the number of sampled rows.
pub const DEFAULT_ROW_LIMIT: u64 = 1_000_000;

/// Builds bounded, optionally filtered selection queries for a single column.
///
/// Identifiers are inserted as given; they are validated when a check is
/// configured, not here.
///
/// # Examples
///
/// ```rust
/// use term_drift::core::ScanContext;
/// use term_drift::query::{QueryBuilder, VariableResolver, DEFAULT_ROW_LIMIT};
///
/// let ctx = ScanContext::new();
/// let builder = QueryBuilder::new(&VariableResolver, &ctx);
/// let sql = builder
///     .build_values_query("amount", "orders", None, Some(DEFAULT_ROW_LIMIT))
///     .unwrap();
/// assert_eq!(sql, "SELECT \n  amount \nFROM orders\n LIMIT 1000000");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    resolver: &'a dyn TemplateResolver,
    ctx: &'a ScanContext,
}

impl<'a> QueryBuilder<'a> {
    /// Creates a builder that resolves filters with `resolver` against `ctx`.
    pub fn new(resolver: &'a dyn TemplateResolver, ctx: &'a ScanContext) -> Self {
        Self { resolver, ctx }
    }

    /// Builds `SELECT <column> FROM <table>` with optional `WHERE` and `LIMIT`.
    ///
    /// A blank filter adds no `WHERE` clause and a zero limit adds no `LIMIT`
    /// clause. The only error is a failed filter resolution.
    pub fn build_values_query(
        &self,
        column_name: &str,
        table_name: &str,
        partition_filter: Option<&str>,
        row_limit: Option<u64>,
    ) -> Result<String> {
        let where_clause = match partition_filter.filter(|f| !f.trim().is_empty()) {
            Some(filter) => {
                let resolved = self.resolver.resolve(filter, self.ctx)?;
                format!("\nWHERE {resolved}")
            }
            None => String::new(),
        };

        let limit_clause = match row_limit.filter(|limit| *limit > 0) {
            Some(limit) => format!("\n LIMIT {limit}"),
            None => String::new(),
        };

        Ok(format!(
            "SELECT \n  {column_name} \nFROM {table_name}{where_clause}{limit_clause}"
        ))
    }
}
