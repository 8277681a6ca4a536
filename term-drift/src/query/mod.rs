//! Query construction and execution.
//!
//! - [`QueryBuilder`] produces the bounded sample query for one column.
//! - [`TemplateResolver`] turns partition filter templates into literal SQL;
//!   [`VariableResolver`] substitutes `${ name }` placeholders.
//! - [`QueryExecutor`] runs SQL and reports failures in-band through
//!   [`QueryResult`]; [`DataFusionExecutor`] is the DataFusion implementation.

mod builder;
mod executor;
mod template;

pub use builder::{QueryBuilder, DEFAULT_ROW_LIMIT};
pub use executor::{batches_to_rows, DataFusionExecutor, QueryExecutor, QueryResult, Row};
pub use template::{TemplateResolver, VariableResolver};
