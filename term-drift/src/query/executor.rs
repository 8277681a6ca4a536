//! Query execution seam and its DataFusion implementation.

use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::prelude::SessionContext;
use datafusion::scalar::ScalarValue;
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};

/// A positional tuple of scalars returned by a query.
pub type Row = Vec<ScalarValue>;

/// The outcome of executing a named query.
///
/// Execution failures are carried in [`error`](Self::error) rather than
/// returned as `Err`, so a broken query never aborts the surrounding scan.
#[derive(Debug, Clone)]
pub struct QueryResult {
    name: String,
    sql: String,
    rows: Option<Vec<Row>>,
    error: Option<String>,
    duration: Duration,
}

impl QueryResult {
    /// Creates a successful result.
    pub fn success(name: impl Into<String>, sql: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            rows: Some(rows),
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Creates a failed result carrying the error message.
    pub fn failure(
        name: impl Into<String>,
        sql: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            rows: None,
            error: Some(message.into()),
            duration: Duration::ZERO,
        }
    }

    /// Records how long the query took.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns the query name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the executed SQL.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the rows, or `None` if the query produced none.
    pub fn rows(&self) -> Option<&[Row]> {
        self.rows.as_deref()
    }

    /// Returns the execution error message, if the query failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the execution time.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns true if the query succeeded and returned at least one row.
    pub fn has_rows(&self) -> bool {
        self.error.is_none() && self.rows.as_ref().is_some_and(|rows| !rows.is_empty())
    }

    /// Returns the first value of every row, in row order.
    ///
    /// Rows without any column are skipped.
    pub fn first_column_values(&self) -> Vec<ScalarValue> {
        self.rows()
            .unwrap_or_default()
            .iter()
            .filter_map(|row| row.first().cloned())
            .collect()
    }
}

/// Executes SQL against a data source.
///
/// Implementations never return `Err`; failures are reported through
/// [`QueryResult::error`].
#[async_trait]
pub trait QueryExecutor: Debug + Send + Sync {
    /// Executes `sql` under the given query name.
    async fn execute(&self, name: &str, sql: &str) -> QueryResult;
}

/// A [`QueryExecutor`] backed by a DataFusion [`SessionContext`].
///
/// # Examples
///
/// ```rust,no_run
/// use datafusion::prelude::*;
/// use term_drift::query::{DataFusionExecutor, QueryExecutor};
///
/// # async fn example() -> datafusion::error::Result<()> {
/// let ctx = SessionContext::new();
/// ctx.register_csv("orders", "data/orders.csv", CsvReadOptions::new()).await?;
///
/// let executor = DataFusionExecutor::new(ctx);
/// let result = executor.execute("count", "SELECT COUNT(*) FROM orders").await;
/// assert!(result.error().is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DataFusionExecutor {
    ctx: SessionContext,
}

impl DataFusionExecutor {
    /// Wraps a session context.
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    /// Returns the wrapped session context.
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        let df = self.ctx.sql(sql).await.context("Failed to plan query")?;
        let batches = df.collect().await.context("Failed to execute query")?;
        batches_to_rows(&batches)
    }
}

impl Debug for DataFusionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFusionExecutor")
            .field("session_id", &self.ctx.session_id())
            .finish()
    }
}

#[async_trait]
impl QueryExecutor for DataFusionExecutor {
    #[instrument(skip(self, sql), fields(query.name = %name))]
    async fn execute(&self, name: &str, sql: &str) -> QueryResult {
        let start = Instant::now();
        match self.fetch_rows(sql).await {
            Ok(rows) => {
                debug!(
                    query.name = %name,
                    query.rows = rows.len(),
                    query.duration_ms = start.elapsed().as_millis() as u64,
                    "Query executed"
                );
                QueryResult::success(name, sql, rows).with_duration(start.elapsed())
            }
            Err(e) => {
                error!(
                    query.name = %name,
                    query.sql = %sql,
                    error = %e,
                    "Query execution failed"
                );
                QueryResult::failure(name, sql, e.to_string()).with_duration(start.elapsed())
            }
        }
    }
}

/// Converts record batches into positional rows.
pub fn batches_to_rows(batches: &[RecordBatch]) -> Result<Vec<Row>> {
    let total: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut rows = Vec::with_capacity(total);

    for batch in batches {
        for row_idx in 0..batch.num_rows() {
            let row = batch
                .columns()
                .iter()
                .map(|column| ScalarValue::try_from_array(column, row_idx))
                .collect::<datafusion::error::Result<Row>>()?;
            rows.push(row);
        }
    }

    Ok(rows)
}
