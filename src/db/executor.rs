//! Query executor capability
//!
//! The grid viewer never talks to a database. Commands obtain a
//! [`QueryResults`] through this trait and hand it to the viewer before the
//! interactive session starts.

use crate::db::types::QueryResults;
use crate::error::DbResult;

/// Runs a SQL statement and returns its columns and rows
///
/// Implemented by [`crate::db::postgres::PostgresExecutor`]; tests use
/// in-memory implementations.
#[allow(async_fn_in_trait)]
pub trait QueryExecutor {
    /// Execute `sql` and collect every row
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if the statement cannot be prepared or run
    async fn execute(&self, sql: &str) -> DbResult<QueryResults>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::{CellValue, ColumnDef, DataType, Row};
    use crate::error::DbError;
    use std::time::Duration;

    struct Canned(Option<QueryResults>);

    impl QueryExecutor for Canned {
        async fn execute(&self, sql: &str) -> DbResult<QueryResults> {
            self.0
                .clone()
                .ok_or_else(|| DbError::QueryFailed(format!("no rows for {}", sql)))
        }
    }

    #[test]
    fn test_executor_returns_result_set() {
        let executor = Canned(Some(QueryResults::new(
            vec![ColumnDef::new("id", DataType::Integer)],
            vec![Row {
                values: vec![CellValue::Integer(1)],
            }],
            Duration::from_millis(3),
        )));
        let results = tokio_test::block_on(executor.execute("SELECT 1")).unwrap();
        assert_eq!(results.row_count(), 1);
        assert_eq!(results.columns[0].name, "id");
    }

    #[test]
    fn test_executor_error_propagates() {
        let executor = Canned(None);
        let err = tokio_test::block_on(executor.execute("SELECT 1")).unwrap_err();
        assert!(err.to_string().contains("no rows for SELECT 1"));
    }
}
