//! Runs built statements against a pool or an open transaction.

use crate::error::AppError;
use crate::sql::QueryBuf;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Executor, FromRow};

/// Executes a mutation and returns the affected row count.
pub(crate) async fn execute<'c, E>(executor: E, q: &QueryBuf) -> Result<u64, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.execute(executor).await?.rows_affected())
}

pub(crate) async fn fetch_optional<'c, E, T>(executor: E, q: &QueryBuf) -> Result<Option<T>, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query.fetch_optional(executor).await
}

pub(crate) async fn fetch_all<'c, E, T>(executor: E, q: &QueryBuf) -> Result<Vec<T>, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query.fetch_all(executor).await
}

pub(crate) async fn fetch_count<'c, E>(executor: E, q: &QueryBuf) -> Result<i64, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    sqlx::query_scalar::<_, i64>(&q.sql).fetch_one(executor).await
}

/// Affected-row check for single-row and batch mutations.
pub(crate) fn expect_rows(table: &'static str, expected: u64, actual: u64) -> Result<(), AppError> {
    if actual != expected {
        tracing::warn!(table, expected, actual, "unexpected affected row count");
        return Err(AppError::RowsAffected {
            table,
            expected,
            actual,
        });
    }
    Ok(())
}
