use std::sync::Arc;

use rusqlite::Connection;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::SqliteStoreError;
use crate::helpers::get_first;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::config::SqliteOptions;
use super::connection::SqliteHandle;
use super::params::Params;

/// Query execution on top of a shared [`SqliteHandle`].
///
/// Cloning is cheap; clones share the handle and therefore the connection. Every
/// call holds the connection's exclusive scope for its whole duration.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    handle: Arc<SqliteHandle>,
}

#[derive(Deserialize)]
struct TotalRow {
    total: i64,
}

impl SqliteStore {
    #[must_use]
    pub fn new(handle: Arc<SqliteHandle>) -> Self {
        Self { handle }
    }

    /// Build a handle from `options`, open it, and wrap it in a store.
    ///
    /// # Errors
    /// Returns `SqliteStoreError` if the connection cannot be opened.
    pub async fn open(options: SqliteOptions) -> Result<Self, SqliteStoreError> {
        let handle = Arc::new(SqliteHandle::new(options));
        handle.acquire().await?;
        Ok(Self::new(handle))
    }

    #[must_use]
    pub fn handle(&self) -> &Arc<SqliteHandle> {
        &self.handle
    }

    /// Run a read statement and decode every row into `T`.
    ///
    /// Rows are decoded from a JSON object keyed by column name, so `T` can be any
    /// `Deserialize` struct whose fields match the selected columns, or
    /// `serde_json::Value` to keep rows untyped. An empty `params` slice binds nothing.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if `SQLite` rejects the statement and
    /// `DecodeError` if a row does not fit `T`.
    pub async fn run_query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Vec<T>, SqliteStoreError> {
        self.run_query_rows(query, params).await?.decode(query)
    }

    /// Run a read statement and return the raw result set.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if `SQLite` rejects the statement.
    pub async fn run_query_rows(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqliteStoreError> {
        let converted = Params::convert(params);
        let mut conn = self.handle.exclusive().await?;
        conn.execute_select(query, converted).await
    }

    /// Run an INSERT and return the rowid of the inserted row.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if `SQLite` rejects the statement.
    pub async fn run_insert(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<i64, SqliteStoreError> {
        let converted = Params::convert(params);
        let mut conn = self.handle.exclusive().await?;
        conn.execute_insert(query, converted).await
    }

    /// Run a write statement and return the number of rows it changed.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if `SQLite` rejects the statement.
    pub async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, SqliteStoreError> {
        let converted = Params::convert(params);
        let mut conn = self.handle.exclusive().await?;
        conn.execute_dml(query, converted).await
    }

    /// Run several `;`-separated statements with no parameters (schema setup and the like).
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if any statement fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SqliteStoreError> {
        let sql_owned = sql.to_owned();
        self.with_connection(move |conn| {
            conn.execute_batch(&sql_owned)
                .map_err(|e| SqliteStoreError::query(&sql_owned, e))
        })
        .await
    }

    /// Run synchronous `rusqlite` logic inside the exclusive scope.
    ///
    /// # Errors
    /// Propagates the error returned by `func`, or a connection failure.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqliteStoreError>
    where
        F: FnOnce(&mut Connection) -> Result<R, SqliteStoreError> + Send + 'static,
        R: Send + 'static,
    {
        let mut conn = self.handle.exclusive().await?;
        conn.run(func).await
    }

    /// Count the rows of `table_name` by `id`, with `option_clause` appended verbatim.
    ///
    /// `option_clause` is not sanitized; `""` counts every row.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if the assembled statement is rejected.
    pub async fn total(&self, table_name: &str, option_clause: &str) -> Result<i64, SqliteStoreError> {
        let sql = format!("select count(id) as total from {table_name} {option_clause}");
        let rows: Vec<TotalRow> = self.run_query(sql.trim_end(), &[]).await?;
        Ok(get_first(rows).map_or(0, |row| row.total))
    }

    /// Toggle case-sensitive `LIKE` matching for every later statement on the connection.
    ///
    /// The setting is connection-wide, so callers relying on different settings race.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if the pragma fails.
    pub async fn set_case_sensitivity(&self, enabled: bool) -> Result<(), SqliteStoreError> {
        let sql = format!("pragma case_sensitive_like = {}", i64::from(enabled));
        self.run_query_rows(&sql, &[]).await.map(|_| ())
    }
}
