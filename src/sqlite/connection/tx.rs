use crate::error::SqliteStoreError;

use super::ExclusiveConnection;

impl ExclusiveConnection {
    /// Begin a transaction on the connection.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::ExecutionError` if a transaction is already open, or
    /// `QueryError` if `BEGIN` fails.
    pub async fn begin(&mut self) -> Result<(), SqliteStoreError> {
        if self.in_transaction() {
            return Err(SqliteStoreError::ExecutionError(
                "SQLite transaction already in progress".into(),
            ));
        }
        self.run_control("BEGIN").await
    }

    /// Commit the open transaction.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::ExecutionError` if no transaction is open, or `QueryError`
    /// if `COMMIT` fails (the transaction may then still be open).
    pub async fn commit(&mut self) -> Result<(), SqliteStoreError> {
        if !self.in_transaction() {
            return Err(SqliteStoreError::ExecutionError(
                "SQLite transaction not active".into(),
            ));
        }
        self.run_control("COMMIT").await
    }

    /// Roll back the open transaction. A no-op when `SQLite` already ended it.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if `ROLLBACK` fails.
    pub async fn rollback(&mut self) -> Result<(), SqliteStoreError> {
        if !self.in_transaction() {
            return Ok(());
        }
        self.run_control("ROLLBACK").await
    }

    async fn run_control(&mut self, sql: &'static str) -> Result<(), SqliteStoreError> {
        self.run(move |conn| {
            conn.execute_batch(sql)
                .map_err(|e| SqliteStoreError::query(sql, e))
        })
        .await
    }
}
