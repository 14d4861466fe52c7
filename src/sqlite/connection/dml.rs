use rusqlite::Connection;

use crate::error::SqliteStoreError;
use crate::sqlite::params::Params;

use super::ExclusiveConnection;

impl ExclusiveConnection {
    /// Execute a DML statement and return rows affected.
    ///
    /// Statements that also yield rows (`returning`, pragmas) are stepped to completion
    /// and their rows discarded.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if preparing or executing the statement fails.
    pub async fn execute_dml(
        &mut self,
        query: &str,
        params: Params,
    ) -> Result<usize, SqliteStoreError> {
        let sql_owned = query.to_owned();
        self.run(move |conn| {
            step_to_completion(conn, &sql_owned, &params)?;
            usize::try_from(conn.changes()).map_err(|e| {
                SqliteStoreError::ExecutionError(format!("rows affected out of range: {e}"))
            })
        })
        .await
    }

    /// Execute an INSERT and return the rowid `SQLite` assigned to the new row.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if preparing or executing the statement fails.
    pub async fn execute_insert(
        &mut self,
        query: &str,
        params: Params,
    ) -> Result<i64, SqliteStoreError> {
        let sql_owned = query.to_owned();
        self.run(move |conn| {
            step_to_completion(conn, &sql_owned, &params)?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }
}

fn step_to_completion(
    conn: &Connection,
    query: &str,
    params: &Params,
) -> Result<(), SqliteStoreError> {
    let mut stmt = conn
        .prepare(query)
        .map_err(|e| SqliteStoreError::query(query, e))?;
    let mut rows = stmt
        .query(&params.as_refs()[..])
        .map_err(|e| SqliteStoreError::query(query, e))?;
    while rows
        .next()
        .map_err(|e| SqliteStoreError::query(query, e))?
        .is_some()
    {}
    Ok(())
}
