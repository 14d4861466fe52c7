use crate::error::SqliteStoreError;
use crate::results::ResultSet;
use crate::sqlite::params::Params;
use crate::sqlite::query::build_result_set;

use super::ExclusiveConnection;

impl ExclusiveConnection {
    /// Execute a query and collect its rows.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::QueryError` if preparing or stepping the statement fails.
    pub async fn execute_select(
        &mut self,
        query: &str,
        params: Params,
    ) -> Result<ResultSet, SqliteStoreError> {
        let sql_owned = query.to_owned();
        self.run(move |conn| {
            let mut stmt = conn
                .prepare(&sql_owned)
                .map_err(|e| SqliteStoreError::query(&sql_owned, e))?;
            build_result_set(&mut stmt, params.as_values())
                .map_err(|e| SqliteStoreError::query(&sql_owned, e))
        })
        .await
    }
}
