use std::time::Duration;

use tracing::{debug, error};

use crate::error::SqliteStoreError;
use crate::query::QueryAndParams;

use super::connection::ExclusiveConnection;
use super::params::Params;
use super::store::SqliteStore;

impl SqliteStore {
    /// Atomically write `batch`, optionally replacing everything in `target_table` first.
    ///
    /// Inside one transaction, `delete from target_table` runs first when
    /// `should_delete_first` is set, then each item runs strictly in order. A non-zero
    /// `pacing` sleeps after every item. The exclusive scope is held throughout, so no
    /// other statement reaches the connection mid-batch.
    ///
    /// Any failure, including a failed delete or commit, stops the batch and rolls
    /// everything back; the table is left as it was before the call.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::BatchError` wrapping the statement failure that
    /// triggered the rollback, or a connection error if the scope cannot be entered.
    pub async fn many_insert(
        &self,
        target_table: &str,
        batch: &[QueryAndParams],
        should_delete_first: bool,
        pacing: Duration,
    ) -> Result<(), SqliteStoreError> {
        let mut conn = self.handle().exclusive().await?;
        debug!(
            table = %target_table,
            items = batch.len(),
            should_delete_first,
            pacing = ?pacing,
            "starting batch write"
        );

        conn.begin().await.map_err(|source| batch_error(target_table, source))?;

        let written = write_batch(&mut conn, target_table, batch, should_delete_first, pacing).await;
        let outcome = match written {
            Ok(()) => conn.commit().await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(cause) => Err(abort(&mut conn, target_table, cause).await),
        }
    }
}

async fn write_batch(
    conn: &mut ExclusiveConnection,
    target_table: &str,
    batch: &[QueryAndParams],
    should_delete_first: bool,
    pacing: Duration,
) -> Result<(), SqliteStoreError> {
    if should_delete_first {
        let delete = format!("delete from {target_table}");
        conn.execute_dml(&delete, Params::default()).await?;
    }

    for item in batch {
        conn.execute_dml(&item.query, Params::convert(&item.params))
            .await?;
        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }
    Ok(())
}

async fn abort(
    conn: &mut ExclusiveConnection,
    target_table: &str,
    cause: SqliteStoreError,
) -> SqliteStoreError {
    error!(table = %target_table, error = %cause, "batch write failed; rolling back");
    if let Err(rollback_err) = conn.rollback().await {
        error!(
            table = %target_table,
            error = %rollback_err,
            "rollback after failed batch write also failed"
        );
    }
    batch_error(target_table, cause)
}

fn batch_error(target_table: &str, source: SqliteStoreError) -> SqliteStoreError {
    SqliteStoreError::BatchError {
        table: target_table.to_owned(),
        source: Box::new(source),
    }
}
