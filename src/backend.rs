use async_trait::async_trait;

use crate::error::SqliteStoreError;
use crate::sqlite::{SqliteHandle, SqliteStore};

/// Health-check and shutdown surface shared by storage backends.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Confirm the backend is reachable.
    async fn ping(&self) -> Result<(), SqliteStoreError>;

    /// Release the backend's connection for good.
    async fn close(&self) -> Result<(), SqliteStoreError>;
}

#[async_trait]
impl StorageBackend for SqliteHandle {
    async fn ping(&self) -> Result<(), SqliteStoreError> {
        SqliteHandle::ping(self).await
    }

    async fn close(&self) -> Result<(), SqliteStoreError> {
        SqliteHandle::close(self).await
    }
}

#[async_trait]
impl StorageBackend for SqliteStore {
    async fn ping(&self) -> Result<(), SqliteStoreError> {
        SqliteHandle::ping(self.handle()).await
    }

    async fn close(&self) -> Result<(), SqliteStoreError> {
        SqliteHandle::close(self.handle()).await
    }
}
