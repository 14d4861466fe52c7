use std::path::{Path, PathBuf};

use crate::error::SqliteStoreError;

use super::connection::SqliteHandle;

/// Database location used when no path is configured, relative to the deployment root.
pub const DEFAULT_DB_RELATIVE_PATH: &str = "data/database.db";

/// Path `SQLite` understands as a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Options for configuring the single `SQLite` connection.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// Explicit database file; `None` falls back to [`DEFAULT_DB_RELATIVE_PATH`] under `root`.
    pub db_path: Option<PathBuf>,
    /// Deployment root the default path is resolved against.
    pub root: PathBuf,
    /// Switch the journal to WAL when the connection is opened.
    pub journal_wal: bool,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            db_path: None,
            root: PathBuf::from("."),
            journal_wal: false,
        }
    }
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: Option<PathBuf>) -> Self {
        Self {
            db_path,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Some(PathBuf::from(IN_MEMORY_PATH)))
    }

    /// Resolve the file the connection will open.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::ConfigError` if an explicit path is empty.
    pub fn resolve_path(&self) -> Result<PathBuf, SqliteStoreError> {
        match &self.db_path {
            Some(path) if path.as_os_str().is_empty() => Err(SqliteStoreError::ConfigError(
                "database path must not be empty".into(),
            )),
            Some(path) => Ok(path.clone()),
            None => Ok(default_db_path(&self.root)),
        }
    }
}

/// Default database file under a deployment root.
#[must_use]
pub fn default_db_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_DB_RELATIVE_PATH)
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone, Default)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.opts.db_path = Some(db_path.into());
        self
    }

    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.opts.root = root.into();
        self
    }

    #[must_use]
    pub fn wal(mut self, journal_wal: bool) -> Self {
        self.opts.journal_wal = journal_wal;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a [`SqliteHandle`] and open its connection.
    ///
    /// # Errors
    ///
    /// Returns `SqliteStoreError` if the path is invalid or the connection cannot be opened.
    pub async fn build(self) -> Result<SqliteHandle, SqliteStoreError> {
        let handle = SqliteHandle::new(self.finish());
        handle.acquire().await?;
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_path_resolves_under_root() {
        let opts = SqliteOptionsBuilder::new().root("/srv/app").finish();
        assert_eq!(
            opts.resolve_path().unwrap(),
            PathBuf::from("/srv/app/data/database.db")
        );
    }

    #[test]
    fn explicit_path_wins_over_root() {
        let opts = SqliteOptionsBuilder::new()
            .root("/srv/app")
            .path("/tmp/x.db")
            .finish();
        assert_eq!(opts.resolve_path().unwrap(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let opts = SqliteOptions::new(Some(PathBuf::new()));
        assert!(matches!(
            opts.resolve_path(),
            Err(SqliteStoreError::ConfigError(_))
        ));
    }
}
