use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::error::SqliteStoreError;
use crate::sqlite::config::SqliteOptions;

/// The one `SQLite` connection, `None` once it has been closed.
pub type SharedSqliteConnection = Arc<Mutex<Option<Connection>>>;

enum HandleState {
    Unopened,
    Open(SharedSqliteConnection),
    Closed,
}

/// Owner of the single `SQLite` connection.
///
/// The connection is opened on the first [`acquire`](Self::acquire) and initialized
/// once (foreign keys on, optional WAL). Every operation runs inside an
/// [`ExclusiveConnection`] scope, so statements from concurrent callers never
/// interleave. Once [`close`](Self::close) has been called the handle never reopens.
pub struct SqliteHandle {
    options: SqliteOptions,
    state: Mutex<HandleState>,
}

impl SqliteHandle {
    /// Create a handle; nothing is opened until first use.
    #[must_use]
    pub fn new(options: SqliteOptions) -> Self {
        Self {
            options,
            state: Mutex::new(HandleState::Unopened),
        }
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }

    /// Return the live connection, opening and initializing it on the first call.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::ConnectionError` if opening or initializing fails or the
    /// handle has been closed, and `ConfigError` for an unusable path.
    pub async fn acquire(&self) -> Result<SharedSqliteConnection, SqliteStoreError> {
        let mut state = self.state.lock().await;
        match &*state {
            HandleState::Open(conn) => return Ok(Arc::clone(conn)),
            HandleState::Closed => return Err(closed_error()),
            HandleState::Unopened => {}
        }

        let path = self.options.resolve_path()?;
        let journal_wal = self.options.journal_wal;
        let conn = tokio::task::spawn_blocking(move || open_connection(&path, journal_wal))
            .await
            .map_err(|e| {
                SqliteStoreError::ConnectionError(format!("sqlite open join error: {e}"))
            })??;

        let shared = Arc::new(Mutex::new(Some(conn)));
        *state = HandleState::Open(Arc::clone(&shared));
        Ok(shared)
    }

    /// Enter the exclusive scope on the connection.
    ///
    /// A transaction left open by an abandoned scope is rolled back before the new
    /// scope is handed out.
    ///
    /// # Errors
    /// Returns `SqliteStoreError` if the connection cannot be acquired or a stale
    /// transaction cannot be rolled back.
    pub async fn exclusive(&self) -> Result<ExclusiveConnection, SqliteStoreError> {
        let shared = self.acquire().await?;
        let mut conn = ExclusiveConnection::new(shared.lock_owned().await);
        if conn.in_transaction() {
            warn!("rolling back transaction left open by an abandoned operation");
            conn.rollback().await?;
        }
        Ok(conn)
    }

    /// Close the connection, waiting for the operation currently in flight.
    ///
    /// Closing a handle that never opened succeeds.
    ///
    /// # Errors
    /// Returns `SqliteStoreError::ConnectionError` carrying the `SQLite` close failure, or
    /// if the handle was already closed.
    pub async fn close(&self) -> Result<(), SqliteStoreError> {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, HandleState::Closed) {
            HandleState::Unopened => Ok(()),
            HandleState::Closed => Err(SqliteStoreError::ConnectionError(
                "SQLite connection already closed".into(),
            )),
            HandleState::Open(shared) => {
                let mut guard = shared.lock_owned().await;
                let conn = guard.take().ok_or_else(closed_error)?;
                drop(guard);
                tokio::task::spawn_blocking(move || conn.close())
                    .await
                    .map_err(|e| {
                        SqliteStoreError::ConnectionError(format!("sqlite close join error: {e}"))
                    })?
                    .map_err(|(_conn, err)| {
                        SqliteStoreError::ConnectionError(format!(
                            "failed to close SQLite connection: {err}"
                        ))
                    })?;
                debug!(path = ?self.options.db_path, "sqlite connection closed");
                Ok(())
            }
        }
    }

    /// Liveness probe. An embedded database has nothing to round-trip to.
    ///
    /// # Errors
    /// Never fails.
    pub async fn ping(&self) -> Result<(), SqliteStoreError> {
        Ok(())
    }

    /// Whether the connection is currently open.
    pub async fn is_open(&self) -> bool {
        matches!(&*self.state.lock().await, HandleState::Open(_))
    }
}

impl fmt::Debug for SqliteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteHandle")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn open_connection(path: &Path, journal_wal: bool) -> Result<Connection, SqliteStoreError> {
    let conn = Connection::open(path).map_err(|e| {
        SqliteStoreError::ConnectionError(format!(
            "failed to open SQLite database at {}: {e}",
            path.display()
        ))
    })?;

    let mut init = String::from("PRAGMA foreign_keys = ON;");
    if journal_wal {
        init.push_str(" PRAGMA journal_mode = WAL;");
    }
    conn.execute_batch(&init).map_err(|e| {
        SqliteStoreError::ConnectionError(format!("failed to initialize SQLite connection: {e}"))
    })?;

    debug!(path = %path.display(), journal_wal, "sqlite connection opened");
    Ok(conn)
}

pub(crate) fn closed_error() -> SqliteStoreError {
    SqliteStoreError::ConnectionError("SQLite connection has been closed".into())
}

/// Exclusive access to the connection for the lifetime of this value.
///
/// Blocking `rusqlite` work is moved onto the blocking pool together with the lock
/// guard and handed back once it finishes, so the scope stays held across awaits
/// (including pacing sleeps between statements).
pub struct ExclusiveConnection {
    guard: Option<OwnedMutexGuard<Option<Connection>>>,
}

impl ExclusiveConnection {
    fn new(guard: OwnedMutexGuard<Option<Connection>>) -> Self {
        Self { guard: Some(guard) }
    }

    /// Run synchronous `rusqlite` logic against the connection.
    ///
    /// # Errors
    /// Propagates the error returned by `func`; returns `ConnectionError` if the
    /// connection has been closed or was lost to a panicking callback.
    pub async fn run<F, R>(&mut self, func: F) -> Result<R, SqliteStoreError>
    where
        F: FnOnce(&mut Connection) -> Result<R, SqliteStoreError> + Send + 'static,
        R: Send + 'static,
    {
        let mut guard = self.guard.take().ok_or_else(|| {
            SqliteStoreError::ConnectionError(
                "SQLite connection lost by a previous failed operation".into(),
            )
        })?;
        let (guard, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = match (*guard).as_mut() {
                Some(conn) => func(conn),
                None => Err(closed_error()),
            };
            (guard, outcome)
        })
        .await
        .map_err(|e| {
            SqliteStoreError::ExecutionError(format!("sqlite spawn_blocking join error: {e}"))
        })?;
        self.guard = Some(guard);
        outcome
    }

    /// Whether a transaction is open on the connection.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.guard
            .as_ref()
            .and_then(|guard| (**guard).as_ref())
            .is_some_and(|conn| !conn.is_autocommit())
    }
}

impl fmt::Debug for ExclusiveConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusiveConnection")
            .field("held", &self.guard.is_some())
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}
