//! Async access to a single `SQLite` connection.
//!
//! One [`SqliteHandle`] owns the connection: it opens lazily, enables foreign keys
//! once when it opens, and serializes every operation through an exclusive scope.
//! [`SqliteStore`] layers query execution, typed row decoding, and the
//! all-or-nothing [`SqliteStore::many_insert`] bulk write on top.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sqlite_store::prelude::*;
//!
//! # async fn demo() -> Result<(), SqliteStoreError> {
//! let store = SqliteStore::open(SqliteOptions::in_memory()).await?;
//! store
//!     .execute_batch("create table events(id integer primary key, name text)")
//!     .await?;
//! store
//!     .many_insert(
//!         "events",
//!         &[QueryAndParams::from(("insert into events(id, name) values(?, ?)", [
//!             RowValues::Int(1),
//!             RowValues::Text("a".into()),
//!         ]))],
//!         true,
//!         Duration::ZERO,
//!     )
//!     .await?;
//! assert_eq!(store.total("events", "").await?, 1);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod helpers;
pub mod prelude;
pub mod query;
pub mod results;
pub mod sqlite;
pub mod types;

pub use backend::StorageBackend;
pub use error::SqliteStoreError;
pub use helpers::get_first;
pub use query::QueryAndParams;
pub use results::{CustomDbRow, ResultSet};
pub use sqlite::{SqliteHandle, SqliteOptions, SqliteOptionsBuilder, SqliteStore};
pub use types::RowValues;
