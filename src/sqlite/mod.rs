//! `SQLite` access through one exclusively-scoped connection.
//!
//! - `config`: where the database lives and how it is opened
//! - `connection`: the connection handle and its exclusive scope
//! - `params` / `query`: conversion between middleware values and rusqlite
//! - `store`: query execution and helpers
//! - `batch`: transactional bulk writes

pub mod batch;
pub mod config;
pub mod connection;
pub mod params;
pub mod query;
pub mod store;

pub use config::{SqliteOptions, SqliteOptionsBuilder, default_db_path};
pub use connection::{ExclusiveConnection, SqliteHandle};
pub use params::Params;
pub use query::build_result_set;
pub use store::SqliteStore;
