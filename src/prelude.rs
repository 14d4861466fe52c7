//! Convenient imports for common functionality.

pub use crate::backend::StorageBackend;
pub use crate::error::SqliteStoreError;
pub use crate::helpers::get_first;
pub use crate::query::QueryAndParams;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::sqlite::{
    SqliteHandle, SqliteOptions, SqliteOptionsBuilder, SqliteStore,
};
pub use crate::types::RowValues;
