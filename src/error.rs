use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteStoreError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query failed: {statement}: {source}")]
    QueryError {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Batch write into `{table}` rolled back: {source}")]
    BatchError {
        table: String,
        #[source]
        source: Box<SqliteStoreError>,
    },

    #[error("Row decode error for {statement}: {source}")]
    DecodeError {
        statement: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl SqliteStoreError {
    pub(crate) fn query(statement: &str, source: rusqlite::Error) -> Self {
        SqliteStoreError::QueryError {
            statement: statement.to_owned(),
            source,
        }
    }

    /// The `SQLite` error that triggered this failure, looking through batch wrapping.
    #[must_use]
    pub fn sqlite_cause(&self) -> Option<&rusqlite::Error> {
        match self {
            SqliteStoreError::QueryError { source, .. } => Some(source),
            SqliteStoreError::BatchError { source, .. } => source.sqlite_cause(),
            _ => None,
        }
    }
}
