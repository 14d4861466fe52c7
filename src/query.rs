use crate::types::RowValues;

/// A SQL string and its positional parameters bundled together.
///
/// One item of a bulk write is exactly one of these:
/// ```rust
/// use sqlite_store::prelude::*;
///
/// let qp = QueryAndParams::new(
///     "insert into events(id, name) values(?, ?)",
///     vec![RowValues::Int(1), RowValues::Text("a".into())],
/// );
/// # let _ = qp;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query, in placeholder order
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with the given query string and parameters
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Create a new `QueryAndParams` with an empty parameter list
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }
}

impl<Q, I, V> From<(Q, I)> for QueryAndParams
where
    Q: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<RowValues>,
{
    fn from((query, params): (Q, I)) -> Self {
        Self::new(query, params.into_iter().map(Into::into).collect())
    }
}
