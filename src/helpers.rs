//! Small helpers over query results.

/// First row of a result, or `None` when the query returned nothing.
#[must_use]
pub fn get_first<T>(rows: Vec<T>) -> Option<T> {
    rows.into_iter().next()
}
