use serde::Deserialize;
use sqlite_store::prelude::*;

#[derive(Debug, Deserialize, PartialEq)]
struct Event {
    id: i64,
    name: String,
}

async fn events_store() -> Result<SqliteStore, SqliteStoreError> {
    let store = SqliteStore::open(SqliteOptions::in_memory()).await?;
    store
        .execute_batch(
            "create table events (id integer primary key, name text not null);
             insert into events (id, name) values (1, 'a'), (2, 'b'), (3, 'c');",
        )
        .await?;
    Ok(store)
}

#[tokio::test]
async fn run_query_decodes_rows_in_store_order() -> Result<(), SqliteStoreError> {
    let store = events_store().await?;
    let rows: Vec<Event> = store
        .run_query(
            "select id, name from events where id >= ? order by id",
            &[RowValues::Int(2)],
        )
        .await?;
    assert_eq!(
        rows,
        vec![
            Event { id: 2, name: "b".into() },
            Event { id: 3, name: "c".into() },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn repeated_reads_return_identical_results() -> Result<(), SqliteStoreError> {
    let store = events_store().await?;
    let query = "select id, name from events where name <> ? order by id";
    let params = [RowValues::Text("b".into())];
    let first: Vec<Event> = store.run_query(query, &params).await?;
    let second: Vec<Event> = store.run_query(query, &params).await?;
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    Ok(())
}

#[tokio::test]
async fn positional_params_bind_in_order() -> Result<(), SqliteStoreError> {
    let store = SqliteStore::open(SqliteOptions::in_memory()).await?;
    let rs = store
        .run_query_rows(
            "select ? as a, ? as b, ? as c",
            &[
                RowValues::Int(7),
                RowValues::Text("x".into()),
                RowValues::Null,
            ],
        )
        .await?;
    assert_eq!(rs.len(), 1);
    let row = &rs.results[0];
    assert_eq!(row.get("a"), Some(&RowValues::Int(7)));
    assert_eq!(row.get("b").and_then(RowValues::as_text), Some("x"));
    assert!(row.get("c").is_some_and(RowValues::is_null));
    assert_eq!(
        rs.get_column_names().map(|names| names.as_slice().to_vec()),
        Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn statement_without_params_runs_unbound() -> Result<(), SqliteStoreError> {
    let store = events_store().await?;
    let rows: Vec<serde_json::Value> = store
        .run_query("select count(*) as n from events", &[])
        .await?;
    assert_eq!(rows, vec![serde_json::json!({ "n": 3 })]);
    Ok(())
}

#[tokio::test]
async fn run_insert_returns_assigned_rowid() -> Result<(), SqliteStoreError> {
    let store = SqliteStore::open(SqliteOptions::in_memory()).await?;
    store
        .execute_batch("create table notes (id integer primary key autoincrement, body text)")
        .await?;

    let first = store
        .run_insert("insert into notes (body) values (?)", &["one".into()])
        .await?;
    let second = store
        .run_insert("insert into notes (body) values (?)", &["two".into()])
        .await?;
    let explicit = store
        .run_insert(
            "insert into notes (id, body) values (?, ?)",
            &[RowValues::Int(42), RowValues::Text("three".into())],
        )
        .await?;

    assert_eq!((first, second, explicit), (1, 2, 42));
    Ok(())
}

#[tokio::test]
async fn run_insert_accepts_returning_clause() -> Result<(), SqliteStoreError> {
    let store = SqliteStore::open(SqliteOptions::in_memory()).await?;
    store
        .execute_batch("create table notes (id integer primary key autoincrement, body text)")
        .await?;

    let first = store
        .run_insert("insert into notes (body) values (?) returning id", &["one".into()])
        .await?;
    let second = store
        .run_insert("insert into notes (body) values (?) returning id", &["two".into()])
        .await?;
    assert_eq!((first, second), (1, 2));
    assert_eq!(store.total("notes", "").await?, 2);

    let changed = store
        .execute("update notes set body = upper(body) returning id", &[])
        .await?;
    assert_eq!(changed, 2);
    Ok(())
}

#[tokio::test]
async fn execute_reports_rows_changed() -> Result<(), SqliteStoreError> {
    let store = events_store().await?;
    let changed = store
        .execute("update events set name = upper(name) where id < ?", &[RowValues::Int(3)])
        .await?;
    assert_eq!(changed, 2);
    Ok(())
}

#[tokio::test]
async fn failed_statement_reports_query_error() -> Result<(), SqliteStoreError> {
    let store = events_store().await?;
    let err = store
        .run_query_rows("select * from missing_table", &[])
        .await
        .unwrap_err();
    match err {
        SqliteStoreError::QueryError { statement, .. } => {
            assert_eq!(statement, "select * from missing_table");
        }
        other => panic!("expected QueryError, got {other:?}"),
    }

    let err = store
        .run_insert(
            "insert into events (id, name) values (?, ?)",
            &[RowValues::Int(1), RowValues::Text("dupe".into())],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SqliteStoreError::QueryError { .. }));

    // connection is still usable afterwards
    let rows: Vec<Event> = store.run_query("select id, name from events", &[]).await?;
    assert_eq!(rows.len(), 3);
    Ok(())
}

#[tokio::test]
async fn mismatched_shape_reports_decode_error() -> Result<(), SqliteStoreError> {
    let store = events_store().await?;
    let err = store
        .run_query::<Event>("select id from events", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SqliteStoreError::DecodeError { .. }));
    Ok(())
}

#[tokio::test]
async fn with_connection_runs_raw_rusqlite() -> Result<(), SqliteStoreError> {
    let store = events_store().await?;
    let names = store
        .with_connection(|conn| {
            let mut stmt = conn
                .prepare("select name from events order by id desc")
                .map_err(|e| SqliteStoreError::ExecutionError(e.to_string()))?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| SqliteStoreError::ExecutionError(e.to_string()))?;
            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| SqliteStoreError::ExecutionError(e.to_string()))
        })
        .await?;
    assert_eq!(names, vec!["c", "b", "a"]);
    Ok(())
}
