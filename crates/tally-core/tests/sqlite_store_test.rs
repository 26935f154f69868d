//! SQLite row-store tests against a temporary database file.
//!
//! Exercises the trait contract end to end, plus the one property the
//! in-memory store cannot show: rows and formatting survive a reconnect.

use serde_json::json;
use tally_core::{
    ingest, retrieve, CoreError, HeaderFormat, IngestStatus, RowStore, SqliteStore,
    SubmissionPayload, TestClock, ACTION_GET_ALL,
};
use tempfile::TempDir;

const TABLE: &str = "Submissions";

fn database_url(dir: &TempDir) -> String {
    let path = dir.path().join("tally.db");
    format!("sqlite://{}?mode=rwc", path.display())
}

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[tokio::test]
async fn create_append_read_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::connect(&database_url(&dir)).await.expect("connect");

    store.create_table(TABLE, &header(&["Role", "Hash"])).await.expect("create");
    store.append_row(TABLE, &[json!("Engineer"), json!("h1")]).await.expect("append");
    store.append_row(TABLE, &[json!("Designer"), json!("h2")]).await.expect("append");

    let rows = store.read_all(TABLE).await.expect("read");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec![json!("Role"), json!("Hash")]);
    assert_eq!(rows[1], vec![json!("Engineer"), json!("h1")]);
    assert_eq!(rows[2], vec![json!("Designer"), json!("h2")]);
}

#[tokio::test]
async fn missing_table_errors_and_exists_reports_false() {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::connect(&database_url(&dir)).await.expect("connect");

    assert!(!store.table_exists(TABLE).await.expect("exists"));
    let err = store.read_all(TABLE).await.expect_err("must fail");
    assert!(matches!(err, CoreError::Store(_)));
}

#[tokio::test]
async fn double_create_fails() {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::connect(&database_url(&dir)).await.expect("connect");

    store.create_table(TABLE, &header(&["A"])).await.expect("create");
    let err = store.create_table(TABLE, &header(&["B"])).await.expect_err("must fail");
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn cell_reads_and_writes_are_positional() {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::connect(&database_url(&dir)).await.expect("connect");

    store.create_table(TABLE, &header(&["Role", "Hash"])).await.expect("create");
    store.append_row(TABLE, &[json!("Engineer"), json!("h1")]).await.expect("append");

    assert_eq!(store.read_cell(TABLE, 0, 0).await.expect("read"), Some(json!("Role")));
    assert_eq!(store.read_cell(TABLE, 1, 1).await.expect("read"), Some(json!("h1")));
    assert_eq!(store.read_cell(TABLE, 9, 0).await.expect("read"), None);

    store.write_cell(TABLE, 1, 0, json!("Manager")).await.expect("write");
    assert_eq!(store.read_cell(TABLE, 1, 0).await.expect("read"), Some(json!("Manager")));

    let err = store.write_cell(TABLE, 0, 0, json!("Nope")).await.expect_err("must fail");
    assert!(err.to_string().contains("immutable"));
}

#[tokio::test]
async fn rows_and_formatting_survive_reconnect() {
    let dir = TempDir::new().expect("tempdir");
    let url = database_url(&dir);

    {
        let store = SqliteStore::connect(&url).await.expect("connect");
        store.create_table(TABLE, &header(&["Role", "Hash"])).await.expect("create");
        store.format_header(TABLE, HeaderFormat::default()).await.expect("format");
        store.append_row(TABLE, &[json!("Engineer"), json!("h1")]).await.expect("append");
        store.close().await;
    }

    let store = SqliteStore::connect(&url).await.expect("reconnect");
    let rows = store.read_all(TABLE).await.expect("read");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], vec![json!("Engineer"), json!("h1")]);
}

/// The full ingest/retrieve pair works unchanged over the SQLite store.
#[tokio::test]
async fn operations_run_against_sqlite_unchanged() {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::connect(&database_url(&dir)).await.expect("connect");
    let clock = TestClock::new();

    let body = json!({
        "headers": ["Role", "Consent"],
        "values": ["Engineer", "Yes"],
        "hash": "h1"
    })
    .to_string();
    let payload = SubmissionPayload::parse(&body).expect("payload");

    assert_eq!(
        ingest(&store, &clock, TABLE, &payload).await.expect("first ingest"),
        IngestStatus::Accepted
    );
    assert_eq!(
        ingest(&store, &clock, TABLE, &payload).await.expect("second ingest"),
        IngestStatus::Duplicate
    );

    let submissions = retrieve(&store, TABLE, ACTION_GET_ALL).await.expect("retrieve");
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].get("role"), Some(&json!("Engineer")));
    assert_eq!(submissions[0].get("consent"), Some(&json!(true)));
    assert_eq!(submissions[0].get("hash"), Some(&json!("h1")));
}
