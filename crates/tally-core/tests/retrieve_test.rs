//! Integration tests for the retrieve operation against the in-memory store.
//!
//! Covers the empty-table cases, action dispatch, key renaming, type
//! coercion and output ordering.

use serde_json::json;
use tally_core::{retrieve, CoreError, MemoryStore, RowStore, ACTION_GET_ALL};

const TABLE: &str = "Submissions";

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// A table that was never created reads as an empty list.
#[tokio::test]
async fn missing_table_reads_empty() {
    let store = MemoryStore::new();

    let submissions = retrieve(&store, TABLE, ACTION_GET_ALL).await.expect("retrieve");
    assert!(submissions.is_empty());
}

/// A table holding only its header row reads as an empty list.
#[tokio::test]
async fn header_only_table_reads_empty() {
    let store = MemoryStore::new();
    store.create_table(TABLE, &header(&["Role", "Hash"])).await.expect("create");

    let submissions = retrieve(&store, TABLE, ACTION_GET_ALL).await.expect("retrieve");
    assert!(submissions.is_empty());
}

/// Anything but `getAll` is an unknown action.
#[tokio::test]
async fn unrecognized_action_is_rejected() {
    let store = MemoryStore::new();

    let err = retrieve(&store, TABLE, "purgeAll").await.expect_err("must reject");
    assert!(matches!(err, CoreError::UnknownAction(_)));
}

/// Every renamed header comes back under its stable key with its cell value
/// intact (post coercion).
#[tokio::test]
async fn renamed_headers_key_the_output() {
    let store = MemoryStore::new();
    store
        .create_table(TABLE, &header(&["Role", "Company Size", "Completion Time (s)", "Hash"]))
        .await
        .expect("create");
    store
        .append_row(TABLE, &[json!("Engineer"), json!("500"), json!("73"), json!("h1")])
        .await
        .expect("append");

    let submissions = retrieve(&store, TABLE, ACTION_GET_ALL).await.expect("retrieve");
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].get("role"), Some(&json!("Engineer")));
    assert_eq!(submissions[0].get("companySize"), Some(&json!(500)));
    assert_eq!(submissions[0].get("completionSeconds"), Some(&json!(73)));
    assert_eq!(submissions[0].get("hash"), Some(&json!("h1")));
}

/// Unmapped headers pass through as keys unchanged.
#[tokio::test]
async fn unmapped_headers_pass_through() {
    let store = MemoryStore::new();
    store.create_table(TABLE, &header(&["Q1", "Favorite Color", "Hash"])).await.expect("create");
    store
        .append_row(TABLE, &[json!("agree"), json!("teal"), json!("h1")])
        .await
        .expect("append");

    let submissions = retrieve(&store, TABLE, ACTION_GET_ALL).await.expect("retrieve");
    assert_eq!(submissions[0].get("Q1"), Some(&json!("agree")));
    assert_eq!(submissions[0].get("Favorite Color"), Some(&json!("teal")));
}

/// String booleans and numerics coerce; other strings survive untouched.
#[tokio::test]
async fn cell_values_coerce_on_the_way_out() {
    let store = MemoryStore::new();
    store
        .create_table(TABLE, &header(&["Consent", "Q1", "Builder Score", "Comments", "Hash"]))
        .await
        .expect("create");
    store
        .append_row(
            TABLE,
            &[json!("TRUE"), json!("No"), json!("42"), json!("abc"), json!("h1")],
        )
        .await
        .expect("append");

    let submissions = retrieve(&store, TABLE, ACTION_GET_ALL).await.expect("retrieve");
    let object = &submissions[0];
    assert_eq!(object.get("consent"), Some(&json!(true)));
    assert_eq!(object.get("Q1"), Some(&json!(false)));
    assert_eq!(object.get("builderScore"), Some(&json!(42)));
    assert_eq!(object.get("comments"), Some(&json!("abc")));
}

/// Output order matches storage order, oldest submission first.
#[tokio::test]
async fn output_preserves_insertion_order() {
    let store = MemoryStore::new();
    store.create_table(TABLE, &header(&["Role", "Hash"])).await.expect("create");
    for (role, hash) in [("first", "h1"), ("second", "h2"), ("third", "h3")] {
        store.append_row(TABLE, &[json!(role), json!(hash)]).await.expect("append");
    }

    let submissions = retrieve(&store, TABLE, ACTION_GET_ALL).await.expect("retrieve");
    let roles: Vec<_> =
        submissions.iter().map(|object| object.get("role").cloned().unwrap()).collect();
    assert_eq!(roles, vec![json!("first"), json!("second"), json!("third")]);
}
