//! Lazy schema provisioning for the submissions table.
//!
//! The table does not exist until the first ingest. Its header row comes
//! from that first payload when one is supplied, otherwise from the default
//! column set — either way a `Hash` column lands last and the header is
//! formatted (bold, frozen) through the store's presentation capability.
//! Once created, the header row is never altered.

use serde_json::Value;

use crate::{
    columns,
    error::Result,
    store::{HeaderFormat, RowStore},
};

/// Handle to a provisioned table: its name and effective header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    /// Table name in the row store.
    pub name: String,
    /// The header row the table was created with.
    pub header: Vec<String>,
}

/// Returns a handle to `name`, creating the table when it does not exist.
///
/// An existing table is returned unchanged regardless of `candidates`; a new
/// table gets `candidates + ["Hash"]` as its header, or the default header
/// set when `candidates` is empty.
///
/// # Errors
///
/// Propagates row-store failures as [`crate::CoreError::Store`].
pub async fn ensure_table<S: RowStore + ?Sized>(
    store: &S,
    name: &str,
    candidates: &[String],
) -> Result<TableHandle> {
    if store.table_exists(name).await? {
        let rows = store.read_all(name).await?;
        let header = rows.first().map(|row| header_names(row)).unwrap_or_default();
        return Ok(TableHandle { name: name.to_string(), header });
    }

    let header = build_header(candidates);
    store.create_table(name, &header).await?;
    store.format_header(name, HeaderFormat::default()).await?;
    tracing::info!(table = name, columns = header.len(), "provisioned submissions table");

    Ok(TableHandle { name: name.to_string(), header })
}

fn build_header(candidates: &[String]) -> Vec<String> {
    if candidates.is_empty() {
        return columns::DEFAULT_HEADERS.iter().map(|name| (*name).to_string()).collect();
    }
    let mut header = candidates.to_vec();
    header.push(columns::HASH_COLUMN.to_string());
    header
}

fn header_names(row: &[Value]) -> Vec<String> {
    row.iter().map(|cell| cell.as_str().unwrap_or_default().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn empty_candidates_provision_default_headers() {
        let store = MemoryStore::new();
        let handle = ensure_table(&store, "Submissions", &[]).await.expect("provision");

        assert_eq!(handle.header.len(), columns::DEFAULT_HEADERS.len());
        assert_eq!(handle.header.last().map(String::as_str), Some(columns::HASH_COLUMN));
    }

    #[tokio::test]
    async fn candidates_gain_a_trailing_hash_column() {
        let store = MemoryStore::new();
        let candidates = vec!["Role".to_string(), "Team".to_string()];
        let handle = ensure_table(&store, "Submissions", &candidates).await.expect("provision");

        assert_eq!(handle.header, ["Role", "Team", columns::HASH_COLUMN]);
    }

    #[tokio::test]
    async fn existing_header_wins_over_candidates() {
        let store = MemoryStore::new();
        let first = vec!["Role".to_string()];
        ensure_table(&store, "Submissions", &first).await.expect("provision");

        let later = vec!["Completely".to_string(), "Different".to_string()];
        let handle = ensure_table(&store, "Submissions", &later).await.expect("reopen");
        assert_eq!(handle.header, ["Role", columns::HASH_COLUMN]);
    }

    #[tokio::test]
    async fn provisioning_formats_the_header_row() {
        let store = MemoryStore::new();
        ensure_table(&store, "Submissions", &[]).await.expect("provision");

        let format = store.header_format("Submissions").expect("format recorded");
        assert!(format.bold);
        assert_eq!(format.frozen_rows, 1);
    }
}
