//! Submission ingestion.
//!
//! One call per HTTP POST: provision the table if needed, scan the `Hash`
//! column for a duplicate, build the row, append it. The dedup scan is
//! linear over existing rows — fine at a survey's scale; callers needing
//! high-volume ingest should swap in an indexed lookup.
//!
//! A race exists between the scan and the append: two concurrent ingests
//! with the same hash can both pass the scan. Accepted weakness, matching
//! the store's own (lack of) coordination.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::{
    columns,
    error::{CoreError, Result},
    payload::{LegacyFields, SubmissionPayload},
    schema::{self, TableHandle},
    store::RowStore,
    time::Clock,
};

/// Outcome of a successful ingest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    /// The submission row was appended.
    Accepted,
    /// A row with the same hash already exists; nothing was appended.
    Duplicate,
}

/// Ingests one submission.
///
/// # Errors
///
/// [`CoreError::Payload`] when the row shape cannot be aligned with the
/// header, [`CoreError::Store`] on row-store failure. Both are rendered as
/// `{"status":"error"}` bodies at the HTTP boundary.
pub async fn ingest<S: RowStore + ?Sized>(
    store: &S,
    clock: &dyn Clock,
    table: &str,
    payload: &SubmissionPayload,
) -> Result<IngestStatus> {
    let handle = schema::ensure_table(store, table, payload.candidate_headers()).await?;

    if let Some(hash) = payload.hash.as_deref() {
        if !hash.is_empty() && is_duplicate(store, &handle, hash).await? {
            debug!(table, hash, "duplicate submission hash, skipping append");
            return Ok(IngestStatus::Duplicate);
        }
    }

    let row = build_row(&handle.header, clock, payload)?;
    store.append_row(&handle.name, &row).await?;
    debug!(table, cells = row.len(), "submission row appended");

    Ok(IngestStatus::Accepted)
}

/// Scans the `Hash` column top-to-bottom for `hash`. Tables whose header
/// lacks a `Hash` column never deduplicate.
async fn is_duplicate<S: RowStore + ?Sized>(
    store: &S,
    handle: &TableHandle,
    hash: &str,
) -> Result<bool> {
    let Some(hash_col) = handle.header.iter().position(|name| name == columns::HASH_COLUMN)
    else {
        return Ok(false);
    };

    let rows = store.read_all(&handle.name).await?;
    Ok(rows
        .iter()
        .skip(1)
        .any(|row| row.get(hash_col).and_then(Value::as_str) == Some(hash)))
}

fn build_row(
    header: &[String],
    clock: &dyn Clock,
    payload: &SubmissionPayload,
) -> Result<Vec<Value>> {
    match &payload.values {
        Some(values) => positional_row(header, values, payload.hash.as_deref()),
        None => Ok(legacy_row(clock, &payload.legacy, payload.hash.as_deref())),
    }
}

/// Aligns a `values` row with the header.
///
/// A row exactly matching the header length is trusted as-is (the caller
/// already included the hash cell). Shorter rows are padded with empty
/// strings up to the hash column, which receives the payload hash when the
/// header ends in `Hash`. Longer rows never fit the header and are rejected.
fn positional_row(header: &[String], values: &[Value], hash: Option<&str>) -> Result<Vec<Value>> {
    if values.len() > header.len() {
        return Err(CoreError::Payload(format!(
            "row has {} cells but the header has {} columns",
            values.len(),
            header.len()
        )));
    }

    let mut row = values.to_vec();
    if row.len() == header.len() {
        return Ok(row);
    }

    let empty = || Value::String(String::new());
    if header.last().map(String::as_str) == Some(columns::HASH_COLUMN) {
        row.resize_with(header.len() - 1, empty);
        row.push(Value::String(hash.unwrap_or_default().to_string()));
    } else {
        row.resize_with(header.len(), empty);
    }
    Ok(row)
}

/// Builds the nine-cell legacy row in its hardcoded field order, `hash`
/// last. Kept byte-compatible with the old sender: the row is appended
/// as-is, without padding to the current header width.
fn legacy_row(clock: &dyn Clock, legacy: &LegacyFields, hash: Option<&str>) -> Vec<Value> {
    let timestamp = legacy.timestamp.clone().unwrap_or_else(|| {
        DateTime::<Utc>::from(clock.now_system()).to_rfc3339_opts(SecondsFormat::Secs, true)
    });
    let text = |field: &Option<String>| Value::String(field.clone().unwrap_or_default());

    vec![
        Value::String(timestamp),
        text(&legacy.role),
        text(&legacy.func),
        text(&legacy.archetype),
        text(&legacy.scores),
        text(&legacy.email),
        text(&legacy.company),
        text(&legacy.comments),
        Value::String(hash.unwrap_or_default().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::time::TestClock;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn full_width_row_is_trusted_as_is() {
        let header = header(&["A", "Hash"]);
        let row = positional_row(&header, &[json!("x"), json!("h-from-caller")], Some("h-other"))
            .expect("aligned");
        assert_eq!(row, vec![json!("x"), json!("h-from-caller")]);
    }

    #[test]
    fn one_short_row_gains_the_hash_cell() {
        let header = header(&["A", "B", "Hash"]);
        let row = positional_row(&header, &[json!("x"), json!("y")], Some("h1")).expect("aligned");
        assert_eq!(row, vec![json!("x"), json!("y"), json!("h1")]);
    }

    #[test]
    fn missing_hash_fills_empty_string() {
        let header = header(&["A", "Hash"]);
        let row = positional_row(&header, &[json!("x")], None).expect("aligned");
        assert_eq!(row, vec![json!("x"), json!("")]);
    }

    #[test]
    fn very_short_row_pads_up_to_the_hash_column() {
        let header = header(&["A", "B", "C", "Hash"]);
        let row = positional_row(&header, &[json!("x")], Some("h1")).expect("aligned");
        assert_eq!(row, vec![json!("x"), json!(""), json!(""), json!("h1")]);
    }

    #[test]
    fn oversized_row_is_rejected() {
        let header = header(&["A", "Hash"]);
        let err = positional_row(&header, &[json!(1), json!(2), json!(3)], None)
            .expect_err("must reject");
        assert!(matches!(err, CoreError::Payload(_)));
    }

    #[test]
    fn legacy_row_uses_clock_when_timestamp_absent() {
        let clock = TestClock::with_start_time(
            std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000),
        );
        let legacy = LegacyFields {
            role: Some("X".to_string()),
            func: Some("Y".to_string()),
            ..LegacyFields::default()
        };

        let row = legacy_row(&clock, &legacy, Some("h1"));
        assert_eq!(row.len(), 9);
        assert_eq!(row[0], json!("2023-11-14T22:13:20Z"));
        assert_eq!(row[1], json!("X"));
        assert_eq!(row[2], json!("Y"));
        assert_eq!(&row[3..8], &[json!(""), json!(""), json!(""), json!(""), json!("")]);
        assert_eq!(row[8], json!("h1"));
    }

    #[test]
    fn legacy_row_keeps_a_supplied_timestamp() {
        let clock = TestClock::new();
        let legacy =
            LegacyFields { timestamp: Some("2024-01-01T00:00:00Z".to_string()), ..Default::default() };

        let row = legacy_row(&clock, &legacy, None);
        assert_eq!(row[0], json!("2024-01-01T00:00:00Z"));
        assert_eq!(row[8], json!(""));
    }
}
