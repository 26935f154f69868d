//! Submission read-back.
//!
//! Maps stored rows to JSON objects: each header is renamed through the
//! fixed key table and each cell passes through read-back coercion. Output
//! order is storage order, oldest first.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    coerce::coerce_cell,
    columns,
    error::{CoreError, Result},
    store::RowStore,
};

/// The only action the read API recognizes, and the default when the query
/// carries none.
pub const ACTION_GET_ALL: &str = "getAll";

/// A retrieved submission: stable output key to coerced scalar.
pub type SubmissionObject = Map<String, Value>;

/// Reads all submissions from `table`.
///
/// A missing table, or one holding only its header row, reads as an empty
/// list — not an error.
///
/// # Errors
///
/// [`CoreError::UnknownAction`] for any action other than
/// [`ACTION_GET_ALL`]; [`CoreError::Store`] on row-store failure.
pub async fn retrieve<S: RowStore + ?Sized>(
    store: &S,
    table: &str,
    action: &str,
) -> Result<Vec<SubmissionObject>> {
    if action != ACTION_GET_ALL {
        return Err(CoreError::UnknownAction(action.to_string()));
    }

    if !store.table_exists(table).await? {
        return Ok(Vec::new());
    }

    let rows = store.read_all(table).await?;
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let header: Vec<String> = header_row
        .iter()
        .map(|cell| cell.as_str().unwrap_or_default().to_string())
        .collect();

    debug!(table, rows = data_rows.len(), "retrieved submissions");
    Ok(data_rows.iter().map(|row| submission_object(&header, row)).collect())
}

/// Builds one output object from a stored row. Rows with missing trailing
/// cells simply omit those keys.
fn submission_object(header: &[String], row: &[Value]) -> SubmissionObject {
    header
        .iter()
        .zip(row.iter())
        .map(|(name, cell)| {
            (columns::output_key(name).to_string(), coerce_cell(cell.clone()))
        })
        .collect()
}
