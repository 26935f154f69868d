//! Row-store collaborators.
//!
//! The spreadsheet behind the survey is modeled as a named table: a header
//! row followed by append-only data rows. Ingest and retrieve are written
//! against this trait so they stay pure functions of (payload, store) — unit
//! tests run against [`MemoryStore`], production runs against
//! [`SqliteStore`]. Any tabular backend with this capability set is
//! substitutable.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Presentation hints applied to a header row at creation time.
///
/// A presentation concern, not a correctness one — backends without a
/// presentation layer persist the flags and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFormat {
    /// Render the header row in bold.
    pub bold: bool,
    /// Number of leading rows pinned as non-scrollable.
    pub frozen_rows: u32,
}

impl Default for HeaderFormat {
    fn default() -> Self {
        Self { bold: true, frozen_rows: 1 }
    }
}

/// Abstract table persistence.
///
/// Rows are ordered sequences of JSON scalars. Row 0 is the header row;
/// stores tolerate data rows with missing trailing cells (the write path is
/// responsible for row shape, not the store).
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Reports whether `table` exists.
    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// Creates `table` with `header` as its first row.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::CoreError::Store`] when the table already exists —
    /// header rows are immutable for the lifetime of a table.
    async fn create_table(&self, table: &str, header: &[String]) -> Result<()>;

    /// Appends a data row after the last existing row.
    async fn append_row(&self, table: &str, row: &[Value]) -> Result<()>;

    /// Reads every row including the header row, in insertion order.
    async fn read_all(&self, table: &str) -> Result<Vec<Vec<Value>>>;

    /// Reads a single cell. Row 0 is the header row. Out-of-range
    /// coordinates read as `None`.
    async fn read_cell(&self, table: &str, row: usize, col: usize) -> Result<Option<Value>>;

    /// Writes a single cell of an existing data row.
    ///
    /// # Errors
    ///
    /// Fails when the coordinates are out of range, or when `row` is 0 —
    /// the header row is immutable.
    async fn write_cell(&self, table: &str, row: usize, col: usize, value: Value) -> Result<()>;

    /// Applies presentation formatting to the header row.
    async fn format_header(&self, table: &str, format: HeaderFormat) -> Result<()>;
}
