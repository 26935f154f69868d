//! In-memory row store for tests and the harness.
//!
//! Keeps whole tables behind one `RwLock`. Good enough for a survey's row
//! counts and for exercising every operation without external state; the
//! recorded header formatting lets tests assert provisioning side effects.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{CoreError, Result},
    store::{HeaderFormat, RowStore},
};

#[derive(Debug)]
struct TableData {
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
    format: Option<HeaderFormat>,
}

/// In-memory [`RowStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, TableData>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the formatting recorded for a table's header row, if any.
    pub fn header_format(&self, table: &str) -> Option<HeaderFormat> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.get(table).and_then(|data| data.format)
    }

    /// Number of data rows in a table, not counting the header.
    pub fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.get(table).map_or(0, |data| data.rows.len())
    }
}

fn missing(table: &str) -> CoreError {
    CoreError::Store(format!("table '{table}' does not exist"))
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.contains_key(table))
    }

    async fn create_table(&self, table: &str, header: &[String]) -> Result<()> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if tables.contains_key(table) {
            return Err(CoreError::Store(format!("table '{table}' already exists")));
        }
        tables.insert(
            table.to_string(),
            TableData { header: header.to_vec(), rows: Vec::new(), format: None },
        );
        Ok(())
    }

    async fn append_row(&self, table: &str, row: &[Value]) -> Result<()> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let data = tables.get_mut(table).ok_or_else(|| missing(table))?;
        data.rows.push(row.to_vec());
        Ok(())
    }

    async fn read_all(&self, table: &str) -> Result<Vec<Vec<Value>>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let data = tables.get(table).ok_or_else(|| missing(table))?;

        let header_row = data.header.iter().cloned().map(Value::String).collect();
        let mut rows = Vec::with_capacity(data.rows.len() + 1);
        rows.push(header_row);
        rows.extend(data.rows.iter().cloned());
        Ok(rows)
    }

    async fn read_cell(&self, table: &str, row: usize, col: usize) -> Result<Option<Value>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let data = tables.get(table).ok_or_else(|| missing(table))?;

        if row == 0 {
            return Ok(data.header.get(col).cloned().map(Value::String));
        }
        Ok(data.rows.get(row - 1).and_then(|cells| cells.get(col)).cloned())
    }

    async fn write_cell(&self, table: &str, row: usize, col: usize, value: Value) -> Result<()> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let data = tables.get_mut(table).ok_or_else(|| missing(table))?;

        if row == 0 {
            return Err(CoreError::Store("header row is immutable".to_string()));
        }
        let cells = data
            .rows
            .get_mut(row - 1)
            .ok_or_else(|| CoreError::Store(format!("row {row} is out of range")))?;
        let cell = cells
            .get_mut(col)
            .ok_or_else(|| CoreError::Store(format!("column {col} is out of range")))?;
        *cell = value;
        Ok(())
    }

    async fn format_header(&self, table: &str, format: HeaderFormat) -> Result<()> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let data = tables.get_mut(table).ok_or_else(|| missing(table))?;
        data.format = Some(format);
        Ok(())
    }
}
