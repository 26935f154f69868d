//! SQLite-backed row store.
//!
//! Each logical table is one metadata record (name, header row, formatting
//! flags) plus ordered data rows serialized as JSON arrays. Insertion order
//! is rowid order, which gives retrieve its oldest-first guarantee. A single
//! pooled connection serializes writers; whatever further concurrency
//! control callers get is SQLite's own.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::{
    error::{CoreError, Result},
    store::{HeaderFormat, RowStore},
};

/// SQLite [`RowStore`] implementation over an sqlx pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to a SQLite database and bootstraps the backing schema.
    ///
    /// Accepts any sqlx SQLite URL, e.g. `sqlite://tally.db?mode=rwc` or
    /// `sqlite::memory:`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] when the database cannot be opened or
    /// the backing schema cannot be created.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new().max_connections(1).connect(url).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool. The backing schema must already exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Closes the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Creates the backing tables when they do not exist yet.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sheets (
                name TEXT PRIMARY KEY,
                header TEXT NOT NULL,
                header_bold INTEGER NOT NULL DEFAULT 0,
                frozen_rows INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sheet_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sheet TEXT NOT NULL REFERENCES sheets(name),
                cells TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet ON sheet_rows(sheet, id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn header(&self, table: &str) -> Result<Option<Vec<String>>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT header FROM sheets WHERE name = ?")
                .bind(table)
                .fetch_optional(&self.pool)
                .await?;

        raw.map(|json| decode_cells::<Vec<String>>(&json)).transpose()
    }

    async fn data_row(&self, table: &str, index: usize) -> Result<Option<(i64, Vec<Value>)>> {
        let offset = to_i64(index)?;
        let record: Option<(i64, String)> = sqlx::query_as(
            "SELECT id, cells FROM sheet_rows WHERE sheet = ? ORDER BY id LIMIT 1 OFFSET ?",
        )
        .bind(table)
        .bind(offset)
        .fetch_optional(&self.pool)
        .await?;

        record
            .map(|(id, json)| Ok((id, decode_cells::<Vec<Value>>(&json)?)))
            .transpose()
    }
}

fn missing(table: &str) -> CoreError {
    CoreError::Store(format!("table '{table}' does not exist"))
}

fn decode_cells<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|err| CoreError::Store(format!("corrupt row payload: {err}")))
}

fn encode_cells<T: serde::Serialize>(cells: &T) -> Result<String> {
    serde_json::to_string(cells)
        .map_err(|err| CoreError::Store(format!("unencodable row payload: {err}")))
}

fn to_i64(index: usize) -> Result<i64> {
    i64::try_from(index).map_err(|_| CoreError::Store(format!("row index {index} out of range")))
}

#[async_trait]
impl RowStore for SqliteStore {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sheets WHERE name = ?")
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn create_table(&self, table: &str, header: &[String]) -> Result<()> {
        if self.table_exists(table).await? {
            return Err(CoreError::Store(format!("table '{table}' already exists")));
        }

        sqlx::query(
            "INSERT INTO sheets (name, header, header_bold, frozen_rows, created_at)
             VALUES (?, ?, 0, 0, ?)",
        )
        .bind(table)
        .bind(encode_cells(&header)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append_row(&self, table: &str, row: &[Value]) -> Result<()> {
        if !self.table_exists(table).await? {
            return Err(missing(table));
        }

        sqlx::query("INSERT INTO sheet_rows (sheet, cells) VALUES (?, ?)")
            .bind(table)
            .bind(encode_cells(&row)?)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn read_all(&self, table: &str) -> Result<Vec<Vec<Value>>> {
        let header = self.header(table).await?.ok_or_else(|| missing(table))?;

        let raw_rows: Vec<String> =
            sqlx::query_scalar("SELECT cells FROM sheet_rows WHERE sheet = ? ORDER BY id")
                .bind(table)
                .fetch_all(&self.pool)
                .await?;

        let mut rows = Vec::with_capacity(raw_rows.len() + 1);
        rows.push(header.into_iter().map(Value::String).collect());
        for raw in &raw_rows {
            rows.push(decode_cells::<Vec<Value>>(raw)?);
        }
        Ok(rows)
    }

    async fn read_cell(&self, table: &str, row: usize, col: usize) -> Result<Option<Value>> {
        let header = self.header(table).await?.ok_or_else(|| missing(table))?;

        if row == 0 {
            return Ok(header.get(col).cloned().map(Value::String));
        }
        match self.data_row(table, row - 1).await? {
            Some((_, cells)) => Ok(cells.get(col).cloned()),
            None => Ok(None),
        }
    }

    async fn write_cell(&self, table: &str, row: usize, col: usize, value: Value) -> Result<()> {
        if !self.table_exists(table).await? {
            return Err(missing(table));
        }
        if row == 0 {
            return Err(CoreError::Store("header row is immutable".to_string()));
        }

        let (id, mut cells) = self
            .data_row(table, row - 1)
            .await?
            .ok_or_else(|| CoreError::Store(format!("row {row} is out of range")))?;
        let cell = cells
            .get_mut(col)
            .ok_or_else(|| CoreError::Store(format!("column {col} is out of range")))?;
        *cell = value;

        sqlx::query("UPDATE sheet_rows SET cells = ? WHERE id = ?")
            .bind(encode_cells(&cells)?)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn format_header(&self, table: &str, format: HeaderFormat) -> Result<()> {
        let result = sqlx::query("UPDATE sheets SET header_bold = ?, frozen_rows = ? WHERE name = ?")
            .bind(format.bold)
            .bind(i64::from(format.frozen_rows))
            .bind(table)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(missing(table));
        }
        Ok(())
    }
}
