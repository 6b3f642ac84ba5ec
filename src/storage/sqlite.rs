//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the TableStore trait.

use crate::output::{ResultTable, TableRow, COLUMN_COUNT};
use crate::storage::schema::{column_list, initialize_schema, RESULTS_TABLE};
use crate::storage::traits::{StorageResult, TableStore};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};

/// SQLite storage backend
pub struct SqliteTableStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteTableStore {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteTableStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn row_count(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", RESULTS_TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl TableStore for SqliteTableStore {
    fn load(&self) -> StorageResult<Option<ResultTable>> {
        if self.row_count()? == 0 {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY position ASC",
            column_list(),
            RESULTS_TABLE
        ))?;

        let rows = stmt
            .query_map([], |row| {
                let mut cells = Vec::with_capacity(COLUMN_COUNT);
                for i in 0..COLUMN_COUNT {
                    cells.push(row.get::<_, String>(i)?);
                }
                Ok(TableRow::from_cells(cells))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(ResultTable::from_rows(rows)))
    }

    fn save(&mut self, table: &ResultTable) -> StorageResult<()> {
        let placeholders = vec!["?"; COLUMN_COUNT + 1].join(", ");
        let insert = format!(
            "INSERT INTO {} (position, {}) VALUES ({})",
            RESULTS_TABLE,
            column_list(),
            placeholders
        );

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", RESULTS_TABLE), [])?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for (position, row) in table.rows().iter().enumerate() {
                let values = std::iter::once(Value::Integer(position as i64))
                    .chain(row.cells().iter().map(|c| Value::Text(c.clone())));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        tracing::debug!("Wrote {} rows to {}", table.len(), self.describe());
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite database {}", path.display()),
            None => "sqlite database (in memory)".to_string(),
        }
    }
}
