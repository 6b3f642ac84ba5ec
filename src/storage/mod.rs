//! Storage module for persisting the result table
//!
//! This module handles all table persistence, including:
//! - Choosing a backend from the output path's extension
//! - A CSV file backend with atomic replacement
//! - A SQLite database backend holding one `results` table

mod csv_store;
mod schema;
mod sqlite;
mod traits;

pub use csv_store::CsvTableStore;
pub use sqlite::SqliteTableStore;
pub use traits::{StorageError, StorageResult, TableStore};

use std::path::Path;

/// Backend selected for an output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Csv,
    Sqlite,
}

impl StoreKind {
    /// Picks a backend from the file extension, ignoring case
    ///
    /// Returns None for unsupported or missing extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "db" | "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Opens the table store for an output path
///
/// # Arguments
///
/// * `path` - Path to the output file
///
/// # Returns
///
/// * `Ok(Box<dyn TableStore>)` - Backend matching the file extension
/// * `Err(StorageError)` - Unsupported extension or the database could not be opened
pub fn open_store(path: &Path) -> StorageResult<Box<dyn TableStore>> {
    match StoreKind::from_path(path) {
        Some(StoreKind::Csv) => Ok(Box::new(CsvTableStore::new(path))),
        Some(StoreKind::Sqlite) => Ok(Box::new(SqliteTableStore::open(path)?)),
        None => Err(StorageError::UnsupportedFormat(path.display().to_string())),
    }
}
