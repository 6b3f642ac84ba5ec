//! Storage traits and error types
//!
//! This module defines the trait interface for table persistence backends and
//! associated error types.

use crate::output::ResultTable;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for table persistence backends
///
/// Both operations see the whole table: the aggregator loads what a previous
/// run left behind, extends it in memory and hands the full table back.
pub trait TableStore {
    /// Loads the persisted table
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> StorageResult<Option<ResultTable>>;

    /// Replaces the persisted table with `table`
    ///
    /// Implementations must not leave a partially written table behind.
    fn save(&mut self, table: &ResultTable) -> StorageResult<()>;

    /// Short description used in log lines
    fn describe(&self) -> String;
}
