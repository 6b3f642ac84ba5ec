//! Output module for the persisted result table
//!
//! This module handles:
//! - The fixed column schema every row is projected onto
//! - Merging a run's batch into previously persisted output
//! - Run summaries and table statistics

mod aggregate;
pub mod stats;
mod table;

pub use aggregate::{merge, persist_batch};
pub use stats::{print_run_summary, print_statistics, table_statistics, RunSummary, TableStatistics};
pub use table::{Column, ResultTable, TableRow, COLUMN_COUNT, ERROR_MARKER};
