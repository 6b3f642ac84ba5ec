//! Result aggregation
//!
//! Merging is append-only: prior rows keep their order, new rows follow in
//! crawl order, and nothing is de-duplicated.

use crate::output::table::{ResultTable, TableRow};
use crate::record::CrawlOutcome;
use crate::storage::{StorageResult, TableStore};

/// Merges a batch of outcomes after the rows of an existing table
pub fn merge(existing: Option<ResultTable>, batch: &[CrawlOutcome]) -> ResultTable {
    let mut table = existing.unwrap_or_default();
    for outcome in batch {
        table.push(TableRow::from_outcome(outcome));
    }
    table
}

/// Loads the persisted table, appends the batch and writes the result back
///
/// # Returns
///
/// * `Ok(ResultTable)` - The table as persisted
/// * `Err(StorageError)` - Loading or saving failed
pub fn persist_batch(
    store: &mut dyn TableStore,
    batch: &[CrawlOutcome],
) -> StorageResult<ResultTable> {
    let existing = store.load()?;
    let prior = existing.as_ref().map(ResultTable::len).unwrap_or(0);

    let table = merge(existing, batch);
    store.save(&table)?;

    tracing::info!(
        "Saved {} rows to {} ({} existing, {} new)",
        table.len(),
        store.describe(),
        prior,
        batch.len()
    );

    Ok(table)
}
