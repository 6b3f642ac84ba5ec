//! Database schema definitions
//!
//! The `results` table mirrors the fixed column schema: one TEXT column per
//! output column plus a `position` key that preserves row order.

use crate::output::Column;

/// Name of the table holding result rows
pub const RESULTS_TABLE: &str = "results";

/// Builds the CREATE TABLE statement for the results table
pub fn schema_sql() -> String {
    let columns: Vec<String> = Column::ALL
        .iter()
        .map(|c| format!("    {} TEXT NOT NULL DEFAULT ''", c.db_name()))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    position INTEGER PRIMARY KEY,\n{}\n);",
        RESULTS_TABLE,
        columns.join(",\n")
    )
}

/// Comma-separated list of data columns in output order
pub fn column_list() -> String {
    Column::ALL
        .iter()
        .map(|c| c.db_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&schema_sql())?;
    Ok(())
}
