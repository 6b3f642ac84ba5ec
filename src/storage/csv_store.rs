//! CSV file storage implementation

use crate::output::{ResultTable, TableRow};
use crate::storage::traits::{StorageResult, TableStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Table store backed by a single CSV file with a header row
pub struct CsvTableStore {
    path: PathBuf,
}

impl CsvTableStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl TableStore for CsvTableStore {
    fn load(&self) -> StorageResult<Option<ResultTable>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let mut table = ResultTable::new();

        for record in reader.records() {
            let record = record?;
            table.push(TableRow::from_named_cells(headers.iter(), record.iter()));
        }

        tracing::debug!("Loaded {} rows from {}", table.len(), self.path.display());
        Ok(Some(table))
    }

    fn save(&mut self, table: &ResultTable) -> StorageResult<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(&dir)?;

        // Written next to the target so the final rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            writer.write_record(ResultTable::headers())?;
            for row in table.rows() {
                writer.write_record(row.cells())?;
            }
            writer.flush()?;
        }
        tmp.as_file_mut().flush()?;

        tmp.persist(&self.path).map_err(|e| e.error)?;
        tracing::debug!("Wrote {} rows to {}", table.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}
