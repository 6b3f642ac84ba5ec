//! Input table ingestion
//!
//! Reads target URLs from a CSV file. The URL column is located by header name,
//! ignoring case, and falls back to the first column when no header matches.
//! Values that do not look like http(s) URLs are skipped.

use crate::url::{clean_input_value, is_http_url};
use crate::{KumadeError, Result};
use std::path::Path;

/// Loads target URLs from a CSV file in row order
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Accepted URLs, possibly empty
/// * `Err(KumadeError)` - The file could not be read or parsed
pub fn load_targets(path: &Path, url_column: &str) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(KumadeError::Input(format!(
            "input file {} does not exist",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = match headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(url_column.trim()))
    {
        Some(idx) => idx,
        None => {
            tracing::warn!(
                "Column '{}' not found in {}, using first column '{}'",
                url_column,
                path.display(),
                headers.get(0).unwrap_or("")
            );
            0
        }
    };

    let mut urls = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let Some(raw) = record.get(column) else {
            skipped += 1;
            continue;
        };

        let value = clean_input_value(raw);
        if is_http_url(value) {
            urls.push(value.to_string());
        } else {
            if !value.is_empty() {
                tracing::debug!("Skipping non-URL input value: {}", value);
            }
            skipped += 1;
        }
    }

    tracing::info!(
        "Loaded {} URLs from {} ({} rows skipped)",
        urls.len(),
        path.display(),
        skipped
    );

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_loads_named_column() {
        let file = csv_file(
            "name,url\nJane,https://www.linkedin.com/in/jane\nBob,https://www.linkedin.com/sales/lead/1\n",
        );
        let urls = load_targets(file.path(), "url").unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.linkedin.com/in/jane",
                "https://www.linkedin.com/sales/lead/1"
            ]
        );
    }

    #[test]
    fn test_header_match_ignores_case() {
        let file = csv_file("Name,Profile URL\nJane,https://x.com/in/jane\n");
        let urls = load_targets(file.path(), "profile url").unwrap();
        assert_eq!(urls, vec!["https://x.com/in/jane"]);
    }

    #[test]
    fn test_falls_back_to_first_column() {
        let file = csv_file("links,notes\nhttps://x.com/in/a,first\nhttps://x.com/in/b,second\n");
        let urls = load_targets(file.path(), "url").unwrap();
        assert_eq!(urls, vec!["https://x.com/in/a", "https://x.com/in/b"]);
    }

    #[test]
    fn test_skips_non_url_values() {
        let file = csv_file(
            "url\nhttps://x.com/in/a\n\n42\nwww.x.com/in/nope\n\"https://x.com/in/b\"\nftp://x.com/f\n",
        );
        let urls = load_targets(file.path(), "url").unwrap();
        assert_eq!(urls, vec!["https://x.com/in/a", "https://x.com/in/b"]);
    }

    #[test]
    fn test_quoted_sales_url_keeps_commas() {
        let file = csv_file(
            "name,url\nBob,\"https://www.linkedin.com/sales/lead/ACwAAA1,NAME_SEARCH,x9Zq\"\n",
        );
        let urls = load_targets(file.path(), "url").unwrap();
        assert_eq!(
            urls,
            vec!["https://www.linkedin.com/sales/lead/ACwAAA1,NAME_SEARCH,x9Zq"]
        );
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let file = csv_file("name,url\nJane,https://x.com/in/jane\nOnlyName\n");
        let urls = load_targets(file.path(), "url").unwrap();
        assert_eq!(urls, vec!["https://x.com/in/jane"]);
    }

    #[test]
    fn test_missing_file() {
        let result = load_targets(Path::new("/nonexistent/profiles.csv"), "url");
        assert!(matches!(result, Err(KumadeError::Input(_))));
    }

    #[test]
    fn test_empty_table_yields_no_urls() {
        let file = csv_file("url\n");
        assert!(load_targets(file.path(), "url").unwrap().is_empty());
    }
}
