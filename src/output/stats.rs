//! Statistics over a run's batch and over the persisted table
//!
//! This module provides the end-of-run summary and the `--stats` report.

use crate::output::table::{Column, ResultTable};
use crate::record::CrawlOutcome;
use std::collections::{BTreeMap, HashSet};

/// Outcome counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_batch(batch: &[CrawlOutcome]) -> Self {
        let successful = batch.iter().filter(|o| o.is_success()).count();
        Self {
            total: batch.len(),
            successful,
            failed: batch.len() - successful,
        }
    }
}

/// Statistics over the persisted table
#[derive(Debug, Clone, Default)]
pub struct TableStatistics {
    /// Total number of rows
    pub total_rows: usize,

    /// Rows per variant tag
    pub rows_by_variant: BTreeMap<String, usize>,

    /// Rows standing in for failed items
    pub placeholder_rows: usize,

    /// Number of distinct profile URLs
    pub distinct_urls: usize,

    /// Non-placeholder rows with a resolved company name
    pub rows_with_company: usize,
}

/// Computes statistics for a loaded table
pub fn table_statistics(table: &ResultTable) -> TableStatistics {
    let mut stats = TableStatistics {
        total_rows: table.len(),
        ..TableStatistics::default()
    };
    let mut urls = HashSet::new();

    for row in table.rows() {
        let variant = match row.get(Column::Variant) {
            "" => "unknown",
            v => v,
        };
        *stats.rows_by_variant.entry(variant.to_string()).or_insert(0) += 1;

        if row.is_placeholder() {
            stats.placeholder_rows += 1;
        } else if !row.get(Column::CompanyName).is_empty() {
            stats.rows_with_company += 1;
        }

        urls.insert(row.get(Column::ProfileUrl));
    }

    stats.distinct_urls = urls.len();
    stats
}

/// Prints the end-of-run summary line
pub fn print_run_summary(summary: &RunSummary) {
    println!(
        "Scraped {}/{} profiles successfully ({} failed)",
        summary.successful, summary.total, summary.failed
    );
}

/// Prints table statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &TableStatistics) {
    println!("=== Result Table Statistics ===\n");

    println!("Overview:");
    println!("  Total rows: {}", stats.total_rows);
    println!("  Distinct profile URLs: {}", stats.distinct_urls);
    println!("  Rows with a company: {}", stats.rows_with_company);
    println!();

    println!("Rows by Variant:");
    let mut variant_counts: Vec<_> = stats.rows_by_variant.iter().collect();
    variant_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (variant, count) in variant_counts {
        println!("  {}: {} ({:.1}%)", variant, count, percentage(*count, stats.total_rows));
    }
    println!();

    let extracted = stats.total_rows - stats.placeholder_rows;
    println!(
        "Success Rate: {:.1}% ({} / {} rows extracted, {} error placeholders)",
        percentage(extracted, stats.total_rows),
        extracted,
        stats.total_rows,
        stats.placeholder_rows
    );
}

fn percentage(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::merge;
    use crate::record::{FailedItem, ProfileRecord};
    use crate::url::Variant;

    fn extracted(url: &str, variant: Variant, company: &str) -> CrawlOutcome {
        let mut record = ProfileRecord::new(url, variant);
        record.full_name = "Some Person".to_string();
        record.company.name = company.to_string();
        CrawlOutcome::Extracted(record)
    }

    #[test]
    fn test_run_summary_from_batch() {
        let batch = vec![
            extracted("u1", Variant::Profile, ""),
            CrawlOutcome::Failed(FailedItem::new("u2", Variant::Profile, "x")),
            extracted("u3", Variant::Sales, ""),
        ];
        let summary = RunSummary::from_batch(&batch);
        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                successful: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_run_summary_empty() {
        assert_eq!(RunSummary::from_batch(&[]), RunSummary::default());
    }

    #[test]
    fn test_table_statistics() {
        let table = merge(
            None,
            &[
                extracted("u1", Variant::Profile, "Acme"),
                extracted("u1", Variant::Profile, ""),
                extracted("u2", Variant::Sales, "Globex"),
                CrawlOutcome::Failed(FailedItem::new("u3", Variant::Sales, "boom")),
            ],
        );

        let stats = table_statistics(&table);
        assert_eq!(stats.total_rows, 4);
        assert_eq!(stats.placeholder_rows, 1);
        assert_eq!(stats.distinct_urls, 3);
        assert_eq!(stats.rows_with_company, 2);
        assert_eq!(stats.rows_by_variant.get("profile"), Some(&2));
        assert_eq!(stats.rows_by_variant.get("sales"), Some(&2));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
