//! Crawler module for visiting and extracting profile pages
//!
//! This module contains the core crawling logic, including:
//! - Page loading with navigation and readiness bounds
//! - Per-variant record extraction with nested company visits
//! - Manual login gating and randomized pacing
//! - Overall run coordination

mod context;
mod coordinator;
mod extractor;
mod login;
mod nested;
mod pacing;
mod scheduler;

pub use context::{load_page, PageContext, Timing};
pub use coordinator::{run_crawl, Coordinator};
pub use extractor::{current_position, PageExtractor, RecordExtractor};
pub use login::{login_order, ConsoleGate, LoginGate, PreAuthenticated};
pub use nested::{resolve_company, NestedFetcher};
pub use pacing::DelayWindow;
pub use scheduler::CrawlScheduler;

use crate::config::Config;
use crate::output::RunSummary;
use crate::Result;

/// Runs a complete crawl
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Load target URLs from the input table
/// 2. Open the result store
/// 3. Start a browser session
/// 4. Wait for the operator to log in
/// 5. Visit and extract every URL, pacing between items
/// 6. Append the batch to the result table and print a summary
///
/// # Arguments
///
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Crawl completed and results were saved
/// * `Err(KumadeError)` - Crawl could not start or could not save
pub async fn crawl(config: Config) -> Result<RunSummary> {
    run_crawl(config).await
}
