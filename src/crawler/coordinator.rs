//! Crawler coordinator - run orchestration
//!
//! This module ties a run together:
//! - Loading target URLs and opening the result store
//! - Opening the browser session with its startup fallbacks
//! - Driving the scheduler over every URL
//! - Persisting the batch and printing the run summary
//! - Closing the session on every exit path

use crate::browser::{ChromeSession, PageDriver};
use crate::config::Config;
use crate::crawler::context::Timing;
use crate::crawler::extractor::{PageExtractor, RecordExtractor};
use crate::crawler::login::{ConsoleGate, LoginGate};
use crate::crawler::pacing::DelayWindow;
use crate::crawler::scheduler::CrawlScheduler;
use crate::input::load_targets;
use crate::output::{persist_batch, print_run_summary, RunSummary};
use crate::storage::{open_store, TableStore};
use crate::{KumadeError, Result};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::Path;

/// Runs one batch against an open page and a result store
pub struct Coordinator<'a> {
    config: &'a Config,
    driver: &'a dyn PageDriver,
    extractor: &'a dyn RecordExtractor,
    gate: &'a dyn LoginGate,
    store: Box<dyn TableStore>,
}

impl<'a> Coordinator<'a> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration (pacing, timeouts, login pages)
    /// * `driver` - The page every item is loaded into
    /// * `extractor` - Resolves a record from each loaded page
    /// * `gate` - Supplies the manual login acknowledgement
    /// * `store` - Where the merged result table is persisted
    pub fn new(
        config: &'a Config,
        driver: &'a dyn PageDriver,
        extractor: &'a dyn RecordExtractor,
        gate: &'a dyn LoginGate,
        store: Box<dyn TableStore>,
    ) -> Self {
        Self {
            config,
            driver,
            extractor,
            gate,
            store,
        }
    }

    /// Crawls `urls` in order and appends one row per URL to the store
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Outcome counts for the batch
    /// * `Err(KumadeError)` - Login could not be confirmed or saving failed
    pub async fn run(&mut self, urls: &[String]) -> Result<RunSummary> {
        let mut scheduler = CrawlScheduler::new(
            self.driver,
            self.extractor,
            self.gate,
            self.config.login.clone(),
            DelayWindow::from_config(&self.config.crawler),
            Timing::from_config(&self.config.crawler),
        );

        let batch = scheduler.run(urls).await?;

        let summary = RunSummary::from_batch(&batch);
        persist_batch(self.store.as_mut(), &batch)?;
        print_run_summary(&summary);

        Ok(summary)
    }
}

/// Runs a complete crawl from configuration
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run finished and its rows were saved
/// * `Err(KumadeError)` - No input, no browser session, or the run aborted
pub async fn run_crawl(config: Config) -> Result<RunSummary> {
    let input = Path::new(&config.input.path);
    let urls = load_targets(input, &config.input.url_column)?;
    if urls.is_empty() {
        return Err(KumadeError::NoInput(config.input.path.clone()));
    }

    let store = open_store(Path::new(&config.output.path))?;
    tracing::info!("Results will be appended to {}", store.describe());

    let session = ChromeSession::open(&config.browser).await?;

    let extractor = PageExtractor::new(Timing::from_config(&config.crawler));
    let gate = ConsoleGate;
    let mut coordinator = Coordinator::new(&config, &session, &extractor, &gate, store);

    let result = AssertUnwindSafe(coordinator.run(&urls))
        .catch_unwind()
        .await;

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close browser session: {}", e);
    }

    match result {
        Ok(outcome) => outcome,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
