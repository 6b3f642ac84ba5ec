//! Sequential crawl scheduling
//!
//! This module handles:
//! - The run phase machine (`Idle → AwaitingAuth → Processing(i) → Done`)
//! - Manual login gating per variant before the first item
//! - Randomized pauses between items, never after the last
//! - Converting any item error or panic into a placeholder outcome
//!
//! Items run strictly one after another on a single page.

use crate::browser::PageDriver;
use crate::config::LoginConfig;
use crate::crawler::context::{load_page, PageContext, Timing};
use crate::crawler::extractor::RecordExtractor;
use crate::crawler::login::{login_order, LoginGate};
use crate::crawler::pacing::DelayWindow;
use crate::record::{CrawlOutcome, FailedItem, ProfileRecord};
use crate::state::RunPhase;
use crate::url::{classify, Variant};
use crate::Result;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

/// Drives one run over a list of URLs
pub struct CrawlScheduler<'a> {
    driver: &'a dyn PageDriver,
    extractor: &'a dyn RecordExtractor,
    gate: &'a dyn LoginGate,
    login: LoginConfig,
    pacing: DelayWindow,
    timing: Timing,
    phase: RunPhase,
    item_starts: Vec<Instant>,
}

impl<'a> CrawlScheduler<'a> {
    /// Creates a scheduler in the `Idle` phase
    pub fn new(
        driver: &'a dyn PageDriver,
        extractor: &'a dyn RecordExtractor,
        gate: &'a dyn LoginGate,
        login: LoginConfig,
        pacing: DelayWindow,
        timing: Timing,
    ) -> Self {
        Self {
            driver,
            extractor,
            gate,
            login,
            pacing,
            timing,
            phase: RunPhase::Idle,
            item_starts: Vec::new(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// When each item started processing, in crawl order
    pub fn item_starts(&self) -> &[Instant] {
        &self.item_starts
    }

    /// Runs every URL and returns one outcome per URL, in input order
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CrawlOutcome>)` - The batch; item failures are placeholders
    /// * `Err(KumadeError)` - The login acknowledgement could not be read
    pub async fn run(&mut self, urls: &[String]) -> Result<Vec<CrawlOutcome>> {
        self.authenticate(urls).await?;

        let total = urls.len();
        let mut batch = Vec::with_capacity(total);

        for (i, url) in urls.iter().enumerate() {
            if i > 0 {
                self.pacing.pause().await;
            }
            self.transition(RunPhase::Processing(i));
            self.item_starts.push(Instant::now());

            let variant = classify(url);
            tracing::info!("[{}/{}] Visiting {} ({})", i + 1, total, url, variant);

            let outcome = self.process(url, variant).await;
            match &outcome {
                CrawlOutcome::Extracted(record) => {
                    tracing::info!("✓ Extracted {}", display_name(record));
                }
                CrawlOutcome::Failed(failed) => {
                    tracing::warn!("✗ Failed {}: {}", url, failed.error);
                }
            }
            batch.push(outcome);
        }

        self.transition(RunPhase::Done);
        Ok(batch)
    }

    async fn authenticate(&mut self, urls: &[String]) -> Result<()> {
        for variant in login_order(urls) {
            self.transition(RunPhase::AwaitingAuth);

            let login_url = match variant {
                Variant::Sales => self.login.sales_url.clone(),
                Variant::Profile => self.login.profile_url.clone(),
            };
            if let Err(e) = load_page(self.driver, &login_url, &self.timing).await {
                tracing::warn!("Could not open login page {}: {}", login_url, e);
            }

            self.gate.wait_for_login(variant).await?;
            tracing::info!("{} login confirmed", variant.display_name());
        }
        Ok(())
    }

    /// Loads and extracts one URL; never fails
    async fn process(&self, url: &str, variant: Variant) -> CrawlOutcome {
        let attempt = AssertUnwindSafe(self.visit(url, variant))
            .catch_unwind()
            .await;

        match attempt {
            Ok(Ok(record)) => CrawlOutcome::Extracted(record),
            Ok(Err(e)) => CrawlOutcome::Failed(FailedItem::new(url, variant, e)),
            Err(panic) => CrawlOutcome::Failed(FailedItem::new(url, variant, panic_message(panic.as_ref()))),
        }
    }

    async fn visit(&self, url: &str, variant: Variant) -> Result<ProfileRecord> {
        load_page(self.driver, url, &self.timing).await?;
        let ctx = PageContext::new(self.driver, url);
        self.extractor.extract(&ctx, variant).await
    }

    fn transition(&mut self, next: RunPhase) {
        match self.phase.advance(next) {
            Ok(()) => tracing::debug!("Run phase: {}", self.phase),
            Err(e) => tracing::error!("{}", e),
        }
    }
}

fn display_name(record: &ProfileRecord) -> &str {
    if record.full_name.is_empty() {
        &record.source_url
    } else {
        &record.full_name
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("extraction panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("extraction panicked: {}", msg)
    } else {
        "extraction panicked".to_string()
    }
}
