//! Per-item page handle and page loading

use crate::browser::PageDriver;
use crate::config::CrawlerConfig;
use crate::extract::READY_SELECTOR;
use crate::{KumadeError, Result};
use std::time::Duration;
use url::Url;

/// The loaded page for one crawl item
///
/// Lent by the scheduler to the extractor and nested fetcher for the duration
/// of a single item.
pub struct PageContext<'a> {
    driver: &'a dyn PageDriver,
    url: &'a str,
}

impl<'a> PageContext<'a> {
    pub fn new(driver: &'a dyn PageDriver, url: &'a str) -> Self {
        Self { driver, url }
    }

    pub fn driver(&self) -> &'a dyn PageDriver {
        self.driver
    }

    /// The URL the item was requested with
    pub fn url(&self) -> &'a str {
        self.url
    }

    /// URL relative links on the current page resolve against
    ///
    /// Falls back to the requested URL when the driver cannot report one.
    pub async fn base_url(&self) -> Option<Url> {
        let current = self.driver.current_url().await.unwrap_or_default();
        Url::parse(&current).or_else(|_| Url::parse(self.url)).ok()
    }
}

/// Bounds and pauses applied to every page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Bound on a single navigation
    pub page: Duration,
    /// Bound on waiting for main content
    pub ready: Duration,
    /// Pause after main content appears
    pub settle: Duration,
    /// Pause after a reveal click
    pub reveal: Duration,
}

impl Timing {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            page: config.page_timeout(),
            ready: config.ready_timeout(),
            settle: config.settle(),
            reveal: config.reveal_settle(),
        }
    }
}

/// Navigates to `url` and waits for its main content to render
///
/// Main content that never appears is logged and tolerated: the page is still
/// handed to extraction, which resolves whatever did render.
///
/// # Returns
///
/// * `Ok(())` - The page is loaded and settled
/// * `Err(KumadeError)` - Navigation failed or exceeded the page timeout
pub async fn load_page(driver: &dyn PageDriver, url: &str, timing: &Timing) -> Result<()> {
    match tokio::time::timeout(timing.page, driver.navigate(url)).await {
        Err(_) => {
            return Err(KumadeError::Timeout {
                url: url.to_string(),
                seconds: timing.page.as_secs(),
            })
        }
        Ok(Err(e)) => return Err(e.into()),
        Ok(Ok(())) => {}
    }

    if !driver.wait_for_ready(READY_SELECTOR, timing.ready).await? {
        tracing::warn!(
            "Main content of {} not ready after {}s; continuing with extraction",
            url,
            timing.ready.as_secs()
        );
    }

    if !timing.settle.is_zero() {
        tokio::time::sleep(timing.settle).await;
    }
    Ok(())
}
