//! Browser driver capability
//!
//! The crawl engine talks to a live page only through [`PageDriver`]. The
//! production implementation drives Chrome over the DevTools protocol; the
//! in-memory implementation replays fixed HTML and is used for tests and for
//! exercising the engine without a browser.

mod chrome;
mod memory;

pub use chrome::{discover_websocket_url, ChromeSession};
pub use memory::MemoryDriver;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a page driver
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to connect to browser at {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    #[error("DevTools discovery failed: {0}")]
    Discovery(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Browser session is closed")]
    Closed,
}

/// Result type for driver operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// Operations the engine needs from a live page
///
/// Call sites treat every failure as "no match"; only the scheduler turns a
/// failed navigation into an item failure.
#[async_trait(?Send)]
pub trait PageDriver {
    /// Loads `url` in the active tab
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// Polls until an element matching `selector` exists or `timeout` elapses
    ///
    /// Returns `Ok(false)` on timeout.
    async fn wait_for_ready(&self, selector: &str, timeout: Duration) -> BrowserResult<bool>;

    /// URL of the active tab
    async fn current_url(&self) -> BrowserResult<String>;

    /// Serialized rendered DOM of the active tab
    async fn snapshot(&self) -> BrowserResult<String>;

    /// Evaluates a script in the page and returns its JSON result
    async fn execute_script(&self, script: &str) -> BrowserResult<serde_json::Value>;

    /// Clicks the first element matching `css` whose text contains `needle`
    ///
    /// The click is dispatched from page script so elements hidden behind
    /// overlays still receive it. Returns `Ok(false)` when nothing matched.
    async fn click(&self, css: &str, needle: Option<&str>) -> BrowserResult<bool> {
        let script = click_script(css, needle);
        let result = self.execute_script(&script).await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    /// Releases the session
    async fn close(&self) -> BrowserResult<()>;
}

/// Builds the in-page script used by [`PageDriver::click`]
pub fn click_script(css: &str, needle: Option<&str>) -> String {
    let css = serde_json::Value::String(css.to_string());
    let needle = serde_json::Value::String(needle.unwrap_or("").to_lowercase());
    format!(
        r#"(() => {{
    const needle = {needle};
    const candidates = Array.from(document.querySelectorAll({css}));
    const target = candidates.find((el) => {{
        const visible = el.offsetParent !== null || el.getClientRects().length > 0;
        const text = (el.innerText || el.textContent || '').toLowerCase();
        return visible && (!needle || text.includes(needle));
    }});
    if (!target) return false;
    target.click();
    return true;
}})()"#
    )
}
