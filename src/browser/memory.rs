//! In-memory page driver
//!
//! Serves pre-registered HTML by URL. Clicking a registered trigger swaps the
//! current page for its expanded form, which stands in for "show more"
//! toggles. Navigation history and clicks are recorded for assertions.

use crate::browser::{BrowserError, BrowserResult, PageDriver};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct MemoryState {
    pages: HashMap<String, String>,
    expansions: HashMap<(String, String), String>,
    failing: HashSet<String>,
    current_url: String,
    current_html: String,
    history: Vec<String>,
    navigated_at: Vec<Instant>,
    clicks: Vec<String>,
    closed: bool,
}

/// A page driver backed by fixed HTML documents
#[derive(Debug, Default)]
pub struct MemoryDriver {
    state: Mutex<MemoryState>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the HTML served for `url`
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.update(|s| {
            s.pages.insert(url.to_string(), html.to_string());
        });
        self
    }

    /// Makes navigation to `url` fail
    pub fn with_failure(self, url: &str) -> Self {
        self.update(|s| {
            s.failing.insert(url.to_string());
        });
        self
    }

    /// Registers the HTML shown after `trigger` is clicked on `url`
    pub fn with_expansion(self, url: &str, trigger: &str, expanded_html: &str) -> Self {
        self.update(|s| {
            s.expansions
                .insert((url.to_string(), trigger.to_string()), expanded_html.to_string());
        });
        self
    }

    /// URLs successfully navigated to, in order
    pub fn history(&self) -> Vec<String> {
        self.read(|s| s.history.clone())
    }

    /// Instants at which successful navigations happened
    pub fn navigation_times(&self) -> Vec<Instant> {
        self.read(|s| s.navigated_at.clone())
    }

    /// Trigger selectors that were clicked, in order
    pub fn clicks(&self) -> Vec<String> {
        self.read(|s| s.clicks.clone())
    }

    pub fn is_closed(&self) -> bool {
        self.read(|s| s.closed)
    }

    fn update(&self, f: impl FnOnce(&mut MemoryState)) {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryState) -> T) -> T {
        let guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }

    fn ensure_open(&self) -> BrowserResult<()> {
        if self.read(|s| s.closed) {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }
}

fn has_match(html: &str, css: &str, needle: Option<&str>) -> bool {
    let Ok(selector) = Selector::parse(css) else {
        return false;
    };
    let document = Html::parse_document(html);
    let needle = needle.map(str::to_lowercase);
    let found = document.select(&selector).any(|el| match &needle {
        Some(n) => el.text().collect::<String>().to_lowercase().contains(n.as_str()),
        None => true,
    });
    found
}

#[async_trait(?Send)]
impl PageDriver for MemoryDriver {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.ensure_open()?;

        let mut result = Ok(());
        self.update(|s| {
            if s.failing.contains(url) {
                result = Err(BrowserError::Navigation {
                    url: url.to_string(),
                    message: "net::ERR_CONNECTION_RESET".to_string(),
                });
                return;
            }
            match s.pages.get(url) {
                Some(html) => {
                    s.current_html = html.clone();
                    s.current_url = url.to_string();
                    s.history.push(url.to_string());
                    s.navigated_at.push(Instant::now());
                }
                None => {
                    result = Err(BrowserError::Navigation {
                        url: url.to_string(),
                        message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
                    });
                }
            }
        });
        result
    }

    async fn wait_for_ready(&self, selector: &str, _timeout: Duration) -> BrowserResult<bool> {
        self.ensure_open()?;
        Ok(self.read(|s| has_match(&s.current_html, selector, None)))
    }

    async fn current_url(&self) -> BrowserResult<String> {
        self.ensure_open()?;
        Ok(self.read(|s| s.current_url.clone()))
    }

    async fn snapshot(&self) -> BrowserResult<String> {
        self.ensure_open()?;
        Ok(self.read(|s| s.current_html.clone()))
    }

    async fn execute_script(&self, _script: &str) -> BrowserResult<serde_json::Value> {
        self.ensure_open()?;
        Ok(serde_json::Value::Null)
    }

    async fn click(&self, css: &str, needle: Option<&str>) -> BrowserResult<bool> {
        self.ensure_open()?;

        let mut clicked = false;
        self.update(|s| {
            if !has_match(&s.current_html, css, needle) {
                return;
            }
            clicked = true;
            s.clicks.push(css.to_string());
            if let Some(expanded) = s.expansions.get(&(s.current_url.clone(), css.to_string())) {
                s.current_html = expanded.clone();
            }
        });
        Ok(clicked)
    }

    async fn close(&self) -> BrowserResult<()> {
        self.update(|s| s.closed = true);
        Ok(())
    }
}
