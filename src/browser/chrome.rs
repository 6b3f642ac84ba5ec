//! Chrome session over the DevTools protocol
//!
//! A session is obtained by trying each configured startup mode in order:
//! attaching to an already running browser, launching with a persistent
//! profile directory, then launching with defaults. The first mode that yields
//! a usable page wins.

use crate::browser::{BrowserError, BrowserResult, PageDriver};
use crate::config::{BrowserConfig, StartupMode};
use crate::{KumadeError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A live browser tab driven over CDP
pub struct ChromeSession {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler: JoinHandle<()>,
    mode: StartupMode,
}

impl ChromeSession {
    /// Opens a session using the configured startup fallbacks
    ///
    /// # Returns
    ///
    /// * `Ok(ChromeSession)` - The first mode that produced a page
    /// * `Err(KumadeError::Session)` - Every mode failed
    pub async fn open(config: &BrowserConfig) -> Result<Self> {
        let mut failures = Vec::new();

        for mode in &config.startup {
            tracing::info!("Starting browser ({})", mode.label());
            match Self::start(*mode, config).await {
                Ok(session) => {
                    tracing::info!("✓ Browser ready ({})", mode.label());
                    return Ok(session);
                }
                Err(e) => {
                    tracing::warn!("Browser startup via {} failed: {}", mode.label(), e);
                    failures.push(format!("{}: {}", mode.label(), e));
                }
            }
        }

        if failures.is_empty() {
            return Err(KumadeError::Session(
                "no startup modes configured".to_string(),
            ));
        }
        Err(KumadeError::Session(failures.join("; ")))
    }

    async fn start(mode: StartupMode, config: &BrowserConfig) -> BrowserResult<Self> {
        let (browser, mut handler) = match mode {
            StartupMode::Connect => {
                let endpoint = format!("http://127.0.0.1:{}", config.debug_port);
                let ws_url = discover_websocket_url(&endpoint).await?;
                Browser::connect(ws_url.clone())
                    .await
                    .map_err(|e| BrowserError::Connect {
                        endpoint: ws_url,
                        message: e.to_string(),
                    })?
            }
            StartupMode::Profile => {
                let launch = launch_config(config, true)?;
                Browser::launch(launch)
                    .await
                    .map_err(|e| BrowserError::Launch(e.to_string()))?
            }
            StartupMode::Default => {
                let launch = launch_config(config, false)?;
                Browser::launch(launch)
                    .await
                    .map_err(|e| BrowserError::Launch(e.to_string()))?
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(e.into());
            }
        };

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler,
            mode,
        })
    }
}

fn launch_config(config: &BrowserConfig, persistent: bool) -> BrowserResult<LaunchConfig> {
    let mut builder = LaunchConfig::builder()
        .window_size(1920, 1080)
        .no_sandbox()
        .arg("--disable-dev-shm-usage");

    if !config.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &config.chrome_path {
        builder = builder.chrome_executable(path);
    }
    if persistent {
        std::fs::create_dir_all(&config.profile_dir)
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        builder = builder.user_data_dir(&config.profile_dir);
    }

    builder.build().map_err(BrowserError::Launch)
}

/// Asks a DevTools endpoint for its browser websocket URL
///
/// # Arguments
///
/// * `endpoint` - Base HTTP address, e.g. `http://127.0.0.1:9222`
pub async fn discover_websocket_url(endpoint: &str) -> BrowserResult<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .connect_timeout(Duration::from_secs(2))
        .build()
        .map_err(|e| BrowserError::Discovery(e.to_string()))?;

    let url = format!("{}/json/version", endpoint.trim_end_matches('/'));
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| BrowserError::Discovery(e.to_string()))?;

    if !response.status().is_success() {
        return Err(BrowserError::Discovery(format!(
            "{} returned {}",
            url,
            response.status()
        )));
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| BrowserError::Discovery(e.to_string()))?;

    body.get("webSocketDebuggerUrl")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            BrowserError::Discovery(format!("{} did not report a websocket URL", url))
        })
}

#[async_trait(?Send)]
impl PageDriver for ChromeSession {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_ready(&self, selector: &str, timeout: Duration) -> BrowserResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn snapshot(&self) -> BrowserResult<String> {
        Ok(self.page.content().await?)
    }

    async fn execute_script(&self, script: &str) -> BrowserResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn close(&self) -> BrowserResult<()> {
        if let Err(e) = self.page.clone().close().await {
            tracing::debug!("Closing tab failed: {}", e);
        }

        let browser = self.browser.lock().await.take();
        let shutdown = async {
            let Some(mut browser) = browser else {
                return Ok::<(), BrowserError>(());
            };
            // An attached browser belongs to the operator and stays open.
            if self.mode == StartupMode::Connect {
                return Ok(());
            }
            browser.close().await?;
            if let Err(e) = browser.wait().await {
                tracing::debug!("Waiting for browser exit failed: {}", e);
            }
            Ok(())
        };

        finish_close(shutdown, &self.handler).await
    }
}

/// Awaits the browser shutdown, then stops the CDP handler task whatever the
/// shutdown returned
async fn finish_close<F>(shutdown: F, handler: &JoinHandle<()>) -> BrowserResult<()>
where
    F: std::future::Future<Output = BrowserResult<()>>,
{
    let result = shutdown.await;
    handler.abort();
    match &result {
        Ok(()) => tracing::info!("Browser session closed"),
        Err(e) => tracing::warn!("Browser did not close cleanly: {}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_discover_websocket_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Browser": "Chrome/120.0.0.0",
                "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/abc"
            })))
            .mount(&server)
            .await;

        let ws = discover_websocket_url(&server.uri()).await.unwrap();
        assert_eq!(ws, "ws://127.0.0.1:9222/devtools/browser/abc");
    }

    #[tokio::test]
    async fn test_discover_without_websocket_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Browser": "Chrome/120.0.0.0"
            })))
            .mount(&server)
            .await;

        let result = discover_websocket_url(&server.uri()).await;
        assert!(matches!(result, Err(BrowserError::Discovery(_))));
    }

    #[tokio::test]
    async fn test_discover_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/version"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = discover_websocket_url(&server.uri()).await;
        assert!(matches!(result, Err(BrowserError::Discovery(_))));
    }

    #[tokio::test]
    async fn test_failed_shutdown_still_stops_handler() {
        let handler = tokio::spawn(futures::future::pending::<()>());

        let result = finish_close(async { Err(BrowserError::Closed) }, &handler).await;
        assert!(matches!(result, Err(BrowserError::Closed)));
        assert!(handler.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_clean_shutdown_stops_handler() {
        let handler = tokio::spawn(futures::future::pending::<()>());

        finish_close(async { Ok(()) }, &handler).await.unwrap();
        assert!(handler.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_open_with_no_modes_is_session_error() {
        let config = BrowserConfig {
            startup: Vec::new(),
            ..BrowserConfig::default()
        };
        let result = ChromeSession::open(&config).await;
        assert!(matches!(result, Err(KumadeError::Session(_))));
    }

    #[tokio::test]
    async fn test_connect_mode_fails_without_listener() {
        // Port 9 (discard) is not a DevTools endpoint.
        let config = BrowserConfig {
            startup: vec![StartupMode::Connect],
            debug_port: 9,
            ..BrowserConfig::default()
        };
        let result = ChromeSession::open(&config).await;
        assert!(matches!(result, Err(KumadeError::Session(_))));
    }
}
