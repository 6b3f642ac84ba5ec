use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Kumade
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub login: LoginConfig,
}

/// Pacing and timeout settings for the crawl loop
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Lower bound of the randomized pause between two items (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the randomized pause between two items (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    /// Bound on a single navigation (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Bound on waiting for a page's main content to appear (seconds)
    #[serde(rename = "ready-timeout-secs")]
    pub ready_timeout_secs: u64,

    /// Pause after the main content appears, letting late scripts render (milliseconds)
    #[serde(rename = "settle-ms", default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Pause after clicking a "show more" style toggle (milliseconds)
    #[serde(rename = "reveal-settle-ms", default = "default_reveal_settle_ms")]
    pub reveal_settle_ms: u64,
}

impl CrawlerConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn reveal_settle(&self) -> Duration {
        Duration::from_millis(self.reveal_settle_ms)
    }
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_reveal_settle_ms() -> u64 {
    1000
}

/// One way of obtaining a browser session, tried in configured order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartupMode {
    /// Attach to a browser already listening on `debug-port`
    Connect,
    /// Launch with a persistent user-data directory so logins survive restarts
    Profile,
    /// Launch with the driver's defaults
    Default,
}

impl StartupMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connect => "existing browser",
            Self::Profile => "persistent profile",
            Self::Default => "default launch",
        }
    }
}

/// Browser session settings
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Run without a visible window; the manual login step needs a window
    #[serde(default)]
    pub headless: bool,

    /// Ordered startup fallbacks
    #[serde(default = "default_startup")]
    pub startup: Vec<StartupMode>,

    /// DevTools port of an already running browser
    #[serde(rename = "debug-port", default = "default_debug_port")]
    pub debug_port: u16,

    /// User-data directory for the persistent profile launch
    #[serde(rename = "profile-dir", default = "default_profile_dir")]
    pub profile_dir: PathBuf,

    /// Explicit browser executable
    #[serde(rename = "chrome-path", default)]
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            startup: default_startup(),
            debug_port: default_debug_port(),
            profile_dir: default_profile_dir(),
            chrome_path: None,
        }
    }
}

fn default_startup() -> Vec<StartupMode> {
    vec![StartupMode::Connect, StartupMode::Profile, StartupMode::Default]
}

fn default_debug_port() -> u16 {
    9222
}

fn default_profile_dir() -> PathBuf {
    PathBuf::from("./chrome_profile")
}

/// Input table settings
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the CSV file listing target URLs
    pub path: String,

    /// Header of the column holding URLs
    #[serde(rename = "url-column", default = "default_url_column")]
    pub url_column: String,
}

fn default_url_column() -> String {
    "url".to_string()
}

/// Output table settings
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the persisted result table (.csv, .db, .sqlite, .sqlite3)
    pub path: String,
}

/// Pages the operator is sent to before being asked to log in
#[derive(Debug, Clone, Deserialize)]
pub struct LoginConfig {
    #[serde(rename = "profile-url", default = "default_profile_login")]
    pub profile_url: String,

    #[serde(rename = "sales-url", default = "default_sales_login")]
    pub sales_url: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            profile_url: default_profile_login(),
            sales_url: default_sales_login(),
        }
    }
}

fn default_profile_login() -> String {
    "https://www.linkedin.com/".to_string()
}

fn default_sales_login() -> String {
    "https://www.linkedin.com/sales/".to_string()
}
