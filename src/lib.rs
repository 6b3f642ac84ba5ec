//! Kumade: a patient profile harvester
//!
//! This crate visits a list of profile pages in a real browser session, resolves a
//! fixed schema of fields from each page's rendered DOM using ordered fallback
//! strategies, and appends the results to a persisted table.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod input;
pub mod output;
pub mod record;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Kumade operations
#[derive(Debug, Error)]
pub enum KumadeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Could not start a browser session: {0}")]
    Session(String),

    #[error("Timed out after {seconds}s waiting for {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("Extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("No usable URLs found in {0}")]
    NoInput(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Kumade operations
pub type Result<T> = std::result::Result<T, KumadeError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{CompanyRecord, CrawlOutcome, ProfileRecord};
pub use state::RunPhase;
pub use url::{classify, Variant};
