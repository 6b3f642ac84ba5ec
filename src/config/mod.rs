//! Configuration module for Kumade
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use kumade::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kumade.toml")).unwrap();
//! println!("Items will be spaced at least {}ms apart", config.crawler.min_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, InputConfig, LoginConfig, OutputConfig, StartupMode,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
