use crate::config::types::{
    BrowserConfig, Config, CrawlerConfig, InputConfig, LoginConfig, OutputConfig,
};
use crate::storage::StoreKind;
use crate::ConfigError;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

const MIN_DELAY_FLOOR_MS: u64 = 100;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    validate_login_config(&config.login)?;
    Ok(())
}

/// Validates pacing and timeouts
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.min_delay_ms < MIN_DELAY_FLOOR_MS {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms must be >= {}ms, got {}ms",
            MIN_DELAY_FLOOR_MS, config.min_delay_ms
        )));
    }

    if config.max_delay_ms < config.min_delay_ms {
        return Err(ConfigError::Validation(format!(
            "max_delay_ms ({}) must be >= min_delay_ms ({})",
            config.max_delay_ms, config.min_delay_ms
        )));
    }

    validate_timeout("page_timeout_secs", config.page_timeout_secs)?;
    validate_timeout("ready_timeout_secs", config.ready_timeout_secs)?;

    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs < 1 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

/// Validates browser startup settings
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.startup.is_empty() {
        return Err(ConfigError::Validation(
            "startup must list at least one mode".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for mode in &config.startup {
        if !seen.insert(mode) {
            return Err(ConfigError::Validation(format!(
                "startup mode {:?} is listed more than once",
                mode
            )));
        }
    }

    if config.debug_port == 0 {
        return Err(ConfigError::Validation(
            "debug_port cannot be 0".to_string(),
        ));
    }

    if config.profile_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "profile_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "input path cannot be empty".to_string(),
        ));
    }

    if config.url_column.trim().is_empty() {
        return Err(ConfigError::Validation(
            "url_column cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if StoreKind::from_path(Path::new(&config.path)).is_none() {
        return Err(ConfigError::Validation(format!(
            "output path '{}' must end in .csv, .db, .sqlite or .sqlite3",
            config.path
        )));
    }

    Ok(())
}

fn validate_login_config(config: &LoginConfig) -> Result<(), ConfigError> {
    validate_http_url("profile_url", &config.profile_url)?;
    validate_http_url("sales_url", &config.sales_url)?;
    Ok(())
}

fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartupMode;

    fn crawler() -> CrawlerConfig {
        CrawlerConfig {
            min_delay_ms: 3000,
            max_delay_ms: 4000,
            page_timeout_secs: 10,
            ready_timeout_secs: 15,
            settle_ms: 3000,
            reveal_settle_ms: 1000,
        }
    }

    #[test]
    fn test_validate_delay_window() {
        assert!(validate_crawler_config(&crawler()).is_ok());

        let mut equal = crawler();
        equal.max_delay_ms = equal.min_delay_ms;
        assert!(validate_crawler_config(&equal).is_ok());

        let mut inverted = crawler();
        inverted.max_delay_ms = 10;
        assert!(validate_crawler_config(&inverted).is_err());

        let mut too_fast = crawler();
        too_fast.min_delay_ms = 10;
        assert!(validate_crawler_config(&too_fast).is_err());
    }

    #[test]
    fn test_validate_timeouts() {
        let mut zero = crawler();
        zero.page_timeout_secs = 0;
        assert!(validate_crawler_config(&zero).is_err());

        let mut huge = crawler();
        huge.ready_timeout_secs = 3600;
        assert!(validate_crawler_config(&huge).is_err());
    }

    #[test]
    fn test_validate_startup_modes() {
        let mut browser = BrowserConfig::default();
        assert!(validate_browser_config(&browser).is_ok());

        browser.startup = vec![];
        assert!(validate_browser_config(&browser).is_err());

        browser.startup = vec![StartupMode::Default, StartupMode::Default];
        assert!(validate_browser_config(&browser).is_err());
    }

    #[test]
    fn test_validate_output_extension() {
        for ok in ["result.csv", "out/result.db", "r.sqlite", "r.SQLITE3"] {
            let output = OutputConfig {
                path: ok.to_string(),
            };
            assert!(validate_output_config(&output).is_ok(), "{}", ok);
        }

        for bad in ["", "result.xlsx", "result"] {
            let output = OutputConfig {
                path: bad.to_string(),
            };
            assert!(validate_output_config(&output).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_validate_login_urls() {
        assert!(validate_login_config(&LoginConfig::default()).is_ok());

        let login = LoginConfig {
            profile_url: "ftp://example.com".to_string(),
            ..LoginConfig::default()
        };
        assert!(validate_login_config(&login).is_err());

        let login = LoginConfig {
            sales_url: "not a url".to_string(),
            ..LoginConfig::default()
        };
        assert!(validate_login_config(&login).is_err());
    }
}
