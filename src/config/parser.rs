use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kumade::config::load_config;
///
/// let config = load_config(Path::new("kumade.toml")).unwrap();
/// println!("Output: {}", config.output.path);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a persisted table can be traced back to the settings
/// that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    Ok(content_hash(&content))
}

fn content_hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Loads a configuration and returns both the config and its hash
///
/// The file is read once, so the hash always describes the text that was
/// parsed.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, content_hash(content.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartupMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL: &str = r#"
[crawler]
min-delay-ms = 3000
max-delay-ms = 4000
page-timeout-secs = 10
ready-timeout-secs = 15

[input]
path = "profiles.csv"

[output]
path = "result.csv"
"#;

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.min_delay_ms, 3000);
        assert_eq!(config.crawler.max_delay_ms, 4000);
        assert_eq!(config.crawler.settle_ms, 3000);
        assert_eq!(config.crawler.reveal_settle_ms, 1000);
        assert_eq!(config.input.url_column, "url");
        assert!(!config.browser.headless);
        assert_eq!(
            config.browser.startup,
            vec![StartupMode::Connect, StartupMode::Profile, StartupMode::Default]
        );
        assert_eq!(config.login.sales_url, "https://www.linkedin.com/sales/");
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[crawler]
min-delay-ms = 20000
max-delay-ms = 40000
page-timeout-secs = 30
ready-timeout-secs = 15
settle-ms = 2000
reveal-settle-ms = 500

[browser]
headless = true
startup = ["profile", "default"]
debug-port = 9333
profile-dir = "/tmp/kumade-profile"

[input]
path = "people.csv"
url-column = "Profile"

[output]
path = "people.db"

[login]
profile-url = "https://www.linkedin.com/login"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.page_timeout_secs, 30);
        assert_eq!(config.crawler.settle_ms, 2000);
        assert!(config.browser.headless);
        assert_eq!(config.browser.debug_port, 9333);
        assert_eq!(
            config.browser.startup,
            vec![StartupMode::Profile, StartupMode::Default]
        );
        assert_eq!(config.input.url_column, "Profile");
        assert_eq!(config.output.path, "people.db");
        assert_eq!(config.login.profile_url, "https://www.linkedin.com/login");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/kumade.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = MINIMAL.replace("max-delay-ms = 4000", "max-delay-ms = 1000");
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_with_hash_matches_file_hash() {
        let file = create_temp_config(MINIMAL);

        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.output.path, "result.csv");
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let tightened = MINIMAL.replace("min-delay-ms = 3000", "min-delay-ms = 3500");
        let a = create_temp_config(MINIMAL);
        let b = create_temp_config(&tightened);

        assert_ne!(
            compute_config_hash(a.path()).unwrap(),
            compute_config_hash(b.path()).unwrap()
        );
    }

    #[test]
    fn test_parse_config_rejects_unknown_startup_mode() {
        let text = format!("{}\n[browser]\nstartup = [\"stealth\"]\n", MINIMAL);
        assert!(matches!(parse_config(&text), Err(ConfigError::Parse(_))));
    }
}
