use crate::config::types::{ConfigFile, CrawlConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use doc_flattener::config::load_config;
///
/// let config = load_config(Path::new("flatten.toml")).unwrap();
/// println!("Max retries: {}", config.max_retries);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
///
/// Keys missing from the `[crawler]` table keep their default values.
pub fn parse_config(content: &str) -> Result<CrawlConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(content)?;

    validate(&file.crawler)?;

    Ok(file.crawler)
}
