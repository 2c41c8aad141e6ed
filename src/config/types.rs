use serde::Deserialize;
use std::time::Duration;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; flatten-doc/1.0)";

/// Layout of a TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub crawler: CrawlConfig,
}

/// Immutable configuration for one crawl run
///
/// Every field falls back to [`CrawlConfig::default`] when it is missing
/// from a configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// User agent sent on every request
    pub user_agent: String,

    /// Maximum number of concurrent page fetches
    pub parallelism: usize,

    /// Upper bound of the random delay before each request (milliseconds)
    pub politeness_delay_ms: u64,

    /// Hostnames eligible for fetching (`*.example.com` matches subdomains)
    pub allowed_domains: Vec<String>,

    /// Additional attempts after the first failure of a request
    pub max_retries: u32,

    /// Backoff unit between source download attempts (milliseconds)
    pub retry_backoff_ms: u64,

    /// File suffixes that mark a file-list link as a source file
    pub source_extensions: Vec<String>,

    /// Optional cap on in-flight source downloads (unbounded when unset)
    pub max_concurrent_downloads: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            parallelism: 2,
            politeness_delay_ms: 500,
            allowed_domains: vec!["pkg.go.dev".to_string()],
            max_retries: 3,
            retry_backoff_ms: 500,
            source_extensions: vec![".go".to_string()],
            max_concurrent_downloads: None,
        }
    }
}

impl CrawlConfig {
    /// Upper bound of the politeness delay
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    /// Fixed unit of the source download backoff
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Returns the matching source extension for a URL, if any
    pub fn source_extension(&self, url: &str) -> Option<&str> {
        self.source_extensions
            .iter()
            .map(String::as_str)
            .find(|ext| url.ends_with(ext))
    }
}
