//! Doc-Flattener: flatten a documentation site into one Markdown document
//!
//! This crate crawls a package documentation tree rooted at a URL, follows
//! sub-package links that stay inside the root's scope, downloads the linked
//! source files, and returns every page and source file as Markdown, sorted
//! by URL.

pub mod config;
pub mod convert;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Doc-Flattener operations
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Root page {url} could not be fetched: {reason}")]
    RootFetch { url: String, reason: String },

    #[error("Package not available at {url} (status: {status})")]
    Unavailable { url: String, status: String },

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

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),
}

/// Result type alias for Doc-Flattener operations
pub type Result<T> = std::result::Result<T, FlattenError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{flatten, Flattener};
pub use state::PageResult;
