//! Configuration module for Doc-Flattener
//!
//! This module handles the crawl configuration: its defaults, loading an
//! optional TOML file, and validating the result before a run starts.
//!
//! # Example
//!
//! ```no_run
//! use doc_flattener::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("flatten.toml")).unwrap();
//! println!("Crawler will use parallelism: {}", config.parallelism);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ConfigFile, CrawlConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
