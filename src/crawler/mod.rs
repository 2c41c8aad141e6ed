//! Crawler module for documentation fetching and flattening
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and the per-request retry policy
//! - Link extraction and page conversion
//! - Deduplicated source file downloads
//! - Concurrency limiting and politeness delays
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod retry;
mod scheduler;
mod source;

pub use coordinator::{flatten, Flattener};
pub use fetcher::{build_http_client, check_available, fetch_url, FetchResult};
pub use parser::{extract_links, parse_page, PageLinks, ParsedPage, SourceLink};
pub use retry::{RetryContext, RetryDecision};
pub use scheduler::Scheduler;
pub use source::{download_source, DownloadError};
