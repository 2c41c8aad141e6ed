//! URL handling module for Doc-Flattener
//!
//! This module provides link resolution, the crawl scope rule, raw-content
//! rewriting for code-hosting "blob" URLs, and resolution of repository URLs
//! to documentation pages.

mod normalize;
mod raw;
mod scope;
mod target;

// Re-export main functions
pub use normalize::{canonical_url, file_name, resolve_link};
pub use raw::to_raw_url;
pub use scope::{extract_domain, matches_domain, CrawlScope};
pub use target::{resolve_target, ResolvedTarget, DOCS_HOST};
