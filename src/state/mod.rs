//! State module for one crawl run
//!
//! # Components
//!
//! - `PageResult`: one crawled artifact (documentation page or source file)
//! - `CrawlStore`: the synchronized store shared by every task of a run,
//!   holding the visited sets and the accumulated results

mod page_result;
mod store;

// Re-export main types
pub use page_result::PageResult;
pub use store::CrawlStore;
