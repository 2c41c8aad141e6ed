/// One crawled artifact as a (URL, Markdown content) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Canonical URL, used for deduplication and as the sort key
    pub url: String,

    /// Markdown content including a header naming its origin
    pub content: String,
}

impl PageResult {
    /// Creates a new page result
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }
}
