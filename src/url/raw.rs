//! Rewriting of code-hosting "blob" viewer URLs to raw-content URLs

/// Host serving GitHub repository file views
const GITHUB_HOST: &str = "github.com";

/// Host serving GitHub raw file content
const GITHUB_RAW_HOST: &str = "raw.githubusercontent.com";

/// Rewrites a GitHub blob URL to its raw-content endpoint
///
/// Any other URL is returned unchanged.
///
/// # Examples
///
/// ```
/// use doc_flattener::url::to_raw_url;
///
/// assert_eq!(
///     to_raw_url("https://github.com/user/repo/blob/main/path/file.go"),
///     "https://raw.githubusercontent.com/user/repo/main/path/file.go"
/// );
/// assert_eq!(
///     to_raw_url("https://example.com/pkg/file.go"),
///     "https://example.com/pkg/file.go"
/// );
/// ```
pub fn to_raw_url(url: &str) -> String {
    if url.contains(GITHUB_HOST) && url.contains("/blob/") {
        return url
            .replacen(GITHUB_HOST, GITHUB_RAW_HOST, 1)
            .replacen("/blob/", "/", 1);
    }
    url.to_string()
}
