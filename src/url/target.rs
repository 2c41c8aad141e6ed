//! Resolution of user-supplied targets to documentation root URLs

use url::Url;

/// Documentation site used for repository URLs
pub const DOCS_HOST: &str = "pkg.go.dev";

/// A crawl target after repository URLs have been mapped to documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// The documentation root URL to crawl
    pub url: String,

    /// True if the input was a repository URL that got rewritten
    pub from_repository: bool,
}

/// Maps a GitHub repository URL to its documentation page
///
/// - `https://github.com/user/repo` becomes `https://pkg.go.dev/github.com/user/repo`
/// - `github.com/user/repo` becomes `https://pkg.go.dev/github.com/user/repo`
/// - any other input is kept unchanged
///
/// # Examples
///
/// ```
/// use doc_flattener::url::resolve_target;
///
/// let target = resolve_target("https://github.com/cinar/indicator");
/// assert_eq!(target.url, "https://pkg.go.dev/github.com/cinar/indicator");
/// assert!(target.from_repository);
/// ```
pub fn resolve_target(raw: &str) -> ResolvedTarget {
    let raw = raw.trim();

    match Url::parse(raw) {
        Ok(url) => {
            if let Some(host) = url.host_str() {
                if host.ends_with("github.com") {
                    return ResolvedTarget {
                        url: format!("https://{}/{}{}", DOCS_HOST, host, url.path()),
                        from_repository: true,
                    };
                }
            }
        }
        Err(_) => {
            if raw.starts_with("github.com/") {
                return ResolvedTarget {
                    url: format!("https://{}/{}", DOCS_HOST, raw),
                    from_repository: true,
                };
            }
        }
    }

    ResolvedTarget {
        url: raw.to_string(),
        from_repository: false,
    }
}
