//! Crawl scope: which URLs may be fetched and recursed into

use crate::url::canonical_url;
use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_flattener::url::extract_domain;
///
/// let url = Url::parse("https://PKG.go.dev/fmt").unwrap();
/// assert_eq!(extract_domain(&url), Some("pkg.go.dev".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks if a domain matches an allow-list entry
///
/// `example.com` matches only itself; `*.example.com` also matches the bare
/// domain and any subdomain.
pub fn matches_domain(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// The set of URLs eligible for fetching during one run
///
/// A URL is in scope when its host is on the allow-list and its absolute
/// form starts with the root URL (normalized, trailing slash stripped).
#[derive(Debug, Clone)]
pub struct CrawlScope {
    root: Url,
    root_prefix: String,
    allowed_domains: Vec<String>,
}

impl CrawlScope {
    /// Builds the scope for a root URL
    ///
    /// # Errors
    ///
    /// Fails when the root is not an absolute HTTP(S) URL or its host is not
    /// allowed; no request may be dispatched in that case.
    pub fn new(root_url: &str, allowed_domains: &[String]) -> UrlResult<Self> {
        let trimmed = root_url.trim().trim_end_matches('/');

        let mut root = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;
        if root.scheme() != "http" && root.scheme() != "https" {
            return Err(UrlError::InvalidScheme(root.scheme().to_string()));
        }
        root.set_fragment(None);

        // Compared against parsed links, so it must be in the same normalized form
        let root_prefix = root.as_str().trim_end_matches('/').to_string();

        let allowed_domains: Vec<String> =
            allowed_domains.iter().map(|d| d.to_lowercase()).collect();

        let scope = Self {
            root,
            root_prefix,
            allowed_domains,
        };

        let domain = extract_domain(&scope.root).ok_or(UrlError::MissingDomain)?;
        if !scope.is_allowed_domain(&domain) {
            return Err(UrlError::DomainNotAllowed(domain));
        }

        Ok(scope)
    }

    /// The root URL every in-scope page starts with
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The root URL string used for prefix comparison and as the root's identity
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Identity of a page for visited tracking and its result entry
    ///
    /// Any spelling of the root maps to the root prefix; every other page is
    /// identified by its canonical URL.
    pub fn page_id(&self, url: &Url) -> String {
        let canonical = canonical_url(url);
        if canonical.trim_end_matches('/') == self.root_prefix {
            self.root_prefix.clone()
        } else {
            canonical
        }
    }

    /// Returns true if the domain is on the allow-list
    pub fn is_allowed_domain(&self, domain: &str) -> bool {
        self.allowed_domains
            .iter()
            .any(|pattern| matches_domain(pattern, domain))
    }

    /// Returns true if the URL may be fetched at all
    pub fn allows(&self, url: &Url) -> bool {
        extract_domain(url).is_some_and(|domain| self.is_allowed_domain(&domain))
    }

    /// Returns true if the URL is a page eligible for recursion
    pub fn contains(&self, url: &Url) -> bool {
        self.allows(url) && url.as_str().starts_with(&self.root_prefix)
    }
}
