//! HTML parser for extracting links and page content
//!
//! A fetched page goes through two independent extraction passes:
//! - child pages from the sub-directory listing table, kept only when in scope
//! - source files from the file list, kept only when they carry a source
//!   extension
//!
//! and is then converted to Markdown.

use crate::config::CrawlConfig;
use crate::convert::convert_page;
use crate::url::{resolve_link, CrawlScope};
use scraper::{Html, Selector};
use url::Url;

/// Anchors of the sub-directory listing
pub const CHILD_LINK_SELECTOR: &str = ".UnitDirectories table a[href]";

/// Anchors of the file list, most specific first
const SOURCE_LINK_SELECTORS: &[&str] = &[".UnitFiles-fileList a[href]", ".UnitFiles a[href]"];

/// A source file discovered on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    /// Absolute URL of the file as linked from the page
    pub url: Url,

    /// Code fence language derived from the file extension
    pub language: String,
}

/// Links found on a page
#[derive(Debug, Clone, Default)]
pub struct PageLinks {
    /// In-scope child pages to recurse into
    pub children: Vec<Url>,

    /// Source files to download
    pub sources: Vec<SourceLink>,
}

/// Extracted information from a documentation page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Markdown of the readme and documentation body, if the page has any
    pub markdown: Option<String>,

    /// Links to follow
    pub links: PageLinks,
}

/// Parses a fetched page, extracting its links and converting its content
///
/// # Arguments
///
/// * `html` - The page body
/// * `page_url` - The URL the page was fetched from
/// * `scope` - The run's crawl scope
/// * `config` - The run configuration (source extensions)
pub fn parse_page(html: &str, page_url: &Url, scope: &CrawlScope, config: &CrawlConfig) -> ParsedPage {
    let document = Html::parse_document(html);

    let links = extract_links(&document, page_url, scope, config);
    let markdown = convert_page(document, page_url.as_str());

    ParsedPage { markdown, links }
}

/// Runs both extraction passes over a parsed document
pub fn extract_links(
    document: &Html,
    base_url: &Url,
    scope: &CrawlScope,
    config: &CrawlConfig,
) -> PageLinks {
    let children = extract_child_links(document, base_url)
        .into_iter()
        .filter(|url| {
            let in_scope = scope.contains(url);
            if !in_scope {
                tracing::debug!("Skipping out-of-scope link {}", url);
            }
            in_scope
        })
        .collect();

    let sources = extract_source_links(document, base_url)
        .into_iter()
        .filter_map(|url| {
            let language = config
                .source_extension(url.path())?
                .trim_start_matches('.')
                .to_string();
            Some(SourceLink { url, language })
        })
        .collect();

    PageLinks { children, sources }
}

/// Resolves every anchor of the sub-directory listing
fn extract_child_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse(CHILD_LINK_SELECTOR) else {
        return Vec::new();
    };
    resolve_anchors(document, &selector, base_url)
}

/// Resolves every anchor of the file list
fn extract_source_links(document: &Html, base_url: &Url) -> Vec<Url> {
    for css in SOURCE_LINK_SELECTORS {
        if let Ok(selector) = Selector::parse(css) {
            let links = resolve_anchors(document, &selector, base_url);
            if !links.is_empty() {
                return links;
            }
        }
    }
    Vec::new()
}

fn resolve_anchors(document: &Html, selector: &Selector, base_url: &Url) -> Vec<Url> {
    let mut links: Vec<Url> = Vec::new();
    for element in document.select(selector) {
        if let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            if !links.contains(&url) {
                links.push(url);
            }
        }
    }
    links
}
