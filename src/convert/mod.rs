//! Conversion of documentation pages and source files to Markdown
//!
//! Page conversion works on a parsed document:
//! 1. Detach noise subtrees (documentation index, scripts, styles,
//!    example buttons)
//! 2. Select the outermost readme and documentation roots
//! 3. Convert them with `htmd`, unwrapping `<details>` and rendering
//!    `<summary>` as a level-4 heading
//! 4. Prepend a header naming the page and its URL

use crate::url::file_name;
use htmd::options::{HeadingStyle, Options};
use htmd::{Element, HtmlToMarkdown};
use scraper::{ElementRef, Html, Selector};

/// Readme and documentation body roots
pub const CONTENT_SELECTOR: &str = ".UnitReadme, .Documentation, .Documentation-content";

/// Subtrees removed before conversion
pub const NOISE_SELECTOR: &str =
    ".Documentation-index, script, style, .Documentation-exampleButtonsContainer";

/// Page title candidates, most specific first
const TITLE_SELECTORS: &[&str] = &[".UnitHeader h1", "title"];

/// Converts a fetched documentation page to Markdown
///
/// Returns None when the page has neither a readme nor a documentation
/// body. The document is consumed because noise subtrees are detached
/// from it in place.
///
/// # Example
///
/// ```
/// use doc_flattener::convert::convert_page;
/// use scraper::Html;
///
/// let html = r#"<main><div class="UnitReadme"><h1>Intro</h1></div></main>"#;
/// let markdown = convert_page(Html::parse_document(html), "https://pkg.go.dev/x").unwrap();
/// assert!(markdown.starts_with("# Package: "));
/// assert!(markdown.contains("Intro"));
/// ```
pub fn convert_page(mut document: Html, url: &str) -> Option<String> {
    remove_noise(&mut document);

    let fragment = select_content(&document)?;
    let title = extract_title(&document).unwrap_or_else(|| url.to_string());
    let body = html_to_markdown(&fragment);

    Some(format!("# Package: {}\nURL: {}\n\n{}", title, url, body))
}

/// Wraps downloaded source text in a fenced code block with a header
///
/// # Example
///
/// ```
/// use doc_flattener::convert::render_source;
///
/// let markdown = render_source("https://example.com/pkg/file.go", "go", "package pkg\n");
/// assert!(markdown.contains("```go\npackage pkg\n```"));
/// ```
pub fn render_source(url: &str, language: &str, code: &str) -> String {
    let newline = if code.ends_with('\n') { "" } else { "\n" };
    format!(
        "## Source: {}\nURL: {}\n\n```{}\n{}{}```\n",
        file_name(url),
        url,
        language,
        code,
        newline
    )
}

/// Converts an HTML fragment to Markdown
pub fn html_to_markdown(html: &str) -> String {
    match markdown_converter().convert(html) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!("Markdown conversion failed: {}", e);
            String::new()
        }
    }
}

fn markdown_converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
        .skip_tags(vec!["script", "style"])
        .add_handler(vec!["details"], |element: Element| {
            Some(element.content.to_string())
        })
        .add_handler(vec!["summary"], |element: Element| {
            Some(format!("\n#### {}\n\n", element.content.trim()))
        })
        .build()
}

/// Detaches every noise subtree from the document
fn remove_noise(document: &mut Html) {
    let Ok(noise) = Selector::parse(NOISE_SELECTOR) else {
        return;
    };

    let ids: Vec<_> = document.select(&noise).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Concatenates the outer HTML of the outermost content roots
fn select_content(document: &Html) -> Option<String> {
    let roots = Selector::parse(CONTENT_SELECTOR).ok()?;

    let fragment: String = document
        .select(&roots)
        .filter(|element| {
            !element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| roots.matches(&ancestor))
        })
        .map(|element| element.html())
        .collect();

    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Extracts the page title from the header or `<title>` tag
fn extract_title(document: &Html) -> Option<String> {
    TITLE_SELECTORS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .next()
            .map(|element| {
                element
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|title| !title.is_empty())
    })
}
