use crate::state::PageResult;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

/// Literal separator written after every result
pub const SEPARATOR: &str = "\n\n---\n\n";

/// File name used when the target URL has no usable path
const FALLBACK_NAME: &str = "documentation";

/// Characters that cannot appear in a generated file name
const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Joins results into one document, each followed by the separator
pub fn render_document(results: &[PageResult]) -> String {
    let mut document = String::new();
    for result in results {
        document.push_str(&result.content);
        document.push_str(SEPARATOR);
    }
    document
}

/// Writes the flattened document to a file
///
/// # Arguments
///
/// * `results` - Page results in output order
/// * `output_path` - Path where the markdown file should be written
pub fn write_document(results: &[PageResult], output_path: &Path) -> Result<()> {
    for result in results {
        tracing::info!("Writing: {}", result.url);
    }

    let mut file = File::create(output_path)?;
    file.write_all(render_document(results).as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Derives an output file name from the target URL's path
///
/// # Examples
///
/// ```
/// use doc_flattener::output::default_output_path;
///
/// assert_eq!(
///     default_output_path("https://pkg.go.dev/github.com/cinar/indicator/v2"),
///     "github.com_cinar_indicator_v2.md"
/// );
/// assert_eq!(default_output_path("https://pkg.go.dev/"), "documentation.md");
/// ```
pub fn default_output_path(target_url: &str) -> String {
    let name = match Url::parse(target_url) {
        Ok(url) => {
            let path = url.path().trim_start_matches('/');
            if path.is_empty() {
                FALLBACK_NAME.to_string()
            } else {
                path.replace(UNSAFE_CHARS, "_")
            }
        }
        Err(_) => FALLBACK_NAME.to_string(),
    };

    ensure_md_extension(&name)
}

/// Appends `.md` unless the name already ends with it (case-insensitive)
pub fn ensure_md_extension(name: &str) -> String {
    if name.to_lowercase().ends_with(".md") {
        name.to_string()
    } else {
        format!("{}.md", name)
    }
}
