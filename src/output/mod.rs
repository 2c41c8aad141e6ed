//! Output module for writing the flattened document
//!
//! This module handles:
//! - Joining page results into one Markdown document
//! - Deriving a default output file name from the target URL
//! - Writing the document to disk

mod document;

pub use document::{
    default_output_path, ensure_md_extension, render_document, write_document, SEPARATOR,
};
