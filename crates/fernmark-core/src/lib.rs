//! FernMark converts CommonMark-formatted text into HTML fragments.
//!
//! Conversion runs in two phases over a shared node tree: a line-oriented
//! block structure analyzer builds containers and raw-text leaves, then an
//! inline analyzer elaborates each leaf into text, code spans, emphasis, raw
//! HTML, autolinks, and line breaks. A renderer walks the finished tree.
//!
//! ```
//! assert_eq!(fernmark_core::to_html("# Heading\n"), "<h1>Heading</h1>\n");
//! ```
//!
//! The output is a fragment, not a document, and it is not sanitized: raw
//! HTML in the input passes through verbatim. Callers serving untrusted
//! input should use [`to_html_sanitized`] or their own sanitizer.

mod blocks;
mod entities;
mod html;
mod inlines;
mod lines;
mod tree;

pub use tree::{Children, Content, NodeId, Tree};

use blocks::BlockParser;
use log::debug;
use std::io;
use thiserror::Error;

/// A fully parsed document: the node arena plus its root.
#[derive(Debug)]
pub struct Document {
    tree: Tree,
    root: NodeId,
}

impl Document {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }
}

/// Errors surfaced by the reader-based entry point. Parsing itself cannot
/// fail: every byte sequence is a valid document.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Parses `source` through both phases and returns the document tree.
pub fn parse(source: &[u8]) -> Document {
    let mut parser = BlockParser::new();
    let mut count = 0usize;
    for line in lines::lines(source) {
        parser.feed(line);
        count += 1;
    }
    let (mut tree, root) = parser.finish();
    debug!("block phase consumed {} lines", count);
    inlines::process_document(&mut tree, root);
    Document { tree, root }
}

/// Renders a parsed document to HTML bytes.
pub fn render_html(document: &Document) -> Vec<u8> {
    html::render(&document.tree, document.root)
}

/// Converts CommonMark bytes to HTML bytes. Output lines always end with
/// `'\n'` regardless of the input's line-ending convention; malformed UTF-8
/// inside text is passed through verbatim.
pub fn to_html_bytes(source: &[u8]) -> Vec<u8> {
    render_html(&parse(source))
}

/// Converts a CommonMark string to an HTML fragment.
pub fn to_html(source: &str) -> String {
    into_string(to_html_bytes(source.as_bytes()))
}

/// Reads all of `reader` and converts it, propagating read failures.
pub fn to_html_from_reader<R: io::Read>(mut reader: R) -> Result<String, ConvertError> {
    let mut source = Vec::new();
    reader.read_to_end(&mut source)?;
    Ok(into_string(to_html_bytes(&source)))
}

/// Converts and then sanitizes the result against a conservative allow-list.
pub fn to_html_sanitized(source: &str) -> String {
    html::sanitize(&to_html(source))
}

fn into_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(&err.into_bytes()).into_owned(),
    }
}
