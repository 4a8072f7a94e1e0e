//! HTML rendering.
//!
//! Depth-first emission over the finished tree with per-variant open and
//! close markers. Block-level close tags end with a newline, inline tags do
//! not. Text content is escaped (`"` `&` `<` `>`); raw HTML spans pass
//! through untouched. The walk keeps its own stack so block nesting depth is
//! bounded only by memory.

use crate::tree::{Content, NodeId, Tree};
use ammonia::Builder;
use std::collections::HashSet;

pub(crate) fn render(tree: &Tree, root: NodeId) -> Vec<u8> {
    let mut out = Vec::new();
    let mut stack = vec![Visit::Enter(root)];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id) => {
                emit_open(tree.content(id), &mut out);
                stack.push(Visit::Exit(id));
                let children: Vec<NodeId> = tree.children(id).collect();
                for child in children.into_iter().rev() {
                    stack.push(Visit::Enter(child));
                }
            }
            Visit::Exit(id) => emit_close(tree.content(id), &mut out),
        }
    }
    out
}

enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

fn emit_open(content: &Content, out: &mut Vec<u8>) {
    match content {
        Content::Document => {}
        Content::BlockQuote => out.extend_from_slice(b"<blockquote>\n"),
        Content::Paragraph { .. } => out.extend_from_slice(b"<p>"),
        Content::AtxHeading { level, .. } | Content::SetextHeading { level, .. } => {
            out.extend_from_slice(b"<h");
            out.push(b'0' + level);
            out.push(b'>');
        }
        Content::IndentedCodeBlock { literal } => {
            out.extend_from_slice(b"<pre><code>");
            escape_into(literal, out);
        }
        Content::ThematicBreak => out.extend_from_slice(b"<hr />\n"),
        Content::Text { bytes } => escape_into(bytes, out),
        Content::CodeSpan { bytes } => {
            out.extend_from_slice(b"<code>");
            escape_into(bytes, out);
        }
        Content::Emph => out.extend_from_slice(b"<em>"),
        Content::Strong => out.extend_from_slice(b"<strong>"),
        Content::HtmlSpan { raw } => out.extend_from_slice(raw),
        Content::Link { destination } => {
            out.extend_from_slice(b"<a href=\"");
            escape_into(destination, out);
            out.extend_from_slice(b"\">");
        }
        Content::HardBreak => out.extend_from_slice(b"<br />\n"),
        Content::SoftBreak => out.push(b'\n'),
    }
}

fn emit_close(content: &Content, out: &mut Vec<u8>) {
    match content {
        Content::Paragraph { .. } => out.extend_from_slice(b"</p>\n"),
        Content::BlockQuote => out.extend_from_slice(b"</blockquote>\n"),
        Content::AtxHeading { level, .. } | Content::SetextHeading { level, .. } => {
            out.extend_from_slice(b"</h");
            out.push(b'0' + level);
            out.extend_from_slice(b">\n");
        }
        Content::IndentedCodeBlock { .. } => out.extend_from_slice(b"</code></pre>\n"),
        Content::CodeSpan { .. } => out.extend_from_slice(b"</code>"),
        Content::Emph => out.extend_from_slice(b"</em>"),
        Content::Strong => out.extend_from_slice(b"</strong>"),
        Content::Link { .. } => out.extend_from_slice(b"</a>"),
        _ => {}
    }
}

/// Escapes the four characters that must always be written as entities.
pub(crate) fn escape_into(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        match b {
            b'"' => out.extend_from_slice(b"&quot;"),
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            _ => out.push(b),
        }
    }
}

/// Runs rendered HTML through an allow-list sanitizer covering exactly the
/// fragment vocabulary the renderer emits plus benign inline markup.
pub(crate) fn sanitize(html: &str) -> String {
    let tags: HashSet<&'static str> = [
        "a",
        "b",
        "blockquote",
        "br",
        "code",
        "em",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "i",
        "kbd",
        "p",
        "pre",
        "s",
        "strong",
        "sub",
        "sup",
        "u",
    ]
    .iter()
    .copied()
    .collect();

    Builder::new().tags(tags).clean(html).to_string()
}
