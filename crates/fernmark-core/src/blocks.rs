//! Block structure analysis.
//!
//! The analyzer consumes sentinel-terminated, tab-free lines and maintains a
//! stack of open blocks rooted at the Document. Each line goes through three
//! phases: match the open blocks from the bottom up, open any new blocks the
//! remainder starts, and append whatever is left to the innermost open leaf.

use crate::tree::{Content, NodeId, Tree};
use log::trace;

/// A line being consumed by the analyzer. Container markers are stripped by
/// advancing `pos`; the terminating `'\n'` is always retained.
struct LineCursor {
    bytes: Vec<u8>,
    pos: usize,
}

impl LineCursor {
    fn new(bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.last() == Some(&b'\n'), "line must end with newline");
        Self { bytes, pos: 0 }
    }

    fn rest(&self) -> &[u8] {
        &self.bytes[self.pos..]
    }

    /// Count of leading spaces in the unconsumed remainder.
    fn indent(&self) -> usize {
        self.rest().iter().take_while(|&&b| b == b' ').count()
    }

    /// First byte past the leading spaces; `'\n'` on a blank remainder.
    fn first_nonspace(&self) -> u8 {
        self.bytes[self.pos + self.indent()]
    }

    fn is_blank(&self) -> bool {
        self.first_nonspace() == b'\n'
    }

    fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n < self.bytes.len(), "cannot consume the sentinel");
        self.pos += n;
    }

    /// Skips leading spaces, the `>` marker, and one optional space after it.
    fn strip_block_quote_marker(&mut self) {
        self.advance(self.indent());
        debug_assert_eq!(self.first_nonspace(), b'>');
        self.advance(1);
        if self.rest()[0] == b' ' {
            self.advance(1);
        }
    }
}

pub(crate) struct BlockParser {
    tree: Tree,
    root: NodeId,
    open: Vec<NodeId>,
}

impl BlockParser {
    pub fn new() -> Self {
        let mut tree = Tree::new();
        let root = tree.alloc(Content::Document);
        Self {
            tree,
            root,
            open: vec![root],
        }
    }

    /// Feeds one preprocessed line to the analyzer.
    pub fn feed(&mut self, line: Vec<u8>) {
        let mut line = LineCursor::new(line);
        let mut lazy = false;

        // Phase 1: walk the open stack bottom-up and find how deep this line
        // still matches.
        let mut matched = 0;
        for depth in 0..self.open.len() {
            let id = self.open[depth];
            let ok = match self.tree.content(id) {
                Content::Document => true,
                Content::BlockQuote => self.match_block_quote(&mut line, &mut lazy),
                Content::Paragraph { .. } => !line.is_blank(),
                Content::IndentedCodeBlock { .. } => match_indented_code(&mut line),
                // Single-line leaves close on the line that created them and
                // never continue.
                _ => false,
            };
            if !ok {
                break;
            }
            matched = depth + 1;
        }
        trace!(
            "line {:?}: matched {}/{} open blocks",
            String::from_utf8_lossy(line.rest()),
            matched,
            self.open.len()
        );
        self.close_to(matched);

        // Phase 2: open new blocks until the remainder belongs to a leaf.
        let mut consumed = false;
        loop {
            let tip = self.tip();
            if self.tree.content(tip).accepts_literal_lines() {
                break;
            }
            let indent = line.indent();
            let blank = line.is_blank();
            let tip_is_paragraph = matches!(self.tree.content(tip), Content::Paragraph { .. });
            if !tip_is_paragraph && !blank && indent >= 4 {
                self.open_block(Content::IndentedCodeBlock { literal: Vec::new() });
                line.advance(4);
            } else if indent <= 3 && line.first_nonspace() == b'>' {
                self.open_block(Content::BlockQuote);
                line.strip_block_quote_marker();
            } else if let Some((level, raw)) = scan_atx_heading(line.rest()) {
                self.open_block(Content::AtxHeading { level, raw });
                self.close_tip();
                consumed = true;
                break;
            } else if let Some(level) = self.setext_level(&line, lazy) {
                let tip = self.tip();
                let raw = match self.tree.content_mut(tip) {
                    Content::Paragraph { raw } => std::mem::take(raw),
                    _ => unreachable!("setext underline requires an open paragraph"),
                };
                self.tree.set_content(tip, Content::SetextHeading { level, raw });
                self.close_tip();
                consumed = true;
                break;
            } else if scan_thematic_break(line.rest()) {
                self.open_block(Content::ThematicBreak);
                self.close_tip();
                consumed = true;
                break;
            } else if blank {
                consumed = true;
                break;
            } else if !self.tree.content(tip).accepts_lines() {
                self.open_block(Content::Paragraph { raw: Vec::new() });
            } else {
                break;
            }
            if self.tree.content(self.tip()).accepts_lines() {
                break;
            }
        }

        // Phase 3: append the remainder to the innermost open leaf.
        if !consumed {
            let tip = self.tip();
            match self.tree.content_mut(tip) {
                Content::Paragraph { raw } => {
                    let indent = line.indent();
                    line.advance(indent);
                    raw.extend_from_slice(line.rest());
                }
                Content::IndentedCodeBlock { literal } => {
                    literal.extend_from_slice(line.rest());
                }
                other => unreachable!("open leaf {:?} cannot accept a line", other),
            }
        }
    }

    /// Closes every remaining open block and returns the finished tree.
    pub fn finish(mut self) -> (Tree, NodeId) {
        self.close_to(1);
        (self.tree, self.root)
    }

    fn tip(&self) -> NodeId {
        *self.open.last().expect("open stack holds at least the document")
    }

    /// BlockQuote continuation: an explicit `>` marker continues and is
    /// stripped; otherwise a non-blank line continues lazily iff the
    /// innermost open block is a paragraph and the line does not start a
    /// block that may interrupt one.
    fn match_block_quote(&self, line: &mut LineCursor, lazy: &mut bool) -> bool {
        if line.is_blank() {
            return false;
        }
        if line.indent() <= 3 && line.first_nonspace() == b'>' {
            line.strip_block_quote_marker();
            return true;
        }
        let tip_is_paragraph = matches!(self.tree.content(self.tip()), Content::Paragraph { .. });
        if tip_is_paragraph && !interrupts_paragraph(line) {
            *lazy = true;
            return true;
        }
        false
    }

    /// Setext underlines apply only to a directly-continued one-line
    /// paragraph at the tip of the stack.
    fn setext_level(&self, line: &LineCursor, lazy: bool) -> Option<u8> {
        if lazy {
            return None;
        }
        match self.tree.content(self.tip()) {
            Content::Paragraph { raw } if has_one_line(raw) => scan_setext_underline(line.rest()),
            _ => None,
        }
    }

    /// Attaches a new block under the nearest open ancestor that admits it,
    /// closing refusing blocks along the way, and pushes it on the stack.
    fn open_block(&mut self, content: Content) -> NodeId {
        let child = self.tree.alloc(content);
        while !self
            .tree
            .content(self.tip())
            .can_contain(self.tree.content(child))
        {
            self.close_tip();
        }
        self.tree.append_child(self.tip(), child);
        self.open.push(child);
        child
    }

    fn close_to(&mut self, depth: usize) {
        debug_assert!(depth >= 1, "the document root never closes mid-parse");
        while self.open.len() > depth {
            self.close_tip();
        }
    }

    fn close_tip(&mut self) {
        let id = self.open.pop().expect("close requires an open block");
        assert!(id != self.root, "the document root never closes mid-parse");
        if let Content::IndentedCodeBlock { literal } = self.tree.content_mut(id) {
            trim_trailing_blank_lines(literal);
        }
    }
}

/// IndentedCodeBlock continuation: indented lines lose four columns, blank
/// lines lose whatever indentation they have.
fn match_indented_code(line: &mut LineCursor) -> bool {
    let indent = line.indent();
    if indent >= 4 {
        line.advance(4);
        true
    } else if line.is_blank() {
        line.advance(indent);
        true
    } else {
        false
    }
}

/// Whether the remainder starts a block that may interrupt a paragraph:
/// a blockquote marker, an ATX heading, or a thematic break. Indented code
/// and setext underlines do not interrupt.
fn interrupts_paragraph(line: &LineCursor) -> bool {
    (line.indent() <= 3 && line.first_nonspace() == b'>')
        || scan_atx_heading(line.rest()).is_some()
        || scan_thematic_break(line.rest())
}

/// Whether paragraph content holds exactly one line (a single trailing
/// newline and no interior one).
fn has_one_line(raw: &[u8]) -> bool {
    !raw.is_empty() && !raw[..raw.len() - 1].contains(&b'\n')
}

/// Recognizes an ATX heading and returns its level and trimmed raw content.
/// The opening run of 1-6 `#` may be indented at most three spaces and must
/// be followed by a space or the end of the line; a closing `#` run preceded
/// by a space is dropped.
pub(crate) fn scan_atx_heading(rest: &[u8]) -> Option<(u8, Vec<u8>)> {
    let line = &rest[..rest.len() - 1];
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let line = &line[indent..];
    let level = line.iter().take_while(|&&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    if line.len() > level && line[level] != b' ' {
        return None;
    }
    let mut start = level;
    while start < line.len() && line[start] == b' ' {
        start += 1;
    }
    let mut end = line.len();
    while end > start && line[end - 1] == b' ' {
        end -= 1;
    }
    // Optional closing sequence: a `#` run that is the whole content or is
    // preceded by a space.
    let mut hash_start = end;
    while hash_start > start && line[hash_start - 1] == b'#' {
        hash_start -= 1;
    }
    if hash_start < end && (hash_start == start || line[hash_start - 1] == b' ') {
        end = hash_start;
        while end > start && line[end - 1] == b' ' {
            end -= 1;
        }
    }
    Some((level as u8, line[start..end].to_vec()))
}

/// Recognizes a setext underline: up to three spaces of indentation, a run
/// of `=` (level 1) or `-` (level 2), then spaces to the end of the line.
pub(crate) fn scan_setext_underline(rest: &[u8]) -> Option<u8> {
    let line = &rest[..rest.len() - 1];
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let line = &line[indent..];
    let ch = *line.first()?;
    if ch != b'=' && ch != b'-' {
        return None;
    }
    let run = line.iter().take_while(|&&b| b == ch).count();
    if line[run..].iter().any(|&b| b != b' ') {
        return None;
    }
    Some(if ch == b'=' { 1 } else { 2 })
}

/// Recognizes a thematic break: at most three spaces of indentation, then
/// three or more matching `-`, `_`, or `*` interleaved only with spaces.
pub(crate) fn scan_thematic_break(rest: &[u8]) -> bool {
    let line = &rest[..rest.len() - 1];
    if leading_spaces(line) > 3 {
        return false;
    }
    let mut marker = 0u8;
    let mut count = 0;
    for &b in line {
        if b == b' ' {
            continue;
        }
        if marker == 0 {
            if !matches!(b, b'-' | b'_' | b'*') {
                return false;
            }
            marker = b;
        } else if b != marker {
            return false;
        }
        count += 1;
    }
    count >= 3
}

fn leading_spaces(line: &[u8]) -> usize {
    line.iter().take_while(|&&b| b == b' ').count()
}

/// Drops trailing lines that contain only their newline.
fn trim_trailing_blank_lines(literal: &mut Vec<u8>) {
    while literal.ends_with(b"\n\n") {
        literal.pop();
    }
    if literal == b"\n" {
        literal.clear();
    }
}
