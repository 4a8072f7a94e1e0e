//! Inline analysis.
//!
//! After block parsing, every Paragraph and heading leaf holds raw bytes.
//! A single left-to-right scan turns those bytes into a subtree of inline
//! nodes: backslash escapes, entity references, code spans, raw HTML,
//! autolinks, hard/soft line breaks, and emphasis via a delimiter stack.
//! Nothing here can fail; whatever does not parse stays literal text.

use crate::entities::decode_entity;
use crate::tree::{Content, NodeId, Tree};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cap on simultaneously open delimiter runs per leaf. Runs arriving above
/// the cap are literal text, which bounds both nesting depth and the
/// quadratic matching cost on adversarial input.
const MAX_OPEN_DELIMITERS: usize = 100;

/// Elaborates every raw-text leaf under `root` into inline children.
pub(crate) fn process_document(tree: &mut Tree, root: NodeId) {
    let mut pending = vec![root];
    let mut leaves = Vec::new();
    while let Some(id) = pending.pop() {
        match tree.content(id) {
            Content::Paragraph { .. }
            | Content::AtxHeading { .. }
            | Content::SetextHeading { .. } => leaves.push(id),
            _ => pending.extend(tree.children(id)),
        }
    }
    for leaf in leaves {
        let mut raw = match tree.content_mut(leaf) {
            Content::Paragraph { raw }
            | Content::AtxHeading { raw, .. }
            | Content::SetextHeading { raw, .. } => std::mem::take(raw),
            _ => unreachable!("collected leaf carries raw text"),
        };
        trim_trailing_whitespace(&mut raw);
        InlineParser::new(tree, leaf, raw).run();
    }
}

fn trim_trailing_whitespace(raw: &mut Vec<u8>) {
    while raw.last().is_some_and(|b| b.is_ascii_whitespace()) {
        raw.pop();
    }
}

struct DelimiterRun {
    ch: u8,
    len: usize,
    node: NodeId,
    can_open: bool,
}

struct InlineParser<'t> {
    tree: &'t mut Tree,
    parent: NodeId,
    data: Vec<u8>,
    pos: usize,
    text_buf: Vec<u8>,
    delims: Vec<DelimiterRun>,
}

impl<'t> InlineParser<'t> {
    fn new(tree: &'t mut Tree, parent: NodeId, data: Vec<u8>) -> Self {
        Self {
            tree,
            parent,
            data,
            pos: 0,
            text_buf: Vec::new(),
            delims: Vec::new(),
        }
    }

    fn run(mut self) {
        while self.pos < self.data.len() {
            let b = self.data[self.pos];
            match b {
                b'\\' => {
                    if let Some(&next) = self.data.get(self.pos + 1) {
                        if next == b'\n' {
                            self.flush_text();
                            self.append_node(Content::HardBreak);
                            self.pos += 2;
                            self.skip_leading_spaces();
                            continue;
                        }
                        if next.is_ascii_punctuation() {
                            self.text_buf.push(next);
                            self.pos += 2;
                            continue;
                        }
                    }
                    self.text_buf.push(b'\\');
                    self.pos += 1;
                    continue;
                }
                b'`' => {
                    let run = count_run(&self.data, self.pos, b'`');
                    if let Some((content, end)) = scan_code_span(&self.data, self.pos, run) {
                        self.flush_text();
                        self.append_node(Content::CodeSpan { bytes: content });
                        self.pos = end;
                        continue;
                    }
                    self.text_buf.extend(std::iter::repeat_n(b'`', run));
                    self.pos += run;
                    continue;
                }
                b'<' => {
                    if let Some((link, end)) = scan_autolink(&self.data, self.pos) {
                        self.flush_text();
                        let node = self.append_node(Content::Link {
                            destination: link.destination,
                        });
                        let text = self.tree.alloc(Content::Text { bytes: link.body });
                        self.tree.append_child(node, text);
                        self.pos = end;
                        continue;
                    }
                    if let Some(end) = scan_html_span(&self.data, self.pos) {
                        self.flush_text();
                        let raw = self.data[self.pos..end].to_vec();
                        self.append_node(Content::HtmlSpan { raw });
                        self.pos = end;
                        continue;
                    }
                }
                b'&' => {
                    if let Some((decoded, next)) =
                        decode_entity(&self.data, self.pos, self.data.len())
                    {
                        self.text_buf.extend_from_slice(&decoded);
                        self.pos = next;
                        continue;
                    }
                }
                b'*' | b'_' => {
                    self.handle_delimiter_run(b);
                    continue;
                }
                b'\n' => {
                    let trailing = self
                        .text_buf
                        .iter()
                        .rev()
                        .take_while(|&&b| b == b' ')
                        .count();
                    self.text_buf.truncate(self.text_buf.len() - trailing);
                    self.flush_text();
                    self.append_node(if trailing >= 2 {
                        Content::HardBreak
                    } else {
                        Content::SoftBreak
                    });
                    self.pos += 1;
                    self.skip_leading_spaces();
                    continue;
                }
                _ => {}
            }
            self.text_buf.push(b);
            self.pos += 1;
        }
        self.flush_text();
    }

    fn flush_text(&mut self) {
        if self.text_buf.is_empty() {
            return;
        }
        let bytes = std::mem::take(&mut self.text_buf);
        self.append_node(Content::Text { bytes });
    }

    fn append_node(&mut self, content: Content) -> NodeId {
        let id = self.tree.alloc(content);
        self.tree.append_child(self.parent, id);
        id
    }

    fn skip_leading_spaces(&mut self) {
        while self.data.get(self.pos) == Some(&b' ') {
            self.pos += 1;
        }
    }

    /// Consumes a `*`/`_` run: tries to close open emphasis, then leaves any
    /// residue as a (possibly opening) literal text node.
    fn handle_delimiter_run(&mut self, ch: u8) {
        let run = count_run(&self.data, self.pos, ch);
        let (can_open, can_close) = self.delimiter_properties(ch, run);
        self.flush_text();
        self.pos += run;
        if run > 3 {
            let bytes = std::iter::repeat_n(ch, run).collect();
            self.append_node(Content::Text { bytes });
            return;
        }
        let mut remaining = run;
        if can_close {
            while remaining > 0 {
                let Some(idx) = self.find_opener(ch) else {
                    break;
                };
                let use_len = delimiter_use_len(self.delims[idx].len, remaining);
                self.apply_emphasis(idx, use_len);
                remaining -= use_len;
            }
        }
        if remaining > 0 {
            let bytes = std::iter::repeat_n(ch, remaining).collect();
            let node = self.append_node(Content::Text { bytes });
            if can_open && self.delims.len() < MAX_OPEN_DELIMITERS {
                self.delims.push(DelimiterRun {
                    ch,
                    len: remaining,
                    node,
                    can_open,
                });
            }
        }
    }

    fn find_opener(&self, ch: u8) -> Option<usize> {
        self.delims
            .iter()
            .rposition(|d| d.ch == ch && d.can_open && d.len > 0)
    }

    /// Consumes `use_len` delimiters from the opener at stack index `idx` and
    /// from the current closer, wrapping everything between them in a new
    /// Emph or Strong node.
    fn apply_emphasis(&mut self, idx: usize, use_len: usize) {
        let opener_node = self.delims[idx].node;
        let wrapper = self.tree.alloc(if use_len == 2 {
            Content::Strong
        } else {
            Content::Emph
        });
        while let Some(next) = self.tree.next(opener_node) {
            self.tree.remove(next);
            self.tree.append_child(wrapper, next);
        }
        self.tree.insert_after(opener_node, wrapper);

        // Entries above the opener now sit inside the wrapper; they are no
        // longer eligible and leave the stack as literal text.
        self.delims.truncate(idx + 1);
        let opener = &mut self.delims[idx];
        opener.len -= use_len;
        let remaining = opener.len;
        match self.tree.content_mut(opener_node) {
            Content::Text { bytes } => bytes.truncate(remaining),
            other => unreachable!("delimiter run is a text node, found {:?}", other),
        }
        if remaining == 0 {
            self.tree.remove(opener_node);
            self.delims.pop();
        }
    }

    /// Whether a run at the current position may open or close emphasis,
    /// per the ASCII flanking rules: opening forbids a following whitespace,
    /// closing forbids a preceding one, and `_` additionally refuses to open
    /// after an alphanumeric or close before one.
    fn delimiter_properties(&self, ch: u8, run: usize) -> (bool, bool) {
        let before = self.pos.checked_sub(1).map(|i| self.data[i]);
        let after = self.data.get(self.pos + run).copied();
        let mut can_open = !after.is_none_or(|b| b.is_ascii_whitespace());
        let mut can_close = !before.is_none_or(|b| b.is_ascii_whitespace());
        if ch == b'_' {
            can_open = can_open && !before.is_some_and(|b| b.is_ascii_alphanumeric());
            can_close = can_close && !after.is_some_and(|b| b.is_ascii_alphanumeric());
        }
        (can_open, can_close)
    }
}

/// Delimiters consumed by one opener/closer match: two when both sides can
/// form strong emphasis, except that two length-3 runs consume one first so
/// the strong emphasis ends up outermost.
fn delimiter_use_len(opener_len: usize, closer_len: usize) -> usize {
    if opener_len == 3 && closer_len == 3 {
        1
    } else if opener_len >= 2 && closer_len >= 2 {
        2
    } else {
        1
    }
}

pub(crate) fn count_run(data: &[u8], start: usize, needle: u8) -> usize {
    data[start..].iter().take_while(|&&b| b == needle).count()
}

/// Finds the closing backtick string for the run of `run_len` backticks at
/// `start` and returns the processed span content with the end index. The
/// closer is the next maximal run of exactly equal length.
fn scan_code_span(data: &[u8], start: usize, run_len: usize) -> Option<(Vec<u8>, usize)> {
    let mut i = start + run_len;
    while i < data.len() {
        if data[i] == b'`' {
            let close = count_run(data, i, b'`');
            if close == run_len {
                let content = collapse_code_span(&data[start + run_len..i]);
                return Some((content, i + close));
            }
            i += close;
        } else {
            i += 1;
        }
    }
    None
}

/// Strips leading/trailing spaces and newlines and collapses interior runs
/// of them to a single space.
fn collapse_code_span(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut pending_space = false;
    for &b in content {
        if b == b' ' || b == b'\n' {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(b' ');
                pending_space = false;
            }
            out.push(b);
        }
    }
    out
}

struct Autolink {
    destination: Vec<u8>,
    body: Vec<u8>,
}

/// Recognizes `<scheme:...>` against the scheme allow-list or `<email>`;
/// returns the link and the index past the closing `>`.
fn scan_autolink(data: &[u8], start: usize) -> Option<(Autolink, usize)> {
    let mut i = start + 1;
    while i < data.len() {
        let b = data[i];
        if b == b'>' {
            break;
        }
        if b.is_ascii_whitespace() || b.is_ascii_control() || b == b'<' {
            return None;
        }
        i += 1;
    }
    if i >= data.len() || i == start + 1 {
        return None;
    }
    let body = &data[start + 1..i];
    let destination = if is_autolink_uri(body) {
        body.to_vec()
    } else if is_autolink_email(body) {
        let mut dest = b"mailto:".to_vec();
        dest.extend_from_slice(body);
        dest
    } else {
        return None;
    };
    Some((
        Autolink {
            destination,
            body: body.to_vec(),
        },
        i + 1,
    ))
}

static AUTOLINK_SCHEMES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| SCHEMES.iter().copied().collect());

/// The recognized autolink schemes, matched case-insensitively.
#[rustfmt::skip]
const SCHEMES: &[&str] = &[
    "aaa", "aaas", "about", "acap", "adiumxtra", "afp", "afs", "aim", "apt",
    "attachment", "aw", "beshare", "bitcoin", "bolo", "callto", "cap",
    "chrome", "chrome-extension", "cid", "coap", "com-eventbrite-attendee",
    "content", "crid", "cvs", "data", "dav", "dict", "dlna-playcontainer",
    "dlna-playsingle", "dns", "doi", "dtn", "dvb", "ed2k", "facetime",
    "feed", "file", "finger", "fish", "ftp", "geo", "gg", "git",
    "gizmoproject", "go", "gopher", "gtalk", "h323", "hcp", "http",
    "https", "iax", "icap", "icon", "im", "imap", "info", "ipn", "ipp",
    "irc", "irc6", "ircs", "iris", "iris.beep", "iris.lwz", "iris.xpc",
    "iris.xpcs", "itms", "jar", "javascript", "jms", "keyparc", "lastfm",
    "ldap", "ldaps", "magnet", "mailto", "maps", "market", "message",
    "mid", "mms", "ms-help", "msnim", "msrp", "msrps", "mtqp", "mumble",
    "mupdate", "mvn", "news", "nfs", "ni", "nih", "nntp", "notes", "oid",
    "opaquelocktoken", "palm", "paparazzi", "platform", "pop", "pres",
    "proxy", "psyc", "query", "res", "resource", "rmi", "rsync", "rtmp",
    "rtsp", "secondlife", "service", "session", "sftp", "sgn", "shttp",
    "sieve", "sip", "sips", "skype", "smb", "sms", "snmp", "soap.beep",
    "soap.beeps", "soldat", "spotify", "ssh", "steam", "svn", "tag",
    "teamspeak", "tel", "telnet", "tftp", "things", "thismessage", "tip",
    "tn3270", "tv", "udp", "unreal", "urn", "ut2004", "vemmi",
    "ventrilo", "view-source", "webcal", "ws", "wss", "wtai", "wyciwyg",
    "xcon", "xcon-userid", "xfire", "xmlrpc.beep", "xmlrpc.beeps", "xmpp",
    "xri", "ymsgr", "z39.50r", "z39.50s",
];

fn is_autolink_uri(body: &[u8]) -> bool {
    let Some(colon) = body.iter().position(|&b| b == b':') else {
        return false;
    };
    if colon < 2 || colon + 1 >= body.len() {
        return false;
    }
    let scheme = &body[..colon];
    if !scheme[0].is_ascii_alphabetic()
        || !scheme
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
    {
        return false;
    }
    let lowered: String = scheme.iter().map(|b| b.to_ascii_lowercase() as char).collect();
    AUTOLINK_SCHEMES.contains(lowered.as_str())
}

/// The HTML5 email address grammar: a run of atext characters, `@`, then
/// dot-separated domain labels of at most 63 characters that start and end
/// alphanumerically.
fn is_autolink_email(body: &[u8]) -> bool {
    let at = body.iter().position(|&b| b == b'@');
    let Some(at) = at else { return false };
    let (local, domain) = (&body[..at], &body[at + 1..]);
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let local_ok = local.iter().all(|&b| {
        b.is_ascii_alphanumeric()
            || matches!(
                b,
                b'.' | b'!'
                    | b'#'
                    | b'$'
                    | b'%'
                    | b'&'
                    | b'\''
                    | b'*'
                    | b'+'
                    | b'/'
                    | b'='
                    | b'?'
                    | b'^'
                    | b'_'
                    | b'`'
                    | b'{'
                    | b'|'
                    | b'}'
                    | b'~'
                    | b'-'
            )
    });
    local_ok && domain.split(|&b| b == b'.').all(is_domain_label)
}

fn is_domain_label(label: &[u8]) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && label[0].is_ascii_alphanumeric()
        && label[label.len() - 1].is_ascii_alphanumeric()
        && label
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Recognizes an inline raw-HTML span at `start` (which must be a `<`) and
/// returns the index past its end: an open or closing tag, a comment with no
/// embedded `--`, a processing instruction, a declaration, or CDATA.
fn scan_html_span(data: &[u8], start: usize) -> Option<usize> {
    let next = *data.get(start + 1)?;
    match next {
        b'!' => {
            if data[start + 2..].starts_with(b"--") {
                return scan_html_comment(data, start);
            }
            if data[start + 2..].starts_with(b"[CDATA[") {
                let mut i = start + 9;
                while i + 2 < data.len() {
                    if &data[i..i + 3] == b"]]>" {
                        return Some(i + 3);
                    }
                    i += 1;
                }
                return None;
            }
            if data.get(start + 2).is_some_and(|b| b.is_ascii_alphabetic()) {
                let close = data[start + 2..].iter().position(|&b| b == b'>')?;
                return Some(start + 2 + close + 1);
            }
            None
        }
        b'?' => {
            let mut i = start + 2;
            while i + 1 < data.len() {
                if data[i] == b'?' && data[i + 1] == b'>' {
                    return Some(i + 2);
                }
                i += 1;
            }
            None
        }
        _ => scan_html_tag(data, start),
    }
}

/// A comment is `<!--` text `-->` where the text contains no `--`, so the
/// first `--` inside must be the one that terminates it.
fn scan_html_comment(data: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 4;
    while i + 1 < data.len() {
        if data[i] == b'-' && data[i + 1] == b'-' {
            return if data.get(i + 2) == Some(&b'>') {
                Some(i + 3)
            } else {
                None
            };
        }
        i += 1;
    }
    None
}

fn scan_html_tag(data: &[u8], start: usize) -> Option<usize> {
    let end = data.len();
    let mut i = start + 1;
    let closing = data.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    if !data.get(i).is_some_and(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    i += 1;
    while i < end && (data[i].is_ascii_alphanumeric() || data[i] == b'-') {
        i += 1;
    }
    if closing {
        while i < end && data[i].is_ascii_whitespace() {
            i += 1;
        }
        return (i < end && data[i] == b'>').then_some(i + 1);
    }
    loop {
        let after_name = i;
        while i < end && data[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= end {
            return None;
        }
        match data[i] {
            b'>' => return Some(i + 1),
            b'/' if data.get(i + 1) == Some(&b'>') => return Some(i + 2),
            b if is_attr_name_start(b) && i > after_name => {
                i += 1;
                while i < end && is_attr_name_continue(data[i]) {
                    i += 1;
                }
                i = scan_attr_value(data, i)?;
            }
            _ => return None,
        }
    }
}

/// Scans an optional `= value` after an attribute name; returns the index
/// past the attribute.
fn scan_attr_value(data: &[u8], mut i: usize) -> Option<usize> {
    let end = data.len();
    let mut ws = i;
    while ws < end && data[ws].is_ascii_whitespace() {
        ws += 1;
    }
    if ws >= end || data[ws] != b'=' {
        return Some(i);
    }
    i = ws + 1;
    while i < end && data[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= end {
        return None;
    }
    let quote = data[i];
    if quote == b'"' || quote == b'\'' {
        i += 1;
        while i < end && data[i] != quote {
            i += 1;
        }
        return (i < end).then_some(i + 1);
    }
    let value_start = i;
    while i < end {
        let b = data[i];
        if b.is_ascii_whitespace() || b == b'>' {
            break;
        }
        if b == b'/' && data.get(i + 1) == Some(&b'>') {
            break;
        }
        if matches!(b, b'"' | b'\'' | b'=' | b'<' | b'`') {
            return None;
        }
        i += 1;
    }
    (i > value_start).then_some(i)
}

fn is_attr_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

fn is_attr_name_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'.' | b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_inline(input: &str) -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let parent = tree.alloc(Content::Paragraph { raw: Vec::new() });
        InlineParser::new(&mut tree, parent, input.as_bytes().to_vec()).run();
        (tree, parent)
    }

    fn dump(tree: &Tree, parent: NodeId) -> String {
        let mut out = String::new();
        for id in tree.children(parent) {
            match tree.content(id) {
                Content::Text { bytes } => {
                    out.push_str(&format!("T({})", String::from_utf8_lossy(bytes)));
                }
                Content::CodeSpan { bytes } => {
                    out.push_str(&format!("C({})", String::from_utf8_lossy(bytes)));
                }
                Content::HtmlSpan { raw } => {
                    out.push_str(&format!("H({})", String::from_utf8_lossy(raw)));
                }
                Content::Link { destination } => {
                    out.push_str(&format!(
                        "L[{}]({})",
                        String::from_utf8_lossy(destination),
                        dump(tree, id)
                    ));
                }
                Content::Emph => out.push_str(&format!("E({})", dump(tree, id))),
                Content::Strong => out.push_str(&format!("S({})", dump(tree, id))),
                Content::HardBreak => out.push_str("BR"),
                Content::SoftBreak => out.push_str("NL"),
                other => panic!("unexpected inline {:?}", other),
            }
        }
        out
    }

    fn scan(input: &str) -> String {
        let (tree, parent) = parse_inline(input);
        dump(&tree, parent)
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(scan("hello world"), "T(hello world)");
    }

    #[test]
    fn escaped_punctuation_is_literal() {
        assert_eq!(scan("\\*not em\\*"), "T(*not em*)");
        assert_eq!(scan("\\\\"), "T(\\)");
        assert_eq!(scan("\\a"), "T(\\a)");
    }

    #[test]
    fn escaped_angle_never_starts_html() {
        assert_eq!(scan("\\<b>"), "T(<b>)");
    }

    #[test]
    fn code_span_trims_and_collapses() {
        assert_eq!(scan("`` foo ` bar ``"), "C(foo ` bar)");
        assert_eq!(scan("`a  b`"), "C(a b)");
        assert_eq!(scan("`a\nb`"), "C(a b)");
    }

    #[test]
    fn unmatched_backticks_stay_literal() {
        assert_eq!(scan("`a``"), "T(`a``)");
    }

    #[test]
    fn overlapping_backtick_runs() {
        assert_eq!(scan("``foo`bar``biz`"), "C(foo`bar)T(biz`)");
    }

    #[test]
    fn code_span_is_opaque() {
        assert_eq!(scan("`*a* &amp; \\n`"), "C(*a* &amp; \\n)");
    }

    #[test]
    fn entities_decode_into_text() {
        assert_eq!(scan("&amp; &#65; &#x41;"), "T(& A A)");
        assert_eq!(scan("&bogus; x"), "T(&bogus; x)");
    }

    #[test]
    fn emphasis_and_strong() {
        assert_eq!(scan("*a*"), "E(T(a))");
        assert_eq!(scan("**a**"), "S(T(a))");
        assert_eq!(scan("a *b **c** d* e"), "T(a )E(T(b )S(T(c))T( d))T( e)");
    }

    #[test]
    fn triple_runs_nest_strong_outside() {
        assert_eq!(scan("***a***"), "S(E(T(a)))");
    }

    #[test]
    fn mixed_length_runs_leave_residue() {
        assert_eq!(scan("***a* b**"), "S(E(T(a))T( b))");
        assert_eq!(scan("***a** b*"), "E(S(T(a))T( b))");
    }

    #[test]
    fn underscore_refuses_intraword() {
        assert_eq!(scan("a_b_c"), "T(a_b_c)");
        assert_eq!(scan("_b_"), "E(T(b))");
    }

    #[test]
    fn long_runs_are_literal() {
        assert_eq!(scan("****a****"), "T(****)T(a)T(****)");
    }

    #[test]
    fn unmatched_delimiters_stay_literal() {
        assert_eq!(scan("*a"), "T(*)T(a)");
        assert_eq!(scan("a*"), "T(a)T(*)");
    }

    #[test]
    fn whitespace_blocks_opening() {
        assert_eq!(scan("* a*"), "T(*)T( a)T(*)");
    }

    #[test]
    fn soft_and_hard_breaks() {
        assert_eq!(scan("a\nb"), "T(a)NLT(b)");
        assert_eq!(scan("a  \nb"), "T(a)BRT(b)");
        assert_eq!(scan("a\\\nb"), "T(a)BRT(b)");
        assert_eq!(scan("a \nb"), "T(a)NLT(b)");
    }

    #[test]
    fn break_discards_surrounding_spaces() {
        assert_eq!(scan("a   \n   b"), "T(a)BRT(b)");
    }

    #[test]
    fn scheme_autolink() {
        assert_eq!(
            scan("<http://example.com>"),
            "L[http://example.com](T(http://example.com))"
        );
        assert_eq!(scan("<HTTP://A.COM>"), "L[HTTP://A.COM](T(HTTP://A.COM))");
    }

    #[test]
    fn email_autolink() {
        assert_eq!(scan("<a@b.c>"), "L[mailto:a@b.c](T(a@b.c))");
        assert_eq!(scan("<a@b>"), "L[mailto:a@b](T(a@b))");
        assert_eq!(scan("<a@b->"), "T(<a@b->)");
    }

    #[test]
    fn unknown_scheme_is_not_autolink() {
        assert_eq!(scan("<foo:bar>"), "T(<foo:bar>)");
        assert_eq!(scan("<http://a b>"), "T(<http://a b>)");
    }

    #[test]
    fn raw_html_tags_pass_through() {
        assert_eq!(scan("<b>x</b>"), "H(<b>)T(x)H(</b>)");
        assert_eq!(scan("<a href=\"u\" disabled>"), "H(<a href=\"u\" disabled>)");
        assert_eq!(scan("<br/>"), "H(<br/>)");
        assert_eq!(scan("<1bad>"), "T(<1bad>)");
    }

    #[test]
    fn raw_html_comment_forbids_embedded_dashes() {
        assert_eq!(scan("<!-- ok -->"), "H(<!-- ok -->)");
        assert_eq!(scan("<!-- a -- b -->"), "T(<!-- a -- b -->)");
        assert_eq!(scan("<!---->"), "H(<!---->)");
    }

    #[test]
    fn raw_html_other_forms() {
        assert_eq!(scan("<?php x ?>"), "H(<?php x ?>)");
        assert_eq!(scan("<!DOCTYPE html>"), "H(<!DOCTYPE html>)");
        assert_eq!(scan("<![CDATA[<>]]>"), "H(<![CDATA[<>]]>)");
    }

    #[test]
    fn emphasis_wraps_other_inlines() {
        assert_eq!(scan("*a `c` b*"), "E(T(a )C(c)T( b))");
        assert_eq!(scan("*a\nb*"), "E(T(a)NLT(b))");
    }

    #[test]
    fn crossing_runs_degrade_to_literal() {
        // The `_` opener is trapped inside the `*` match and may not close
        // afterwards.
        assert_eq!(scan("*a _b* c_"), "E(T(a )T(_)T(b))T( c)T(_)");
    }
}
