//! End-to-end conversion scenarios and output-contract properties.

use fernmark_core::{to_html, to_html_sanitized};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn paragraphs() {
    init_logger();
    assert_eq!(to_html("hello world\n"), "<p>hello world</p>\n");
    assert_eq!(to_html("line1\nline2\n"), "<p>line1\nline2</p>\n");
    assert_eq!(to_html("line1\n\nline2\n"), "<p>line1</p>\n<p>line2</p>\n");
}

#[test]
fn final_line_without_terminator() {
    assert_eq!(to_html("hello"), "<p>hello</p>\n");
}

#[test]
fn empty_input_is_empty_output() {
    assert_eq!(to_html(""), "");
    assert_eq!(to_html("\n\n\n"), "");
}

#[test]
fn atx_headings() {
    assert_eq!(to_html("# Heading\n"), "<h1>Heading</h1>\n");
    assert_eq!(to_html("###### six\n"), "<h6>six</h6>\n");
    assert_eq!(to_html("## closed ##\n"), "<h2>closed</h2>\n");
}

#[test]
fn setext_headings() {
    assert_eq!(to_html("Title\n=====\n"), "<h1>Title</h1>\n");
    assert_eq!(to_html("Title\n-----\n"), "<h2>Title</h2>\n");
}

#[test]
fn indented_code_blocks() {
    assert_eq!(
        to_html("    code\n    more\n"),
        "<pre><code>code\nmore\n</code></pre>\n"
    );
    assert_eq!(
        to_html("    <not html> & stuff\n"),
        "<pre><code>&lt;not html&gt; &amp; stuff\n</code></pre>\n"
    );
}

#[test]
fn thematic_breaks() {
    assert_eq!(to_html("---\n"), "<hr />\n");
    assert_eq!(to_html("a\n\n***\n\nb\n"), "<p>a</p>\n<hr />\n<p>b</p>\n");
}

#[test]
fn block_quotes() {
    assert_eq!(
        to_html("> quoted\n> text\n"),
        "<blockquote>\n<p>quoted\ntext</p>\n</blockquote>\n"
    );
    assert_eq!(
        to_html("> a\n\n> b\n"),
        "<blockquote>\n<p>a</p>\n</blockquote>\n<blockquote>\n<p>b</p>\n</blockquote>\n"
    );
}

#[test]
fn emphasis_nesting() {
    assert_eq!(
        to_html("a *b **c** d* e\n"),
        "<p>a <em>b <strong>c</strong> d</em> e</p>\n"
    );
}

#[test]
fn strong_preferred_over_nested_em() {
    assert_eq!(to_html("**bold**\n"), "<p><strong>bold</strong></p>\n");
    assert_eq!(
        to_html("***both***\n"),
        "<p><strong><em>both</em></strong></p>\n"
    );
}

#[test]
fn code_spans() {
    assert_eq!(
        to_html("`` foo ` bar ``\n"),
        "<p><code>foo ` bar</code></p>\n"
    );
    assert_eq!(to_html("`a  b`\n"), "<p><code>a b</code></p>\n");
    assert_eq!(to_html("`<em>&</em>`\n"), "<p><code>&lt;em&gt;&amp;&lt;/em&gt;</code></p>\n");
}

#[test]
fn hard_and_soft_breaks() {
    assert_eq!(to_html("line  \nbreak\n"), "<p>line<br />\nbreak</p>\n");
    assert_eq!(to_html("line\\\nbreak\n"), "<p>line<br />\nbreak</p>\n");
    assert_eq!(to_html("line\nbreak\n"), "<p>line\nbreak</p>\n");
}

#[test]
fn entities() {
    assert_eq!(to_html("&amp; &#65; &#x41;\n"), "<p>&amp; A A</p>\n");
    assert_eq!(to_html("&hellip;\n"), "<p>\u{2026}</p>\n");
    assert_eq!(to_html("&nosuch; &#;\n"), "<p>&amp;nosuch; &amp;#;</p>\n");
}

#[test]
fn autolinks() {
    assert_eq!(
        to_html("<http://example.com>\n"),
        "<p><a href=\"http://example.com\">http://example.com</a></p>\n"
    );
    assert_eq!(
        to_html("<user@example.com>\n"),
        "<p><a href=\"mailto:user@example.com\">user@example.com</a></p>\n"
    );
}

#[test]
fn raw_html_passes_through() {
    assert_eq!(to_html("a <b>bold</b> c\n"), "<p>a <b>bold</b> c</p>\n");
    assert_eq!(
        to_html("keep <!-- comment --> this\n"),
        "<p>keep <!-- comment --> this</p>\n"
    );
    assert_eq!(to_html("\\<b>\n"), "<p>&lt;b&gt;</p>\n");
}

#[test]
fn backslash_escapes() {
    assert_eq!(to_html("\\*literal\\*\n"), "<p>*literal*</p>\n");
    assert_eq!(to_html("back\\slash\n"), "<p>back\\slash</p>\n");
}

#[test]
fn headings_contain_inlines() {
    assert_eq!(to_html("# *em* `c`\n"), "<h1><em>em</em> <code>c</code></h1>\n");
    assert_eq!(
        to_html("**strong** title\n====\n"),
        "<h1><strong>strong</strong> title</h1>\n"
    );
}

#[test]
fn determinism() {
    let input = "# h\n\n> q *em* `c`\n\n    code\n\n---\n";
    assert_eq!(to_html(input), to_html(input));
}

#[test]
fn line_ending_neutrality() {
    let unix = "# h\n\npara\nmore\n\n    code\n";
    let dos = unix.replace('\n', "\r\n");
    let mac = unix.replace('\n', "\r");
    assert_eq!(to_html(&dos), to_html(unix));
    assert_eq!(to_html(&mac), to_html(unix));
}

#[test]
fn tab_expansion_equivalence() {
    assert_eq!(to_html("\tcode\n"), to_html("    code\n"));
    assert_eq!(to_html("\tcode\n"), "<pre><code>code\n</code></pre>\n");
}

#[test]
fn code_span_output_has_no_space_runs() {
    let html = to_html("`  a   b  `\n");
    let inner = html
        .split("<code>")
        .nth(1)
        .and_then(|rest| rest.split("</code>").next())
        .unwrap();
    assert!(!inner.starts_with(' '));
    assert!(!inner.ends_with(' '));
    assert!(!inner.contains("  "));
}

#[test]
fn escaper_re_escapes_ampersands() {
    // An `&amp;` in the source decodes to `&` and is re-escaped on output.
    assert_eq!(to_html("&amp;amp;\n"), "<p>&amp;amp;</p>\n");
}

#[test]
fn sanitized_output_drops_script() {
    let html = to_html_sanitized("safe <script>alert(1)</script> text\n");
    assert!(!html.contains("<script>"));
    assert!(html.contains("safe"));
}

#[test]
fn deeply_nested_emphasis_stays_bounded() {
    // 300 potential openers exceed the delimiter cap; conversion must
    // complete and remain deterministic.
    let mut input = String::new();
    for _ in 0..300 {
        input.push_str("*a ");
    }
    let first = to_html(&input);
    assert_eq!(first, to_html(&input));
}

#[test]
fn deeply_nested_quotes_render() {
    let mut input = String::new();
    for _ in 0..500 {
        input.push_str("> ");
    }
    input.push_str("deep\n");
    let html = to_html(&input);
    assert_eq!(html.matches("<blockquote>").count(), 500);
    assert!(html.contains("<p>deep</p>"));
}
