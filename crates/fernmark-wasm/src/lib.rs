use wasm_bindgen::prelude::*;

/// Converts CommonMark source to an HTML fragment.
#[wasm_bindgen]
pub fn render_html(source: &str) -> String {
    fernmark_core::to_html(source)
}

/// Converts CommonMark source and sanitizes the result for direct insertion
/// into a page.
#[wasm_bindgen]
pub fn render_html_sanitized(source: &str) -> String {
    fernmark_core::to_html_sanitized(source)
}
