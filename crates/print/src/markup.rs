//! Escaping and sanitization for user-supplied strings in print markup.
//!
//! Layout content is operator-authored, not trusted: every text fragment is
//! entity-escaped, colors must look like colors, and only `http`/`https`
//! URLs survive into the document.

use std::sync::LazyLock;

use regex::Regex;

/// Substitute for any color value that fails sanitization.
pub const FALLBACK_COLOR: &str = "#000000";

/// `#RGB`, `#RRGGBB`, or `#RRGGBBAA`.
static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex")
});

/// Plain named colors (`white`, `rebeccapurple`). Anything beyond letters
/// could carry CSS syntax, so it is rejected rather than parsed.
static NAMED_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("valid regex"));

/// Entity-escape text for element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A color value safe to embed in a style attribute, or [`FALLBACK_COLOR`].
///
/// Style-variable references (`var(…)`, `--name`) are authoring-surface
/// syntax that must never reach a printed page.
pub fn sanitize_color(value: &str) -> &str {
    let value = value.trim();
    if value.contains("var(") || value.starts_with("--") {
        return FALLBACK_COLOR;
    }
    if HEX_COLOR_RE.is_match(value) || NAMED_COLOR_RE.is_match(value) {
        value
    } else {
        FALLBACK_COLOR
    }
}

/// A URL safe to embed, which means `http` or `https` and nothing else.
pub fn sanitize_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url)
    } else {
        None
    }
}
