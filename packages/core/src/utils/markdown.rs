//! Inline Markdown cleanup for extracted text
//!
//! Extraction helpers return display text (TOC titles, glossary terms, action
//! items), so inline emphasis and link syntax is removed while the words stay.

use regex::Regex;
use std::sync::LazyLock;

/// Inline patterns, applied in order
///
/// 1. Images before links (`![..]` contains a link)
/// 2. Links before emphasis
/// 3. Bold before italic (`**` contains `*`)
static INLINE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap(), "$1"),
        (Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(), "$1"),
        (Regex::new(r"`([^`]+)`").unwrap(), "$1"),
        (Regex::new(r"\*\*([^*]+)\*\*").unwrap(), "$1"),
        (Regex::new(r"__([^_]+)__").unwrap(), "$1"),
        (Regex::new(r"~~([^~]+)~~").unwrap(), "$1"),
        (Regex::new(r"\*([^*\s][^*]*)\*").unwrap(), "$1"),
    ]
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Quote glyphs trimmed from both ends of quoted text
const QUOTE_GLYPHS: &[char] = &['"', '\'', '“', '”', '‘', '’', '「', '」', '『', '』', '«', '»'];

/// Strip inline Markdown formatting, keeping the text
///
/// # Examples
///
/// ```
/// use summanote_core::utils::strip_inline_markdown;
///
/// assert_eq!(strip_inline_markdown("**bold** text"), "bold text");
/// assert_eq!(strip_inline_markdown("[link](http://example.com)"), "link");
/// assert_eq!(strip_inline_markdown("use `cargo`  now"), "use cargo now");
/// ```
pub fn strip_inline_markdown(content: &str) -> String {
    let mut result = content.to_string();
    for (pattern, replacement) in INLINE_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }
    WHITESPACE_RE.replace_all(&result, " ").trim().to_string()
}

/// Trim whitespace and surrounding quote glyphs
///
/// ```
/// use summanote_core::utils::trim_quote_glyphs;
///
/// assert_eq!(trim_quote_glyphs(" “작은 습관이 큰 변화를 만든다” "), "작은 습관이 큰 변화를 만든다");
/// ```
pub fn trim_quote_glyphs(text: &str) -> &str {
    text.trim().trim_matches(QUOTE_GLYPHS).trim()
}
