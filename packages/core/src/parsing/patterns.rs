//! Compiled line patterns shared by the parser, extractors and converter

use regex::Regex;
use std::sync::LazyLock;

/// `# Title` (exactly one hash): the document title line
pub(crate) static TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#\s").unwrap());

/// `[Intro]` / `[인트로]` marker, with any trailing text in group 1
pub(crate) static INTRO_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?:(?i:intro)|인트로)\]\s*(.*)$").unwrap());

/// `1. Title` main section; `1.1 Title` does not match (no space after `1.`)
pub(crate) static MAIN_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").unwrap());

/// `1.1 Title` or `1.1. Title`
pub(crate) static SUBSECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+)\.?\s+(.+)$").unwrap());

/// `## Title` / `### Title`; `####` is an item heading, not a section
pub(crate) static HEADING_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{2,3}\s+(.+)$").unwrap());

/// Inline `[HH:MM]` / `[HH:MM:SS]` token anywhere in a line
pub(crate) static TIMESTAMP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d{1,2}:\d{2}(?::\d{2})?)\]").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Remove every `[HH:MM]` token and tidy the whitespace left behind
pub(crate) fn strip_timestamp_tokens(text: &str) -> String {
    let stripped = TIMESTAMP_TOKEN.replace_all(text, "");
    WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned()
}

/// Whether a trimmed line opens a section in either numbering scheme
pub(crate) fn starts_section(line: &str) -> bool {
    MAIN_SECTION.is_match(line) || SUBSECTION.is_match(line) || HEADING_SECTION.is_match(line)
}
