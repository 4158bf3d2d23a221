use crate::parsing::patterns::{starts_section, INTRO_MARKER, TITLE_LINE};

/// Intro prose: lines before the first numbered or `##`/`###` line
///
/// The title line is excluded. Intro marker lines are excluded, but text
/// following a marker on the same line is kept.
pub fn extract_intro(markdown: &str) -> String {
    let mut lines = Vec::new();

    for line in markdown.lines().map(str::trim) {
        if line.is_empty() || TITLE_LINE.is_match(line) {
            continue;
        }
        if starts_section(line) {
            break;
        }

        let text = match INTRO_MARKER.captures(line) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str().trim()),
            None => line,
        };
        if !text.is_empty() {
            lines.push(text);
        }
    }

    lines.join("\n")
}
