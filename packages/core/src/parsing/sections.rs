//! Markdown → `ParsedSection` parser
//!
//! A single line-oriented pass folded over an owned [`ParseState`]. Each
//! trimmed line is first checked for section structure (title, intro marker,
//! `N.` / `N.M` / `##` headers); remaining body lines are classified by the
//! ordered [`ITEM_RULES`] table, where the first matching rule wins.
//!
//! The parser is total: any input produces a (possibly empty) section list.

use super::patterns::{
    strip_timestamp_tokens, HEADING_SECTION, INTRO_MARKER, MAIN_SECTION, SUBSECTION, TITLE_LINE,
};
use crate::models::{ParsedSection, SectionItem, SectionItemType};
use crate::utils::trim_quote_glyphs;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// One entry of the item classification table
pub struct ItemRule {
    pub item_type: SectionItemType,
    pattern: Regex,
    build: fn(&Captures<'_>) -> SectionItem,
}

impl ItemRule {
    fn new(
        item_type: SectionItemType,
        pattern: &str,
        build: fn(&Captures<'_>) -> SectionItem,
    ) -> Self {
        Self {
            item_type,
            pattern: Regex::new(pattern).unwrap(),
            build,
        }
    }

    /// Classify `line` if this rule matches it
    pub fn apply(&self, line: &str) -> Option<SectionItem> {
        self.pattern.captures(line).map(|caps| (self.build)(&caps))
    }
}

fn group<'h>(caps: &Captures<'h>, index: usize) -> &'h str {
    caps.get(index).map_or("", |m| m.as_str().trim())
}

/// Item classification rules in precedence order
///
/// Lines matching none of these become `text`.
pub static ITEM_RULES: LazyLock<Vec<ItemRule>> = LazyLock::new(|| {
    vec![
        ItemRule::new(SectionItemType::Heading, r"^#{4,}\s*(.*)$", |caps| {
            SectionItem::new(SectionItemType::Heading, group(caps, 1))
        }),
        // Highlight markers win over bullets: `- 💡 tip` is a highlight box
        ItemRule::new(
            SectionItemType::HighlightBox,
            r"^(?:[-*]\s+)?(?:\*\*)?(?:(💡|📌|⚠\x{FE0F}?)|((?i:tip|note)|팁)(?:\*\*)?\s*[:：])(?:\*\*)?\s*(.*)$",
            |caps| {
                let marker = match caps.get(1) {
                    Some(emoji) => emoji.as_str().to_string(),
                    None => format!("{}:", group(caps, 2)),
                };
                SectionItem::new(SectionItemType::HighlightBox, group(caps, 3)).with_marker(marker)
            },
        ),
        ItemRule::new(SectionItemType::AlphaList, r"^([a-z])[.)]\s+(.+)$", |caps| {
            SectionItem::new(SectionItemType::AlphaList, group(caps, 2)).with_marker(group(caps, 1))
        }),
        // Single-letter `i.`, `v.`, `x.` are already taken by the alpha rule
        ItemRule::new(
            SectionItemType::RomanList,
            r"^(viii|vii|iii|ii|iv|vi|ix|i|v|x)\.\s+(.+)$",
            |caps| {
                SectionItem::new(SectionItemType::RomanList, group(caps, 2))
                    .with_marker(group(caps, 1))
            },
        ),
        ItemRule::new(
            SectionItemType::TimestampItem,
            r"^[-*]\s+\[(\d{1,2}:\d{2}(?::\d{2})?)\]\s*(.*)$",
            |caps| {
                SectionItem::new(SectionItemType::TimestampItem, group(caps, 2))
                    .with_timestamp(group(caps, 1))
            },
        ),
        ItemRule::new(SectionItemType::Bullet, r"^[-*]\s+(.+)$", |caps| {
            SectionItem::new(SectionItemType::Bullet, group(caps, 1))
        }),
        ItemRule::new(SectionItemType::Quote, r"^>+\s*(.*)$", |caps| {
            SectionItem::new(SectionItemType::Quote, trim_quote_glyphs(group(caps, 1)))
        }),
    ]
});

/// Classify a body line with the first matching rule, falling back to `text`
pub fn classify_item(line: &str) -> SectionItem {
    ITEM_RULES
        .iter()
        .find_map(|rule| rule.apply(line))
        .unwrap_or_else(|| SectionItem::new(SectionItemType::Text, line))
}

/// Structural role of a trimmed line
#[derive(Debug, PartialEq)]
enum LineKind<'a> {
    Skip,
    MainSection { number: &'a str, title: &'a str },
    Subsection { number: &'a str, title: &'a str },
    HeadingSection { number: Option<&'a str>, title: String },
    Body(&'a str),
}

fn classify_line(line: &str) -> LineKind<'_> {
    if line.is_empty() || TITLE_LINE.is_match(line) || INTRO_MARKER.is_match(line) {
        return LineKind::Skip;
    }

    if let Some(caps) = MAIN_SECTION.captures(line) {
        return LineKind::MainSection {
            number: caps.get(1).map_or("", |m| m.as_str()),
            title: caps.get(2).map_or("", |m| m.as_str().trim()),
        };
    }

    if let Some(caps) = SUBSECTION.captures(line) {
        return LineKind::Subsection {
            number: caps.get(1).map_or("", |m| m.as_str()),
            title: caps.get(2).map_or("", |m| m.as_str().trim()),
        };
    }

    if let Some(caps) = HEADING_SECTION.captures(line) {
        let heading = caps.get(1).map_or("", |m| m.as_str());
        // `## 3. Title` keeps its explicit number
        return match MAIN_SECTION.captures(heading) {
            Some(numbered) => LineKind::HeadingSection {
                number: numbered.get(1).map(|m| m.as_str()),
                title: strip_timestamp_tokens(numbered.get(2).map_or("", |m| m.as_str())),
            },
            None => LineKind::HeadingSection {
                number: None,
                title: strip_timestamp_tokens(heading),
            },
        };
    }

    LineKind::Body(line)
}

/// Accumulator threaded through the fold
#[derive(Default)]
struct ParseState {
    sections: Vec<ParsedSection>,
    current: Option<ParsedSection>,
}

impl ParseState {
    fn step(mut self, raw: &str) -> Self {
        match classify_line(raw.trim()) {
            LineKind::Skip => {}
            LineKind::MainSection { number, title } => {
                self.open(ParsedSection::new(number, title));
            }
            LineKind::HeadingSection { number, title } => {
                self.flush();
                let number = number
                    .map(str::to_string)
                    .unwrap_or_else(|| (self.sections.len() + 1).to_string());
                self.open(ParsedSection::new(number, title));
            }
            LineKind::Subsection { number, title } => match self.current.as_mut() {
                Some(section) => section.items.push(
                    SectionItem::new(SectionItemType::Subsection, title).with_marker(number),
                ),
                None => tracing::trace!("Dropping subsection {} before first section", number),
            },
            LineKind::Body(line) => {
                // Lines before the first section are intro noise
                if let Some(section) = self.current.as_mut() {
                    let item = classify_item(line);
                    if item.item_type == SectionItemType::Text && section.items.is_empty() {
                        append_description(section, &item.content);
                    } else {
                        section.items.push(item);
                    }
                }
            }
        }
        self
    }

    fn open(&mut self, section: ParsedSection) {
        self.flush();
        self.current = Some(section);
    }

    fn flush(&mut self) {
        if let Some(section) = self.current.take() {
            self.sections.push(section);
        }
    }

    fn finish(mut self) -> Vec<ParsedSection> {
        self.flush();
        self.sections
    }
}

fn append_description(section: &mut ParsedSection, text: &str) {
    match section.description.as_mut() {
        Some(description) => {
            description.push(' ');
            description.push_str(text);
        }
        None => section.description = Some(text.to_string()),
    }
}

/// Parse summary Markdown into ordered sections
///
/// Never fails: unrecognized lines inside a section become `text` items (or
/// description), and lines before the first section are dropped.
///
/// ```
/// use summanote_core::parsing::parse_sections;
///
/// let sections = parse_sections("# Title\n1. 개요\n- 핵심 내용");
/// assert_eq!(sections.len(), 1);
/// assert_eq!(sections[0].title, "개요");
/// assert_eq!(sections[0].items[0].content, "핵심 내용");
/// ```
pub fn parse_sections(markdown: &str) -> Vec<ParsedSection> {
    let sections = markdown
        .lines()
        .fold(ParseState::default(), ParseState::step)
        .finish();
    tracing::debug!("Parsed {} sections", sections.len());
    sections
}

#[cfg(test)]
#[path = "sections_test.rs"]
mod sections_test;
