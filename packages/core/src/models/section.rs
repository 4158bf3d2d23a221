//! Read-only view models derived from summary Markdown
//!
//! `ParsedSection` and `TocEntry` are recomputed from the Markdown string on
//! every read. They are never mutated or persisted.

use serde::{Deserialize, Serialize};

/// Classification of one line inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionItemType {
    Heading,
    Bullet,
    Quote,
    Text,
    TimestampItem,
    AlphaList,
    RomanList,
    HighlightBox,
    Subsection,
}

impl SectionItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionItemType::Heading => "heading",
            SectionItemType::Bullet => "bullet",
            SectionItemType::Quote => "quote",
            SectionItemType::Text => "text",
            SectionItemType::TimestampItem => "timestamp-item",
            SectionItemType::AlphaList => "alpha-list",
            SectionItemType::RomanList => "roman-list",
            SectionItemType::HighlightBox => "highlight-box",
            SectionItemType::Subsection => "subsection",
        }
    }
}

/// One classified item of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItem {
    #[serde(rename = "type")]
    pub item_type: SectionItemType,

    pub content: String,

    /// List marker or subsection number (`"a"`, `"ii"`, `"1.1"`, `"💡"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    /// `HH:MM` or `HH:MM:SS` for timestamp items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl SectionItem {
    pub fn new(item_type: SectionItemType, content: impl Into<String>) -> Self {
        Self {
            item_type,
            content: content.into(),
            marker: None,
            timestamp: None,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// A top-level section of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSection {
    /// Section ordinal as a dotted string (`"1"`, `"2"`)
    pub number: String,

    pub title: String,

    /// Intro prose between the header and the first item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub items: Vec<SectionItem>,
}

impl ParsedSection {
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            description: None,
            items: Vec::new(),
        }
    }

    /// Anchor id shared with the matching [`TocEntry::id`]
    pub fn anchor_id(&self) -> String {
        anchor_id_for(&self.number)
    }
}

/// Navigation entry derived from numbered lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// 1 for `N.` entries, 2 for `N.M` entries
    pub level: u8,
    pub number: String,
    pub title: String,
    pub id: String,
}

/// `"1.2"` -> `"section-1-2"`
pub fn anchor_id_for(number: &str) -> String {
    format!("section-{}", number.trim_end_matches('.').replace('.', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_serializes_kebab_case() {
        let item = SectionItem::new(SectionItemType::TimestampItem, "point").with_timestamp("01:23");
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["type"], "timestamp-item");
        assert_eq!(value["timestamp"], "01:23");
        assert!(value.get("marker").is_none());
        assert_eq!(
            SectionItemType::HighlightBox.as_str(),
            serde_json::to_value(SectionItemType::HighlightBox).unwrap()
        );
    }

    #[test]
    fn test_anchor_ids_match_between_section_and_toc() {
        let section = ParsedSection::new("2", "Title");
        assert_eq!(section.anchor_id(), "section-2");
        assert_eq!(anchor_id_for("1.3"), "section-1-3");
        assert_eq!(anchor_id_for("4."), "section-4");
    }
}
