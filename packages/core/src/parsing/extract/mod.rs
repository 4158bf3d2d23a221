//! Structural extraction helpers
//!
//! Each helper is an independent, best-effort scan over the raw Markdown. None
//! of them depends on [`parse_sections`](crate::parsing::parse_sections)
//! output, and none of them fails on malformed input.

mod actions;
mod intro;
mod quotes;
mod terms;
mod toc;

pub use actions::{classify_priority, extract_action_items, extract_action_items_with};
pub use intro::extract_intro;
pub use quotes::{extract_quotes, extract_quotes_with};
pub use terms::{extract_terms, extract_terms_with};
pub use toc::{extract_toc, extract_toc_with};

use crate::config::ExtractionLimits;
use crate::models::{ActionItem, ExtractedQuote, GlossaryTerm, TocEntry};
use serde::{Deserialize, Serialize};

/// Every extraction result for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryExtraction {
    pub intro: String,
    pub toc: Vec<TocEntry>,
    pub quotes: Vec<ExtractedQuote>,
    pub action_items: Vec<ActionItem>,
    pub terms: Vec<GlossaryTerm>,
}

impl SummaryExtraction {
    pub fn from_markdown(markdown: &str, limits: &ExtractionLimits) -> Self {
        Self {
            intro: extract_intro(markdown),
            toc: extract_toc_with(markdown, limits),
            quotes: extract_quotes_with(markdown, limits),
            action_items: extract_action_items_with(markdown, limits),
            terms: extract_terms_with(markdown, limits),
        }
    }
}
