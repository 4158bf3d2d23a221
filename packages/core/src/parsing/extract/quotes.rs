use crate::config::ExtractionLimits;
use crate::models::{ExtractedQuote, QuoteSource};
use crate::parsing::patterns::{strip_timestamp_tokens, TIMESTAMP_TOKEN};
use crate::utils::{strip_inline_markdown, trim_quote_glyphs};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static BLOCK_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>+[ \t]*(.+)$").unwrap());

static INLINE_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\n]+)"|“([^”\n]+)”"#).unwrap());

static INSIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\*\*(?:(?i:insight)|인사이트)\*\*[ \t]*[:：][ \t]*(.+)$").unwrap()
});

/// A timestamp token located by character offsets
struct TimestampMark {
    start: usize,
    end: usize,
    value: String,
}

/// Byte offset to character offset lookup, built once per document
struct CharOffsets(Vec<usize>);

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self(text.char_indices().map(|(byte, _)| byte).collect())
    }

    /// Number of characters before `byte`; `byte` must be a char boundary
    fn at(&self, byte: usize) -> usize {
        self.0.partition_point(|&start| start < byte)
    }
}

fn timestamp_marks(markdown: &str, offsets: &CharOffsets) -> Vec<TimestampMark> {
    TIMESTAMP_TOKEN
        .captures_iter(markdown)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(TimestampMark {
                start: offsets.at(whole.start()),
                end: offsets.at(whole.end()),
                value: caps.get(1)?.as_str().to_string(),
            })
        })
        .collect()
}

/// Closest timestamp within `window` characters of the span `[start, end)`
fn nearest_timestamp(
    marks: &[TimestampMark],
    start: usize,
    end: usize,
    window: usize,
) -> Option<String> {
    marks
        .iter()
        .map(|mark| {
            let gap = if mark.end <= start {
                start - mark.end
            } else if mark.start >= end {
                mark.start - end
            } else {
                0
            };
            (gap, mark)
        })
        .filter(|(gap, _)| *gap <= window)
        .min_by_key(|(gap, _)| *gap)
        .map(|(_, mark)| mark.value.clone())
}

/// Quotes with the default limits
pub fn extract_quotes(markdown: &str) -> Vec<ExtractedQuote> {
    extract_quotes_with(markdown, &ExtractionLimits::default())
}

/// Collect quotable lines and spans
///
/// Block quotes come first, then inline quoted spans longer than
/// `min_inline_quote_chars`, then `**Insight**:` lines. A timestamp token
/// inside a block quote is used directly; otherwise the nearest token within
/// `timestamp_window_chars` is attached.
pub fn extract_quotes_with(markdown: &str, limits: &ExtractionLimits) -> Vec<ExtractedQuote> {
    let offsets = CharOffsets::new(markdown);
    let marks = timestamp_marks(markdown, &offsets);
    let window = limits.timestamp_window_chars;
    let mut candidates = Vec::new();

    for caps in BLOCK_QUOTE.captures_iter(markdown) {
        let Some(body) = caps.get(1) else { continue };
        let own_timestamp = TIMESTAMP_TOKEN
            .captures(body.as_str())
            .and_then(|ts| ts.get(1))
            .map(|m| m.as_str().to_string());
        let text = clean_quote_text(&strip_timestamp_tokens(body.as_str()));
        let timestamp = own_timestamp.or_else(|| {
            nearest_timestamp(
                &marks,
                offsets.at(body.start()),
                offsets.at(body.end()),
                window,
            )
        });
        candidates.push((text, timestamp, QuoteSource::BlockQuote));
    }

    for caps in INLINE_QUOTE.captures_iter(markdown) {
        let Some(inner) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let text = inner.as_str().trim();
        if text.chars().count() <= limits.min_inline_quote_chars {
            continue;
        }
        let timestamp = nearest_timestamp(
            &marks,
            offsets.at(inner.start()),
            offsets.at(inner.end()),
            window,
        );
        candidates.push((clean_quote_text(text), timestamp, QuoteSource::Inline));
    }

    for caps in INSIGHT.captures_iter(markdown) {
        let Some(body) = caps.get(1) else { continue };
        let timestamp = nearest_timestamp(
            &marks,
            offsets.at(body.start()),
            offsets.at(body.end()),
            window,
        );
        let text = clean_quote_text(&strip_timestamp_tokens(body.as_str()));
        candidates.push((text, timestamp, QuoteSource::Insight));
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|(text, _, _)| !text.is_empty() && seen.insert(text.clone()))
        .take(limits.max_quotes)
        .map(|(text, timestamp, source)| ExtractedQuote {
            text,
            timestamp,
            source,
        })
        .collect()
}

fn clean_quote_text(text: &str) -> String {
    trim_quote_glyphs(&strip_inline_markdown(text)).to_string()
}
