use crate::config::ExtractionLimits;
use crate::models::{anchor_id_for, TocEntry};
use crate::utils::strip_inline_markdown;
use regex::Regex;
use std::sync::LazyLock;

static TOC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?\.?)\s+(.+)$").unwrap());

/// Table of contents from numbered lines, with the default limits
pub fn extract_toc(markdown: &str) -> Vec<TocEntry> {
    extract_toc_with(markdown, &ExtractionLimits::default())
}

/// Table of contents from `N.` and `N.M` lines
///
/// Titles starting with `**` or longer than `max_toc_title_chars` are
/// rejected; these are usually bold list items, not headings.
pub fn extract_toc_with(markdown: &str, limits: &ExtractionLimits) -> Vec<TocEntry> {
    markdown
        .lines()
        .filter_map(|line| TOC_LINE.captures(line.trim()))
        .filter_map(|caps| {
            let number = caps.get(1)?.as_str().trim_end_matches('.');
            let title = caps.get(2)?.as_str().trim();

            if title.starts_with("**") || title.chars().count() > limits.max_toc_title_chars {
                return None;
            }

            Some(TocEntry {
                level: if number.contains('.') { 2 } else { 1 },
                number: number.to_string(),
                title: strip_inline_markdown(title),
                id: anchor_id_for(number),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toc_levels_and_ids() {
        let toc = extract_toc("# 제목\n1. 개요\n1.1 세부\n2. 결론\n- 불릿");

        assert_eq!(toc.len(), 3);
        assert_eq!(
            toc[0],
            TocEntry {
                level: 1,
                number: "1".to_string(),
                title: "개요".to_string(),
                id: "section-1".to_string(),
            }
        );
        assert_eq!(toc[1].level, 2);
        assert_eq!(toc[1].id, "section-1-1");
        assert_eq!(toc[2].number, "2");
    }

    #[test]
    fn test_toc_rejects_bold_and_long_titles() {
        let long_title = "가".repeat(101);
        let markdown = format!("1. **굵은 항목**: 설명\n2. {}\n3. 정상", long_title);
        let toc = extract_toc(&markdown);

        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "정상");
    }

    #[test]
    fn test_toc_ids_match_parsed_sections() {
        let markdown = "1. 개요\n2. 본론";
        let toc = extract_toc(markdown);
        let sections = crate::parsing::parse_sections(markdown);

        for (entry, section) in toc.iter().zip(&sections) {
            assert_eq!(entry.id, section.anchor_id());
        }
    }

    #[test]
    fn test_toc_custom_limit() {
        let limits = ExtractionLimits {
            max_toc_title_chars: 3,
            ..Default::default()
        };
        assert!(extract_toc_with("1. 네 글자다", &limits).is_empty());
    }
}
