use crate::config::ExtractionLimits;
use crate::models::GlossaryTerm;
use crate::parsing::patterns::MAIN_SECTION;
use crate::utils::strip_inline_markdown;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `**Term**: explanation` or `**Term:** explanation`, optionally bulleted
static BOLD_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*]\s+)?\*\*([^*]+?)(?:\*\*\s*[:：]|[:：]\s*\*\*)\s*(.+)$").unwrap()
});

/// `#### Term: explanation`
static HEADING_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{4,}\s*([^:：]+?)\s*[:：]\s*(.+)$").unwrap());

/// `- Term: explanation` or `- Term - explanation` inside a concept section
static CONCEPT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*]\s+(?:\*\*)?([^*:：\[\]]+?)(?:\*\*)?\s*(?:[:：]|\s[-–—]\s)\s*(.+)$").unwrap()
});

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,3}\s+").unwrap());

static CONCEPT_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)핵심\s*개념|배경\s*지식|key\s+concepts?|background").unwrap()
});

/// Labels that look like terms but introduce other content
static LABEL_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:insight|인사이트|tip|팁|note|todo|할\s?일|액션|요약|summary)$").unwrap()
});

/// Glossary terms with the default limits
pub fn extract_terms(markdown: &str) -> Vec<GlossaryTerm> {
    extract_terms_with(markdown, &ExtractionLimits::default())
}

/// Collect term/explanation pairs
///
/// Bold and `####` definitions are taken from anywhere in the document;
/// plain `- Term: explanation` bullets only inside a 핵심 개념 / 배경 지식
/// section. Terms of `max_term_chars` or more and explanations shorter than
/// `min_explanation_chars` are rejected.
pub fn extract_terms_with(markdown: &str, limits: &ExtractionLimits) -> Vec<GlossaryTerm> {
    let mut candidates = Vec::new();
    let mut in_concepts = false;

    for line in markdown.lines().map(str::trim) {
        if SECTION_HEADER.is_match(line) || MAIN_SECTION.is_match(line) {
            in_concepts = CONCEPT_SECTION.is_match(line);
            continue;
        }

        let caps = BOLD_TERM
            .captures(line)
            .or_else(|| HEADING_TERM.captures(line))
            .or_else(|| {
                in_concepts
                    .then(|| CONCEPT_ENTRY.captures(line))
                    .flatten()
            });

        if let Some(caps) = caps {
            let term = strip_inline_markdown(caps.get(1).map_or("", |m| m.as_str()));
            let explanation = strip_inline_markdown(caps.get(2).map_or("", |m| m.as_str()));
            candidates.push(GlossaryTerm { term, explanation });
        }
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            !c.term.is_empty()
                && !LABEL_TERM.is_match(&c.term)
                && c.term.chars().count() < limits.max_term_chars
                && c.explanation.chars().count() >= limits.min_explanation_chars
        })
        .filter(|c| seen.insert(c.term.clone()))
        .take(limits.max_terms)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_EXPLANATION: &str = "충분히 길게 작성된 설명 문장으로 스무 글자를 넘깁니다";

    #[test]
    fn test_bold_and_heading_terms() {
        let markdown = format!(
            "**복리 효과**: {e}\n- **습관 루프:** {e}\n#### 정체성 기반 습관: {e}",
            e = LONG_EXPLANATION
        );
        let terms = extract_terms(&markdown);

        let names: Vec<_> = terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["복리 효과", "습관 루프", "정체성 기반 습관"]);
        assert_eq!(terms[0].explanation, LONG_EXPLANATION);
    }

    #[test]
    fn test_concept_section_bullets() {
        let markdown = format!(
            "## 핵심 개념\n- 도파민: {e}\n- 보상 예측 - {e}\n## 다른 섹션\n- 무시됨: {e}",
            e = LONG_EXPLANATION
        );
        let terms = extract_terms(&markdown);

        let names: Vec<_> = terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["도파민", "보상 예측"]);
    }

    #[test]
    fn test_quality_filters() {
        let long_term = "용".repeat(50);
        let markdown = format!(
            "**짧은 설명**: 너무 짧음\n**{t}**: {e}\n**인사이트**: {e}\n**좋은 용어**: {e}",
            t = long_term,
            e = LONG_EXPLANATION
        );
        let terms = extract_terms(&markdown);

        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].term, "좋은 용어");
    }

    #[test]
    fn test_cap_and_dedupe_by_term() {
        let mut markdown = format!("**반복**: {e}\n**반복**: 다른 설명이지만 같은 용어라서 제외됩니다\n", e = LONG_EXPLANATION);
        for i in 0..10 {
            markdown.push_str(&format!("**용어 {}**: {}\n", i, LONG_EXPLANATION));
        }
        let terms = extract_terms(&markdown);

        assert_eq!(terms.len(), 8);
        assert_eq!(terms[0].explanation, LONG_EXPLANATION);
        assert_eq!(terms[1].term, "용어 0");
    }
}
