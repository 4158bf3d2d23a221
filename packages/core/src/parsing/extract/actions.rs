use crate::config::ExtractionLimits;
use crate::models::{ActionItem, Priority};
use crate::utils::strip_inline_markdown;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `TODO: ...`, `할 일: ...`, `액션: ...`, optionally bulleted or bold
static EXPLICIT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-*]\s+)?(?:\*\*)?(?i:todo|to-do|action item|action|할\s?일|액션)(?:\*\*)?\s*[:：](?:\*\*)?\s*(.+)$",
    )
    .unwrap()
});

/// Unchecked Markdown task `- [ ] ...`
static UNCHECKED_TASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+\[ \]\s+(.+)$").unwrap());

/// `~word~를 해야` strike-marker phrasing
static STRIKE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~[^~]+~\s*[을를]\s*해야").unwrap());

/// `...을/를 해야 / 하세요 / 합니다`
static IMPERATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[을를]\s*\S*?(?:해야|하세요|하십시오|합니다)").unwrap()
});

static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)$").unwrap());

static LEADING_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*]\s+|\d+\.\s+|>\s*)").unwrap());

static HIGH_PRIORITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)긴급|즉시|반드시|당장|중요|urgent|asap|immediately|critical|important|must")
        .unwrap()
});

static LOW_PRIORITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)나중에|여유|선택|가능하면|천천히|언젠가|later|optional|eventually|someday")
        .unwrap()
});

static ACTION_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)해\s?보|하기|시도|실천|확인|적용|정리|작성|준비|검토|시작|연습|\b(?:try|start|review|check|apply|practice|write|plan|schedule)\b",
    )
    .unwrap()
});

/// Priority from urgency / deferral keywords; urgency wins
pub fn classify_priority(content: &str) -> Priority {
    if HIGH_PRIORITY.is_match(content) {
        Priority::High
    } else if LOW_PRIORITY.is_match(content) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Action items with the default limits
pub fn extract_action_items(markdown: &str) -> Vec<ActionItem> {
    extract_action_items_with(markdown, &ExtractionLimits::default())
}

/// Collect action items in three passes
///
/// 1. Explicit markers (`TODO:`, `할 일:`, `액션:`, unchecked tasks)
/// 2. `~word~를 해야` phrasing
/// 3. Korean imperative endings (`을/를 해야`, `하세요`, `합니다`)
///
/// When none of the passes match, the first bullets containing an action verb
/// are used instead. Headings are never candidates.
pub fn extract_action_items_with(markdown: &str, limits: &ExtractionLimits) -> Vec<ActionItem> {
    let lines: Vec<&str> = markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let mut candidates: Vec<String> = Vec::new();
    // A line feeds at most one pass
    let mut taken = vec![false; lines.len()];

    for (i, line) in lines.iter().enumerate() {
        if let Some(caps) = EXPLICIT_MARKER
            .captures(line)
            .or_else(|| UNCHECKED_TASK.captures(line))
        {
            candidates.push(clean_action(caps.get(1).map_or("", |m| m.as_str())));
            taken[i] = true;
        }
    }

    for pattern in [&*STRIKE_MARKER, &*IMPERATIVE] {
        for (i, line) in lines.iter().enumerate() {
            if !taken[i] && pattern.is_match(line) {
                candidates.push(clean_action(line));
                taken[i] = true;
            }
        }
    }

    candidates.retain(|c| !c.is_empty());

    if candidates.is_empty() {
        candidates = lines
            .iter()
            .filter_map(|line| BULLET.captures(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(|content| ACTION_VERB.is_match(content))
            .take(limits.max_fallback_actions)
            .map(clean_action)
            .collect();
        tracing::trace!("No action patterns matched, {} fallback bullets", candidates.len());
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|content| seen.insert(content.clone()))
        .take(limits.max_action_items)
        .map(|content| ActionItem {
            priority: classify_priority(&content),
            content,
        })
        .collect()
}

/// Drop list markup and strike markers, keep the words
fn clean_action(text: &str) -> String {
    let text = LEADING_MARKUP.replace(text.trim(), "");
    strip_inline_markdown(&text).replace('~', "")
}
