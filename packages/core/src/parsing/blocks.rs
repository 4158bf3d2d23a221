//! Markdown ↔ Block conversion
//!
//! The converter maps one Markdown line to one block. It is deliberately
//! simpler than the section parser: there is no hierarchy, only a flat list
//! of drafts with sequential positions. Rendering a block list back to
//! Markdown and converting again yields an equivalent block sequence.
//!
//! Line mapping:
//!
//! | Markdown                  | Block type     | Properties            |
//! |---------------------------|----------------|-----------------------|
//! | `# ` / `## ` / `### `+    | `heading1..3`  |                       |
//! | `- [ ] x` / `- [x] x`     | `todo`         | `checked`             |
//! | `- [HH:MM] x`             | `bulletItem`   | `timestamp`           |
//! | `- x` / `* x` / `+ x`     | `bulletItem`   |                       |
//! | `3. x`                    | `numberedItem` | `number`              |
//! | `> x`                     | `quote`        |                       |
//! | ```` ```lang ```` fence   | `code`         | `language`            |
//! | `![alt](url)`             | `image`        | `url`                 |
//! | `---`                     | `divider`      |                       |
//! | anything else             | `text`         |                       |

use crate::models::{Block, BlockDraft, BlockType};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static TODO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+]\s+\[([ xX])\]\s+(.*)$").unwrap());
static TIMESTAMP_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*+]\s+\[(\d{1,2}:\d{2}(?::\d{2})?)\]\s*(.*)$").unwrap()
});
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+(.*)$").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s?(.*)$").unwrap());
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)\s]+)\)$").unwrap());
static DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").unwrap());
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```\s*(\S*)\s*$").unwrap());

/// Convert one non-fence line
fn convert_line(line: &str) -> BlockDraft {
    let draft = |block_type, content: &str| BlockDraft::new(block_type, content.trim(), 0);

    if DIVIDER.is_match(line) {
        return draft(BlockType::Divider, "");
    }
    if let Some(caps) = HEADING.captures(line) {
        let block_type = match caps[1].len() {
            1 => BlockType::Heading1,
            2 => BlockType::Heading2,
            _ => BlockType::Heading3,
        };
        return draft(block_type, &caps[2]);
    }
    if let Some(caps) = TODO.captures(line) {
        return draft(BlockType::Todo, &caps[2])
            .with_property("checked", Value::Bool(!caps[1].trim().is_empty()));
    }
    if let Some(caps) = TIMESTAMP_BULLET.captures(line) {
        return draft(BlockType::BulletItem, &caps[2])
            .with_property("timestamp", Value::String(caps[1].to_string()));
    }
    if let Some(caps) = BULLET.captures(line) {
        return draft(BlockType::BulletItem, &caps[1]);
    }
    if let Some(caps) = NUMBERED.captures(line) {
        return draft(BlockType::NumberedItem, &caps[2])
            .with_property("number", Value::String(caps[1].to_string()));
    }
    if let Some(caps) = QUOTE.captures(line) {
        return draft(BlockType::Quote, &caps[1]);
    }
    if let Some(caps) = IMAGE.captures(line) {
        return draft(BlockType::Image, &caps[1])
            .with_property("url", Value::String(caps[2].to_string()));
    }
    draft(BlockType::Text, line)
}

/// Convert Markdown to a flat list of block drafts
///
/// Blank lines are skipped; positions are sequential from 0. An unclosed code
/// fence runs to the end of input.
pub fn markdown_to_blocks(markdown: &str) -> Vec<BlockDraft> {
    let mut drafts = Vec::new();
    let mut fence: Option<(String, Vec<&str>)> = None;

    for raw in markdown.lines() {
        if let Some((language, body)) = fence.as_mut() {
            if raw.trim() == "```" {
                drafts.push(code_draft(language, body));
                fence = None;
            } else {
                body.push(raw);
            }
            continue;
        }

        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = FENCE.captures(line) {
            fence = Some((caps[1].to_string(), Vec::new()));
            continue;
        }
        drafts.push(convert_line(line));
    }

    if let Some((language, body)) = fence {
        tracing::debug!("Unclosed code fence, treating rest of input as code");
        drafts.push(code_draft(&language, &body));
    }

    for (position, draft) in drafts.iter_mut().enumerate() {
        draft.position = position;
    }
    drafts
}

fn code_draft(language: &str, body: &[&str]) -> BlockDraft {
    let draft = BlockDraft::new(BlockType::Code, body.join("\n"), 0);
    if language.is_empty() {
        draft
    } else {
        draft.with_property("language", json!(language))
    }
}

/// Convert Markdown straight into blocks owned by `document_id`
pub fn blocks_from_markdown(document_id: &str, markdown: &str, now: DateTime<Utc>) -> Vec<Block> {
    markdown_to_blocks(markdown)
        .into_iter()
        .map(|draft| draft.into_block(document_id, now))
        .collect()
}

/// Render one block as Markdown
pub fn render_block(block_type: BlockType, content: &str, properties: &Value) -> String {
    let prop = |key: &str| properties.get(key).and_then(Value::as_str);

    match block_type {
        BlockType::Text => content.to_string(),
        BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => {
            let level = block_type.heading_level().unwrap_or(1);
            format!("{} {}", "#".repeat(level), content)
        }
        BlockType::BulletItem => match prop("timestamp") {
            Some(timestamp) => format!("- [{}] {}", timestamp, content),
            None => format!("- {}", content),
        },
        BlockType::NumberedItem => format!("{}. {}", prop("number").unwrap_or("1"), content),
        BlockType::Todo => {
            let checked = properties
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            format!("- [{}] {}", if checked { "x" } else { " " }, content)
        }
        BlockType::Quote => prefix_lines("> ", content),
        BlockType::Callout => prefix_lines("> 💡 ", content),
        BlockType::Code => format!("```{}\n{}\n```", prop("language").unwrap_or(""), content),
        BlockType::Timestamp => match prop("timestamp") {
            Some(timestamp) => format!("[{}] {}", timestamp, content),
            None => content.to_string(),
        },
        BlockType::Image => format!("![{}]({})", content, prop("url").unwrap_or("")),
        BlockType::Divider => "---".to_string(),
    }
}

/// Prefix every line; empty content still renders the bare marker so the
/// block survives reconversion
fn prefix_lines(prefix: &str, content: &str) -> String {
    if content.is_empty() {
        return prefix.trim_end().to_string();
    }
    content
        .lines()
        .map(|line| format!("{}{}", prefix, line).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render blocks back to Markdown, one block per line group
pub fn blocks_to_markdown(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| render_block(b.block_type, &b.content, &b.properties))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(drafts: &[BlockDraft]) -> Vec<(BlockType, String, Value)> {
        drafts
            .iter()
            .map(|d| (d.block_type, d.content.clone(), d.properties.clone()))
            .collect()
    }

    const SAMPLE: &str = "# 습관의 힘\n\n\
                          오늘은 습관에 대해 이야기합니다.\n\
                          ## 1. 핵심 개념\n\
                          - 신호와 보상\n\
                          * [01:23] 타임스탬프 포인트\n\
                          - [ ] 할 일\n\
                          - [x] 끝난 일\n\
                          2. 두 번째\n\
                          > 작은 습관이 큰 변화를 만든다\n\
                          ```rust\n\
                          fn main() {}\n\
                          ```\n\
                          ---\n\
                          ![도표](https://example.com/chart.png)\n\
                          #### 깊은 제목";

    #[test]
    fn test_line_mapping() {
        let drafts = markdown_to_blocks(SAMPLE);
        let types: Vec<_> = drafts.iter().map(|d| d.block_type).collect();

        assert_eq!(
            types,
            vec![
                BlockType::Heading1,
                BlockType::Text,
                BlockType::Heading2,
                BlockType::BulletItem,
                BlockType::BulletItem,
                BlockType::Todo,
                BlockType::Todo,
                BlockType::NumberedItem,
                BlockType::Quote,
                BlockType::Code,
                BlockType::Divider,
                BlockType::Image,
                BlockType::Heading3,
            ]
        );
        assert_eq!(drafts[4].content, "타임스탬프 포인트");
        assert_eq!(drafts[4].properties["timestamp"], "01:23");
        assert_eq!(drafts[5].properties["checked"], false);
        assert_eq!(drafts[6].properties["checked"], true);
        assert_eq!(drafts[9].content, "fn main() {}");
        assert_eq!(drafts[9].properties["language"], "rust");
        assert_eq!(drafts[11].properties["url"], "https://example.com/chart.png");
    }

    #[test]
    fn test_positions_are_sequential() {
        let drafts = markdown_to_blocks(SAMPLE);
        let positions: Vec<_> = drafts.iter().map(|d| d.position).collect();
        assert_eq!(positions, (0..drafts.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_render_and_reconvert_is_equivalent() {
        let blocks = blocks_from_markdown("doc", SAMPLE, Utc::now());
        let rendered = blocks_to_markdown(&blocks);

        assert_eq!(
            shape(&markdown_to_blocks(&rendered)),
            shape(&markdown_to_blocks(SAMPLE))
        );
    }

    #[test]
    fn test_empty_quote_line_survives_reconversion() {
        let markdown = "> 첫 문단\n>\n> 둘째 문단";
        let blocks = blocks_from_markdown("doc", markdown, Utc::now());
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].block_type, BlockType::Quote);
        assert_eq!(blocks[1].content, "");

        let rendered = blocks_to_markdown(&blocks);
        assert_eq!(rendered, markdown);
        assert_eq!(
            shape(&markdown_to_blocks(&rendered)),
            shape(&markdown_to_blocks(markdown))
        );
    }

    #[test]
    fn test_non_structural_text_is_preserved() {
        let markdown = "첫 문장입니다.\n- 불릿 **강조** 포함\n> 인용 `코드`";
        let contents: String = markdown_to_blocks(markdown)
            .iter()
            .map(|d| d.content.as_str())
            .collect();

        assert_eq!(contents, "첫 문장입니다.불릿 **강조** 포함인용 `코드`");
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let drafts = markdown_to_blocks("```\nline 1\n\nline 2");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].block_type, BlockType::Code);
        assert_eq!(drafts[0].content, "line 1\n\nline 2");
        assert!(drafts[0].properties.get("language").is_none());
    }

    #[test]
    fn test_blocks_from_markdown_binds_document() {
        let blocks = blocks_from_markdown("doc-9", "a\nb", Utc::now());
        assert!(blocks.iter().all(|b| b.document_id == "doc-9"));
        assert_eq!(blocks[1].position, 1);
        assert_ne!(blocks[0].id, blocks[1].id);
    }

    #[test]
    fn test_empty_input() {
        assert!(markdown_to_blocks("").is_empty());
        assert!(markdown_to_blocks("\n  \n").is_empty());
    }
}
