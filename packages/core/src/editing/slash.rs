//! Slash-command palette
//!
//! ```text
//! Idle ──open_from_block──▶ Open(ConvertInPlace) ──select──▶ Idle (retype)
//!   └───open_insert_after─▶ Open(InsertAfter)    ──select──▶ Idle (insert)
//!                           Open(_)              ──dismiss─▶ Idle
//! ```
//!
//! The palette never touches the block list itself; `select` and `dismiss`
//! return an [`EditOutcome`] for the caller to commit.

use super::operations::{BlockEditor, EditOutcome, Focus};
use crate::models::{Block, BlockType};
use serde::Serialize;

/// Placeholder content that opens the palette in place
pub const SLASH_TRIGGER: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMode {
    /// Selection retypes the anchor block
    ConvertInPlace,
    /// Selection inserts a new block after the anchor
    InsertAfter,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaletteState {
    #[default]
    Idle,
    Open {
        anchor_id: String,
        mode: PaletteMode,
        query: String,
    },
}

/// One palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlashCommand {
    pub block_type: BlockType,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

impl SlashCommand {
    /// Case-insensitive match against label, type tag and keywords
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().trim_start_matches('/').to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.label.to_lowercase().contains(&query)
            || self.block_type.as_str().to_lowercase().contains(&query)
            || self.keywords.iter().any(|k| k.contains(&query))
    }
}

pub const SLASH_COMMANDS: &[SlashCommand] = &[
    SlashCommand {
        block_type: BlockType::Text,
        label: "텍스트",
        keywords: &["text", "plain", "paragraph", "본문"],
    },
    SlashCommand {
        block_type: BlockType::Heading1,
        label: "제목 1",
        keywords: &["h1", "heading", "title", "제목"],
    },
    SlashCommand {
        block_type: BlockType::Heading2,
        label: "제목 2",
        keywords: &["h2", "heading", "subtitle", "제목"],
    },
    SlashCommand {
        block_type: BlockType::Heading3,
        label: "제목 3",
        keywords: &["h3", "heading", "제목"],
    },
    SlashCommand {
        block_type: BlockType::BulletItem,
        label: "글머리 기호 목록",
        keywords: &["bullet", "list", "ul", "목록"],
    },
    SlashCommand {
        block_type: BlockType::NumberedItem,
        label: "번호 목록",
        keywords: &["number", "list", "ol", "목록"],
    },
    SlashCommand {
        block_type: BlockType::Todo,
        label: "할 일",
        keywords: &["todo", "task", "check", "체크"],
    },
    SlashCommand {
        block_type: BlockType::Quote,
        label: "인용",
        keywords: &["quote", "blockquote", "인용문"],
    },
    SlashCommand {
        block_type: BlockType::Callout,
        label: "콜아웃",
        keywords: &["callout", "tip", "note", "강조"],
    },
    SlashCommand {
        block_type: BlockType::Code,
        label: "코드",
        keywords: &["code", "snippet", "```"],
    },
    SlashCommand {
        block_type: BlockType::Timestamp,
        label: "타임스탬프",
        keywords: &["timestamp", "time", "시간"],
    },
    SlashCommand {
        block_type: BlockType::Image,
        label: "이미지",
        keywords: &["image", "picture", "img", "사진"],
    },
    SlashCommand {
        block_type: BlockType::Divider,
        label: "구분선",
        keywords: &["divider", "separator", "hr", "---"],
    },
];

/// Catalog entries matching `query`, in catalog order
pub fn filter_commands(query: &str) -> Vec<&'static SlashCommand> {
    SLASH_COMMANDS.iter().filter(|c| c.matches(query)).collect()
}

#[derive(Debug, Default)]
pub struct SlashCommandPalette {
    state: PaletteState,
}

impl SlashCommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PaletteState::Open { .. })
    }

    /// Open in convert-in-place mode from inside `block`
    ///
    /// Only a block whose content is empty or exactly `/` can open the
    /// palette this way. Returns whether the palette opened.
    pub fn open_from_block(&mut self, block: &Block) -> bool {
        if !(block.content.is_empty() || block.content == SLASH_TRIGGER) {
            return false;
        }
        self.state = PaletteState::Open {
            anchor_id: block.id.clone(),
            mode: PaletteMode::ConvertInPlace,
            query: String::new(),
        };
        true
    }

    /// Open from an explicit insert affordance next to `anchor_id`
    pub fn open_insert_after(&mut self, anchor_id: impl Into<String>) {
        self.state = PaletteState::Open {
            anchor_id: anchor_id.into(),
            mode: PaletteMode::InsertAfter,
            query: String::new(),
        };
    }

    /// Update the filter text; ignored while idle
    pub fn set_query(&mut self, text: impl Into<String>) {
        if let PaletteState::Open { query, .. } = &mut self.state {
            *query = text.into();
        }
    }

    /// Commands matching the current query; empty while idle
    pub fn filtered_commands(&self) -> Vec<&'static SlashCommand> {
        match &self.state {
            PaletteState::Open { query, .. } => filter_commands(query),
            PaletteState::Idle => Vec::new(),
        }
    }

    /// Apply a selection and return to idle
    ///
    /// In convert mode the anchor is retyped and a `/` placeholder cleared;
    /// in insert mode a new empty block of `block_type` follows the anchor.
    pub fn select(
        &mut self,
        block_type: BlockType,
        blocks: &[Block],
        editor: &BlockEditor,
    ) -> EditOutcome {
        let PaletteState::Open {
            anchor_id, mode, ..
        } = std::mem::take(&mut self.state)
        else {
            return EditOutcome::Unchanged;
        };

        match mode {
            PaletteMode::InsertAfter => {
                editor.insert_block_after(blocks, Some(&anchor_id), block_type, "")
            }
            PaletteMode::ConvertInPlace => {
                let retyped = editor.retype(blocks, &anchor_id, block_type);
                let current = retyped.blocks().unwrap_or(blocks);
                let has_placeholder = current
                    .iter()
                    .any(|b| b.id == anchor_id && b.content.starts_with(SLASH_TRIGGER));
                let outcome = if has_placeholder {
                    match editor.update_content(current, &anchor_id, "") {
                        EditOutcome::Unchanged => retyped,
                        cleared => cleared,
                    }
                } else {
                    retyped
                };
                with_focus(outcome, Focus::new(anchor_id, 0))
            }
        }
    }

    /// Close without selecting
    ///
    /// A `/` placeholder left in the anchor block is cleared.
    pub fn dismiss(&mut self, blocks: &[Block], editor: &BlockEditor) -> EditOutcome {
        match std::mem::take(&mut self.state) {
            PaletteState::Open {
                anchor_id,
                mode: PaletteMode::ConvertInPlace,
                ..
            } => {
                let is_placeholder = blocks
                    .iter()
                    .any(|b| b.id == anchor_id && b.content == SLASH_TRIGGER);
                if is_placeholder {
                    editor.update_content(blocks, &anchor_id, "")
                } else {
                    EditOutcome::Unchanged
                }
            }
            _ => EditOutcome::Unchanged,
        }
    }
}

fn with_focus(outcome: EditOutcome, focus: Focus) -> EditOutcome {
    match outcome {
        EditOutcome::Changed { blocks, .. } => EditOutcome::Changed {
            blocks,
            focus: Some(focus),
        },
        EditOutcome::Unchanged => EditOutcome::Unchanged,
    }
}
