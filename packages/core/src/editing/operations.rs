//! Pure block-list transforms
//!
//! Every operation takes the current snapshot by reference and returns an
//! [`EditOutcome`]: either `Unchanged` (unknown id, boundary move, same type)
//! or `Changed` with a fresh block list whose positions are `0..n-1`.
//! Nothing is mutated in place; the caller decides whether to commit.

use crate::models::{Block, BlockType, TimeProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cursor placement hint returned with an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    pub block_id: String,
    /// Character offset into the block's content
    pub offset: usize,
}

impl Focus {
    pub fn new(block_id: impl Into<String>, offset: usize) -> Self {
        Self {
            block_id: block_id.into(),
            offset,
        }
    }
}

/// Result of an editing operation
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// No-op; the caller keeps its current snapshot
    Unchanged,
    Changed {
        blocks: Vec<Block>,
        focus: Option<Focus>,
    },
}

impl EditOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, EditOutcome::Changed { .. })
    }

    pub fn blocks(&self) -> Option<&[Block]> {
        match self {
            EditOutcome::Changed { blocks, .. } => Some(blocks),
            EditOutcome::Unchanged => None,
        }
    }

    pub fn focus(&self) -> Option<&Focus> {
        match self {
            EditOutcome::Changed { focus, .. } => focus.as_ref(),
            EditOutcome::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// One editing command, as dispatched from UI events
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Insert an empty text block after `after`, or append when `None`
    InsertAfter { after: Option<String> },
    InsertBlockAfter {
        after: Option<String>,
        block_type: BlockType,
        content: String,
    },
    Split {
        id: String,
        before: String,
        after: String,
    },
    MergeWithPrevious { id: String },
    Delete { id: String },
    Duplicate { id: String },
    Move { id: String, direction: MoveDirection },
    Retype { id: String, block_type: BlockType },
    Reorder { id: String, drop_index: usize },
    UpdateContent { id: String, content: String },
    UpdateProperties { id: String, properties: serde_json::Value },
}

fn index_of(blocks: &[Block], id: &str) -> Option<usize> {
    blocks.iter().position(|b| b.id == id)
}

/// Rewrite `position` to match array order, touching only blocks that moved
pub fn renumber(blocks: &mut [Block], now: DateTime<Utc>) {
    for (index, block) in blocks.iter_mut().enumerate() {
        if block.position != index {
            block.position = index;
            block.updated_at = now;
        }
    }
}

/// Whether positions equal `0..n-1` in array order
pub fn positions_are_dense(blocks: &[Block]) -> bool {
    blocks.iter().enumerate().all(|(i, b)| b.position == i)
}

/// Stateless transform engine for one document's blocks
///
/// Holds only the document id for new blocks and a clock for timestamps.
#[derive(Clone)]
pub struct BlockEditor {
    document_id: String,
    clock: Arc<dyn TimeProvider>,
}

impl BlockEditor {
    pub fn new(document_id: impl Into<String>, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            document_id: document_id.into(),
            clock,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn changed(&self, mut blocks: Vec<Block>, focus: Option<Focus>) -> EditOutcome {
        renumber(&mut blocks, self.now());
        EditOutcome::Changed { blocks, focus }
    }

    fn new_block(&self, block_type: BlockType, content: String) -> Block {
        Block::new_at(
            self.document_id.clone(),
            block_type,
            content,
            serde_json::json!({}),
            self.now(),
        )
    }

    /// Dispatch a command to the matching operation
    pub fn apply(&self, blocks: &[Block], command: &EditCommand) -> EditOutcome {
        match command {
            EditCommand::InsertAfter { after } => self.insert_after(blocks, after.as_deref()),
            EditCommand::InsertBlockAfter {
                after,
                block_type,
                content,
            } => self.insert_block_after(blocks, after.as_deref(), *block_type, content),
            EditCommand::Split { id, before, after } => self.split(blocks, id, before, after),
            EditCommand::MergeWithPrevious { id } => self.merge_with_previous(blocks, id),
            EditCommand::Delete { id } => self.delete(blocks, id),
            EditCommand::Duplicate { id } => self.duplicate(blocks, id),
            EditCommand::Move { id, direction } => self.move_block(blocks, id, *direction),
            EditCommand::Retype { id, block_type } => self.retype(blocks, id, *block_type),
            EditCommand::Reorder { id, drop_index } => self.reorder(blocks, id, *drop_index),
            EditCommand::UpdateContent { id, content } => self.update_content(blocks, id, content),
            EditCommand::UpdateProperties { id, properties } => {
                self.update_properties(blocks, id, properties)
            }
        }
    }

    /// Insert an empty `text` block after `after`, or at the end when `None`
    pub fn insert_after(&self, blocks: &[Block], after: Option<&str>) -> EditOutcome {
        self.insert_block_after(blocks, after, BlockType::Text, "")
    }

    /// Insert a new block of `block_type` after `after`, or at the end when `None`
    ///
    /// An unknown `after` id is a no-op.
    pub fn insert_block_after(
        &self,
        blocks: &[Block],
        after: Option<&str>,
        block_type: BlockType,
        content: &str,
    ) -> EditOutcome {
        let index = match after {
            Some(id) => match index_of(blocks, id) {
                Some(i) => i + 1,
                None => {
                    tracing::debug!("insert_after: block {} not found", id);
                    return EditOutcome::Unchanged;
                }
            },
            None => blocks.len(),
        };

        let block = self.new_block(block_type, content.to_string());
        let focus = Focus::new(block.id.clone(), 0);
        let mut next = blocks.to_vec();
        next.insert(index, block);
        self.changed(next, Some(focus))
    }

    /// Split a block at a caller-computed point
    ///
    /// The block keeps its id and takes `before`; a new `text` block holding
    /// `after` is inserted right after it and receives focus.
    pub fn split(&self, blocks: &[Block], id: &str, before: &str, after: &str) -> EditOutcome {
        let Some(index) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };

        let now = self.now();
        let mut next = blocks.to_vec();
        next[index].content = before.to_string();
        next[index].updated_at = now;

        let tail = self.new_block(BlockType::Text, after.to_string());
        let focus = Focus::new(tail.id.clone(), 0);
        next.insert(index + 1, tail);
        self.changed(next, Some(focus))
    }

    /// Append a block's content to its predecessor and remove it
    ///
    /// The first block has no predecessor, so merging it is a no-op. Focus
    /// lands on the predecessor at the length of its original content.
    pub fn merge_with_previous(&self, blocks: &[Block], id: &str) -> EditOutcome {
        let index = match index_of(blocks, id) {
            Some(0) | None => return EditOutcome::Unchanged,
            Some(i) => i,
        };

        let mut next = blocks.to_vec();
        let current = next.remove(index);
        let previous = &mut next[index - 1];
        let offset = previous.content_len();
        previous.content.push_str(&current.content);
        previous.updated_at = self.now();

        let focus = Focus::new(previous.id.clone(), offset);
        self.changed(next, Some(focus))
    }

    pub fn delete(&self, blocks: &[Block], id: &str) -> EditOutcome {
        let Some(index) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };

        let mut next = blocks.to_vec();
        next.remove(index);
        let focus = index
            .checked_sub(1)
            .and_then(|i| next.get(i))
            .or_else(|| next.first())
            .map(|b| Focus::new(b.id.clone(), b.content_len()));
        self.changed(next, focus)
    }

    /// Insert a copy with a fresh id right after the source
    pub fn duplicate(&self, blocks: &[Block], id: &str) -> EditOutcome {
        let Some(index) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };

        let source = &blocks[index];
        let mut copy = self.new_block(source.block_type, source.content.clone());
        copy.properties = source.properties.clone();
        copy.parent_id = source.parent_id.clone();
        let focus = Focus::new(copy.id.clone(), copy.content_len());

        let mut next = blocks.to_vec();
        next.insert(index + 1, copy);
        self.changed(next, Some(focus))
    }

    /// Swap with the neighbor in `direction`; no-op at either boundary
    pub fn move_block(&self, blocks: &[Block], id: &str, direction: MoveDirection) -> EditOutcome {
        let Some(index) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };

        let neighbor = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < blocks.len()),
        };
        let Some(neighbor) = neighbor else {
            return EditOutcome::Unchanged;
        };

        let mut next = blocks.to_vec();
        next.swap(index, neighbor);
        self.changed(next, None)
    }

    /// Change only the type tag; content and properties are kept
    pub fn retype(&self, blocks: &[Block], id: &str, block_type: BlockType) -> EditOutcome {
        let Some(index) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };
        if blocks[index].block_type == block_type {
            return EditOutcome::Unchanged;
        }

        let mut next = blocks.to_vec();
        next[index].block_type = block_type;
        next[index].updated_at = self.now();
        self.changed(next, None)
    }

    /// Move a dragged block to `drop_index`
    ///
    /// `drop_index` is the insertion slot in the original array, so a slot
    /// past the source is shifted down by one once the block is removed.
    pub fn reorder(&self, blocks: &[Block], id: &str, drop_index: usize) -> EditOutcome {
        let Some(source) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };

        let target = if drop_index > source {
            drop_index - 1
        } else {
            drop_index
        };
        let target = target.min(blocks.len() - 1);
        if target == source {
            return EditOutcome::Unchanged;
        }

        let mut next = blocks.to_vec();
        let dragged = next.remove(source);
        next.insert(target, dragged);
        self.changed(next, None)
    }

    pub fn update_content(&self, blocks: &[Block], id: &str, content: &str) -> EditOutcome {
        let Some(index) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };
        if blocks[index].content == content {
            return EditOutcome::Unchanged;
        }

        let mut next = blocks.to_vec();
        next[index].content = content.to_string();
        next[index].updated_at = self.now();
        self.changed(next, None)
    }

    /// Shallow-merge `properties` into the block's properties
    pub fn update_properties(
        &self,
        blocks: &[Block],
        id: &str,
        properties: &serde_json::Value,
    ) -> EditOutcome {
        let Some(index) = index_of(blocks, id) else {
            return EditOutcome::Unchanged;
        };

        let mut updated = blocks[index].clone();
        updated.merge_properties(properties);
        if updated.properties == blocks[index].properties {
            return EditOutcome::Unchanged;
        }
        updated.updated_at = self.now();

        let mut next = blocks.to_vec();
        next[index] = updated;
        self.changed(next, None)
    }
}

#[cfg(test)]
#[path = "operations_test.rs"]
mod operations_test;
