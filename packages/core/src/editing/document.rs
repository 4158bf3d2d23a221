use super::operations::{renumber, BlockEditor, EditCommand, EditOutcome, Focus};
use crate::models::{Block, TimeProvider};
use std::sync::Arc;

/// What a committed command did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Commit {
    pub changed: bool,
    pub focus: Option<Focus>,
}

/// Current block list of one open document
///
/// The list is an immutable snapshot replaced wholesale on every change, so
/// handing a snapshot to the auto-saver never races later edits.
pub struct BlockDocument {
    editor: BlockEditor,
    blocks: Arc<[Block]>,
    version: u64,
}

impl BlockDocument {
    /// Wrap loaded blocks, ordering them by stored position
    pub fn new(
        document_id: impl Into<String>,
        mut blocks: Vec<Block>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let editor = BlockEditor::new(document_id, clock);
        blocks.sort_by_key(|b| b.position);
        renumber(&mut blocks, editor.now());

        Self {
            editor,
            blocks: blocks.into(),
            version: 0,
        }
    }

    pub fn document_id(&self) -> &str {
        self.editor.document_id()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Shared handle to the current snapshot
    pub fn snapshot(&self) -> Arc<[Block]> {
        Arc::clone(&self.blocks)
    }

    pub fn editor(&self) -> &BlockEditor {
        &self.editor
    }

    /// Number of committed changes since load
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Run a command against the current snapshot and commit the result
    pub fn apply(&mut self, command: &EditCommand) -> Commit {
        let outcome = self.editor.apply(&self.blocks, command);
        self.commit(outcome)
    }

    /// Commit an outcome computed against the current snapshot
    pub fn commit(&mut self, outcome: EditOutcome) -> Commit {
        match outcome {
            EditOutcome::Unchanged => Commit::default(),
            EditOutcome::Changed { blocks, focus } => {
                debug_assert!(super::positions_are_dense(&blocks));
                self.blocks = blocks.into();
                self.version += 1;
                tracing::trace!(
                    "Document {} now at version {} ({} blocks)",
                    self.document_id(),
                    self.version,
                    self.blocks.len()
                );
                Commit {
                    changed: true,
                    focus,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockType, SystemTimeProvider};
    use serde_json::json;

    fn document(contents: &[&str]) -> BlockDocument {
        let blocks = contents
            .iter()
            .map(|c| Block::new("doc".into(), BlockType::Text, c.to_string(), json!({})))
            .enumerate()
            .map(|(i, mut b)| {
                b.position = i;
                b
            })
            .collect();
        BlockDocument::new("doc", blocks, Arc::new(SystemTimeProvider))
    }

    #[test]
    fn test_new_orders_by_stored_position() {
        let mut blocks: Vec<Block> = ["a", "b", "c"]
            .iter()
            .map(|c| Block::new("doc".into(), BlockType::Text, c.to_string(), json!({})))
            .collect();
        blocks[0].position = 7;
        blocks[1].position = 2;
        blocks[2].position = 5;

        let doc = BlockDocument::new("doc", blocks, Arc::new(SystemTimeProvider));
        let contents: Vec<_> = doc.blocks().iter().map(|b| b.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "c", "a"]);
        assert!(super::super::positions_are_dense(doc.blocks()));
    }

    #[test]
    fn test_noop_keeps_same_snapshot() {
        let mut doc = document(&["a", "b"]);
        let before = doc.snapshot();
        let first = doc.blocks()[0].id.clone();

        let commit = doc.apply(&EditCommand::MergeWithPrevious { id: first });

        assert!(!commit.changed);
        assert!(Arc::ptr_eq(&before, &doc.snapshot()));
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_change_replaces_snapshot() {
        let mut doc = document(&["a", "b"]);
        let before = doc.snapshot();
        let second = doc.blocks()[1].id.clone();

        let commit = doc.apply(&EditCommand::MergeWithPrevious { id: second });

        assert!(commit.changed);
        assert_eq!(commit.focus.map(|f| f.offset), Some(1));
        assert_eq!(doc.blocks()[0].content, "ab");
        assert_eq!(before.len(), 2);
        assert_eq!(doc.version(), 1);
    }
}
