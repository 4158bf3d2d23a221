//! Editing session for one open document
//!
//! Wires the pieces together: blocks are loaded from the store (or converted
//! from the summary Markdown on first open), every committed edit is handed
//! to the auto-save coordinator, and the slash palette operates on the
//! current snapshot.

use crate::autosave::{AutoSaveCoordinator, AutoSaveError, BlockStore};
use crate::config::CoreConfig;
use crate::editing::{
    BlockDocument, Commit, EditCommand, EditOutcome, PaletteState, SlashCommand,
    SlashCommandPalette,
};
use crate::models::{Block, BlockType, SaveStatus, TimeProvider};
use crate::parsing::{blocks_from_markdown, blocks_to_markdown};
use std::sync::Arc;
use tokio::sync::watch;

pub struct EditingSession {
    document: BlockDocument,
    palette: SlashCommandPalette,
    autosave: AutoSaveCoordinator,
}

impl EditingSession {
    /// Open `document_id` for editing
    ///
    /// Persisted blocks win. When the store has none, `markdown` is converted
    /// to blocks and saved right away.
    ///
    /// # Errors
    ///
    /// Returns `AutoSaveError::LoadFailed` if the store cannot be read.
    pub async fn open(
        store: Arc<dyn BlockStore>,
        document_id: &str,
        markdown: &str,
        config: &CoreConfig,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self, AutoSaveError> {
        let stored = store
            .get_blocks(document_id)
            .await
            .map_err(|e| AutoSaveError::load_failed(document_id, e))?;

        let first_open = stored.is_empty();
        let blocks = if first_open {
            blocks_from_markdown(document_id, markdown, clock.now())
        } else {
            stored
        };
        tracing::info!(
            "Opening document {} with {} blocks{}",
            document_id,
            blocks.len(),
            if first_open { " (converted from Markdown)" } else { "" }
        );

        let document = BlockDocument::new(document_id, blocks, clock);
        let autosave = AutoSaveCoordinator::new(document_id, store, &config.autosave);

        if first_open && !document.blocks().is_empty() {
            let handle = autosave.handle();
            handle.mark_dirty(document.snapshot());
            if let Err(e) = handle.flush().await {
                tracing::warn!("Initial save failed: {}", e);
            }
        }

        Ok(Self {
            document,
            palette: SlashCommandPalette::new(),
            autosave,
        })
    }

    pub fn document_id(&self) -> &str {
        self.document.document_id()
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    pub fn snapshot(&self) -> Arc<[Block]> {
        self.document.snapshot()
    }

    /// Apply an editing command; committed changes are scheduled for saving
    pub fn apply(&mut self, command: &EditCommand) -> Commit {
        let commit = self.document.apply(command);
        self.after_commit(&commit);
        commit
    }

    fn commit(&mut self, outcome: EditOutcome) -> Commit {
        let commit = self.document.commit(outcome);
        self.after_commit(&commit);
        commit
    }

    fn after_commit(&self, commit: &Commit) {
        if commit.changed {
            self.autosave.handle().mark_dirty(self.document.snapshot());
        }
    }

    pub fn palette_state(&self) -> &PaletteState {
        self.palette.state()
    }

    /// Open the palette from inside block `id`; see
    /// [`SlashCommandPalette::open_from_block`]
    pub fn open_palette_in_block(&mut self, id: &str) -> bool {
        match self.document.get(id) {
            Some(block) => self.palette.open_from_block(block),
            None => false,
        }
    }

    pub fn open_palette_after(&mut self, anchor_id: &str) {
        self.palette.open_insert_after(anchor_id);
    }

    pub fn set_palette_query(&mut self, query: &str) {
        self.palette.set_query(query);
    }

    pub fn palette_commands(&self) -> Vec<&'static SlashCommand> {
        self.palette.filtered_commands()
    }

    pub fn select_command(&mut self, block_type: BlockType) -> Commit {
        let outcome =
            self.palette
                .select(block_type, self.document.blocks(), self.document.editor());
        self.commit(outcome)
    }

    pub fn dismiss_palette(&mut self) -> Commit {
        let outcome = self
            .palette
            .dismiss(self.document.blocks(), self.document.editor());
        self.commit(outcome)
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.autosave.subscribe()
    }

    /// Save pending edits now
    pub async fn flush(&self) -> Result<(), AutoSaveError> {
        self.autosave.handle().flush().await
    }

    /// Render the current blocks as Markdown
    pub fn to_markdown(&self) -> String {
        blocks_to_markdown(self.document.blocks())
    }

    /// Close the session, cancelling any pending debounced save
    pub async fn close(self) {
        tracing::debug!("Closing document {}", self.document.document_id());
        self.autosave.shutdown().await;
    }
}
