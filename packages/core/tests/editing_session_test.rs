//! Editing Session Tests
//!
//! End-to-end flow of one document: first open converts Markdown and saves
//! it, edits commit through the session and land in the store after the
//! debounce, and reopening reads the persisted blocks back.

#[cfg(test)]
mod editing_session_tests {
    use anyhow::Result;
    use std::sync::Arc;
    use std::time::Duration;
    use summanote_core::autosave::{BlockStore, InMemoryBlockStore};
    use summanote_core::config::{AutoSaveConfig, CoreConfig};
    use summanote_core::editing::{EditCommand, MoveDirection, PaletteState};
    use summanote_core::models::{BlockType, ManualClock, SaveStatus, TimeProvider};
    use summanote_core::EditingSession;

    const SUMMARY: &str = "# 습관의 힘\n\
                           ## 핵심 개념\n\
                           - 신호와 보상\n\
                           - [01:23] 습관 루프\n\
                           > 작은 습관이 큰 변화를 만든다";

    fn config(debounce_ms: u64) -> CoreConfig {
        CoreConfig {
            autosave: AutoSaveConfig { debounce_ms },
            ..Default::default()
        }
    }

    async fn open(
        store: &Arc<InMemoryBlockStore>,
        markdown: &str,
    ) -> Result<EditingSession> {
        let clock: Arc<dyn TimeProvider> = Arc::new(ManualClock::default());
        Ok(EditingSession::open(store.clone(), "doc-1", markdown, &config(200), clock).await?)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_open_converts_and_persists() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let session = open(&store, SUMMARY).await?;

        let types: Vec<_> = session.blocks().iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![
                BlockType::Heading1,
                BlockType::Heading2,
                BlockType::BulletItem,
                BlockType::BulletItem,
                BlockType::Quote,
            ]
        );
        assert_eq!(session.save_status(), SaveStatus::Saved);
        assert_eq!(store.get_blocks("doc-1").await?.len(), 5);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_prefers_persisted_blocks() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let mut session = open(&store, SUMMARY).await?;
        let first_id = session.blocks()[0].id.clone();

        session.apply(&EditCommand::Delete { id: first_id });
        session.flush().await?;
        session.close().await;

        let reopened = open(&store, "# 완전히 다른 문서").await?;
        assert_eq!(reopened.blocks().len(), 4);
        assert_eq!(reopened.blocks()[0].block_type, BlockType::Heading2);
        let positions: Vec<_> = reopened.blocks().iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_are_saved_after_debounce() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let mut session = open(&store, SUMMARY).await?;
        let bullet = session.blocks()[2].clone();

        let commit = session.apply(&EditCommand::Split {
            id: bullet.id.clone(),
            before: "신호와 ".to_string(),
            after: "보상".to_string(),
        });
        assert!(commit.changed);
        assert_eq!(session.save_status(), SaveStatus::Unsaved);

        session.apply(&EditCommand::Move {
            id: bullet.id.clone(),
            direction: MoveDirection::Up,
        });

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(session.save_status(), SaveStatus::Saved);
        let mut stored = store.get_blocks("doc-1").await?;
        stored.sort_by_key(|b| b.position);
        let contents: Vec<_> = stored.iter().map(|b| b.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "습관의 힘",
                "신호와 ",
                "핵심 개념",
                "보상",
                "습관 루프",
                "작은 습관이 큰 변화를 만든다"
            ]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_noop_edit_does_not_dirty() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let mut session = open(&store, SUMMARY).await?;
        let first = session.blocks()[0].id.clone();

        let commit = session.apply(&EditCommand::Move {
            id: first,
            direction: MoveDirection::Up,
        });

        assert!(!commit.changed);
        assert_eq!(session.save_status(), SaveStatus::Saved);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_slash_palette_flow() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let mut session = open(&store, SUMMARY).await?;
        let last = session.blocks()[4].id.clone();

        let commit = session.apply(&EditCommand::InsertAfter {
            after: Some(last.clone()),
        });
        let new_id = commit.focus.expect("focus on new block").block_id;
        session.apply(&EditCommand::UpdateContent {
            id: new_id.clone(),
            content: "/".to_string(),
        });

        assert!(session.open_palette_in_block(&new_id));
        session.set_palette_query("todo");
        assert_eq!(session.palette_commands()[0].block_type, BlockType::Todo);

        let commit = session.select_command(BlockType::Todo);
        assert!(commit.changed);
        assert_eq!(session.palette_state(), &PaletteState::Idle);

        let converted = &session.blocks()[5];
        assert_eq!(converted.id, new_id);
        assert_eq!(converted.block_type, BlockType::Todo);
        assert_eq!(converted.content, "");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_palette_clears_placeholder() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let mut session = open(&store, "첫 줄").await?;
        let id = session.blocks()[0].id.clone();

        session.apply(&EditCommand::UpdateContent {
            id: id.clone(),
            content: "/".to_string(),
        });
        assert!(session.open_palette_in_block(&id));
        let commit = session.dismiss_palette();

        assert!(commit.changed);
        assert_eq!(session.blocks()[0].content, "");
        assert_eq!(session.blocks()[0].block_type, BlockType::Text);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_save() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let mut session = open(&store, SUMMARY).await?;
        let first = session.blocks()[0].id.clone();

        session.apply(&EditCommand::UpdateContent {
            id: first,
            content: "저장되지 않음".to_string(),
        });
        session.close().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let stored = store.get_blocks("doc-1").await?;
        assert!(stored.iter().all(|b| b.content != "저장되지 않음"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_to_markdown_round_trips() -> Result<()> {
        let store = Arc::new(InMemoryBlockStore::new());
        let session = open(&store, SUMMARY).await?;

        let markdown = session.to_markdown();
        assert!(markdown.starts_with("# 습관의 힘\n## 핵심 개념"));
        assert!(markdown.contains("- [01:23] 습관 루프"));
        Ok(())
    }
}
