//! BlockStore Trait - persistence boundary
//!
//! The remote store is an external collaborator reachable through two calls:
//! read all blocks of a document, and replace all blocks of a document. The
//! auto-save coordinator only ever sends full snapshots.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: implementations are usually network clients
//! 2. **Ownership Semantics**: `replace_blocks` takes the block list by value
//! 3. **Error Handling**: `anyhow::Result`; transport concerns (timeouts,
//!    retries) belong to the implementation
//!
//! # Examples
//!
//! ```rust
//! use summanote_core::autosave::{BlockStore, InMemoryBlockStore};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store: Arc<dyn BlockStore> = Arc::new(InMemoryBlockStore::new());
//! assert!(store.get_blocks("doc-1").await.unwrap().is_empty());
//! # });
//! ```

use crate::models::Block;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistence operations for a document's blocks
///
/// Implementations must be `Send + Sync`; the coordinator calls them from a
/// spawned task.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// All blocks of a document, in any order (empty if unknown)
    async fn get_blocks(&self, document_id: &str) -> Result<Vec<Block>>;

    /// Replace every block of a document with `blocks`
    async fn replace_blocks(&self, document_id: &str, blocks: Vec<Block>) -> Result<()>;
}

/// Process-local store, used by the inspect tool and tests
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    documents: RwLock<HashMap<String, Vec<Block>>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl BlockStore for InMemoryBlockStore {
    async fn get_blocks(&self, document_id: &str) -> Result<Vec<Block>> {
        Ok(self
            .documents
            .read()
            .await
            .get(document_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_blocks(&self, document_id: &str, blocks: Vec<Block>) -> Result<()> {
        for block in &blocks {
            block.validate()?;
            if block.document_id != document_id {
                anyhow::bail!(
                    "Block {} belongs to document {}, not {}",
                    block.id,
                    block.document_id,
                    document_id
                );
            }
        }

        self.documents
            .write()
            .await
            .insert(document_id.to_string(), blocks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockType;
    use serde_json::json;

    fn block(document_id: &str, content: &str) -> Block {
        Block::new(
            document_id.to_string(),
            BlockType::Text,
            content.to_string(),
            json!({}),
        )
    }

    #[tokio::test]
    async fn test_replace_then_get() {
        let store = InMemoryBlockStore::new();
        store
            .replace_blocks("doc", vec![block("doc", "a"), block("doc", "b")])
            .await
            .unwrap();
        store
            .replace_blocks("doc", vec![block("doc", "c")])
            .await
            .unwrap();

        let blocks = store.get_blocks("doc").await.unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "c");
        assert_eq!(store.document_count().await, 1);
    }

    #[tokio::test]
    async fn test_rejects_foreign_blocks() {
        let store = InMemoryBlockStore::new();
        let result = store.replace_blocks("doc", vec![block("other", "x")]).await;

        assert!(result.is_err());
        assert!(store.get_blocks("doc").await.unwrap().is_empty());
    }
}
