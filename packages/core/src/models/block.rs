//! Block Data Structures
//!
//! This module defines the `Block` struct, the canonical unit of editable
//! document content, together with its `BlockType` tag.
//!
//! # Architecture
//!
//! - **Flat ordered list**: a document is an ordered `Vec<Block>`; `position`
//!   is derived from array order after every structural edit
//! - **Stable identity**: `id` is generated once and never changes
//! - **Open properties**: type-specific metadata (`timestamp`, `language`,
//!   `checked`, ...) lives in the `properties` JSON object
//! - **Reserved nesting**: `parent_id` is carried and validated but no edit
//!   operation changes it yet
//!
//! # Examples
//!
//! ```rust
//! use summanote_core::models::{Block, BlockType};
//! use serde_json::json;
//!
//! let block = Block::new(
//!     "doc-1".to_string(),
//!     BlockType::Code,
//!     "fn main() {}".to_string(),
//!     json!({ "language": "rust" }),
//! );
//!
//! assert_eq!(block.block_type, BlockType::Code);
//! assert!(block.validate().is_ok());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for Block operations
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid block type: {0}")]
    InvalidBlockType(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    #[error("Properties validation failed: {0}")]
    InvalidProperties(String),
}

/// Type tag of a block
///
/// Determines both rendering and which slash conversions apply. Serialized as
/// the camelCase tag used by the persistence layer (`"bulletItem"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletItem,
    NumberedItem,
    Todo,
    Quote,
    Callout,
    Code,
    Timestamp,
    Image,
    Divider,
}

impl BlockType {
    /// Every block type, in slash-palette order
    pub const ALL: [BlockType; 13] = [
        BlockType::Text,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::BulletItem,
        BlockType::NumberedItem,
        BlockType::Todo,
        BlockType::Quote,
        BlockType::Callout,
        BlockType::Code,
        BlockType::Timestamp,
        BlockType::Image,
        BlockType::Divider,
    ];

    /// Persistence tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Heading1 => "heading1",
            BlockType::Heading2 => "heading2",
            BlockType::Heading3 => "heading3",
            BlockType::BulletItem => "bulletItem",
            BlockType::NumberedItem => "numberedItem",
            BlockType::Todo => "todo",
            BlockType::Quote => "quote",
            BlockType::Callout => "callout",
            BlockType::Code => "code",
            BlockType::Timestamp => "timestamp",
            BlockType::Image => "image",
            BlockType::Divider => "divider",
        }
    }

    /// Heading level for heading types, `None` otherwise
    pub fn heading_level(&self) -> Option<usize> {
        match self {
            BlockType::Heading1 => Some(1),
            BlockType::Heading2 => Some(2),
            BlockType::Heading3 => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidBlockType(s.to_string()))
    }
}

/// Canonical unit of document content.
///
/// # Fields
///
/// - `id`: Unique identifier (UUID v4), stable for the block's lifetime
/// - `document_id`: Owning document (reference, not ownership)
/// - `parent_id`: Reserved for nesting; untouched by current edit operations
/// - `block_type`: Type tag (serialized as `type`)
/// - `content`: Inline text payload
/// - `properties`: JSON object with type-specific metadata
/// - `position`: Dense zero-based order index, rewritten after structural edits
/// - `created_at` / `updated_at`: Creation and last mutation timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,

    pub document_id: String,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(rename = "type")]
    pub block_type: BlockType,

    #[serde(default)]
    pub content: String,

    #[serde(default = "empty_properties")]
    pub properties: serde_json::Value,

    #[serde(default)]
    pub position: usize,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn empty_properties() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Block {
    /// Create a new Block with auto-generated UUID, stamped with the system clock
    ///
    /// `position` starts at 0; callers place the block into a document and
    /// let the editing engine renumber.
    pub fn new(
        document_id: String,
        block_type: BlockType,
        content: String,
        properties: serde_json::Value,
    ) -> Self {
        Self::new_at(document_id, block_type, content, properties, Utc::now())
    }

    /// Create a new Block with auto-generated UUID and an explicit timestamp
    pub fn new_at(
        document_id: String,
        block_type: BlockType,
        content: String,
        properties: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document_id,
            parent_id: None,
            block_type,
            content,
            properties,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate block structure and required fields
    ///
    /// Content may be empty: blank blocks are created on Enter and by the
    /// slash palette.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `id` or `document_id` is empty
    /// - `properties` is not a JSON object
    /// - the block references itself as parent
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if self.document_id.is_empty() {
            return Err(ValidationError::MissingField("document_id".to_string()));
        }

        if !self.properties.is_object() {
            return Err(ValidationError::InvalidProperties(
                "properties must be a JSON object".to_string(),
            ));
        }

        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(ValidationError::InvalidParent(
                "Block cannot be its own parent".to_string(),
            ));
        }

        Ok(())
    }

    /// Read a string property
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    /// Length of `content` in characters (cursor units)
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Merge properties with existing properties (shallow merge)
    pub(crate) fn merge_properties(&mut self, updates: &serde_json::Value) {
        if !self.properties.is_object() {
            self.properties = empty_properties();
        }
        if let (Some(existing), Some(new)) = (self.properties.as_object_mut(), updates.as_object())
        {
            for (key, value) in new {
                existing.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A block not yet bound to a document
///
/// Produced by the Markdown converter on first open; turned into real
/// blocks with [`BlockDraft::into_block`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDraft {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
    pub properties: serde_json::Value,
    pub position: usize,
}

impl BlockDraft {
    pub fn new(block_type: BlockType, content: impl Into<String>, position: usize) -> Self {
        Self {
            block_type,
            content: content.into(),
            properties: empty_properties(),
            position,
        }
    }

    pub fn with_property(mut self, key: &str, value: serde_json::Value) -> Self {
        if let Some(map) = self.properties.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        self
    }

    /// Bind the draft to a document, allocating a fresh id
    pub fn into_block(self, document_id: &str, now: DateTime<Utc>) -> Block {
        let mut block = Block::new_at(
            document_id.to_string(),
            self.block_type,
            self.content,
            self.properties,
            now,
        );
        block.position = self.position;
        block
    }
}
