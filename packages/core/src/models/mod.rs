//! Data Models
//!
//! This module contains the core data structures used throughout Summanote:
//!
//! - `Block` - the editable unit of document content
//! - `ParsedSection` / `TocEntry` - read-only views derived from summary Markdown
//! - Extraction results (quotes, action items, glossary terms)
//! - `SaveStatus` - auto-save state shown in the UI

mod block;
mod extraction;
mod save_status;
mod section;
pub mod time;

pub use block::{Block, BlockDraft, BlockType, ValidationError};
pub use extraction::{ActionItem, ExtractedQuote, GlossaryTerm, Priority, QuoteSource};
pub use save_status::SaveStatus;
pub use section::{anchor_id_for, ParsedSection, SectionItem, SectionItemType, TocEntry};
pub use time::{ManualClock, SystemTimeProvider, TimeProvider};
