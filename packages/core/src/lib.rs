//! Summanote Core
//!
//! This crate turns AI-generated summary Markdown into structured views and an
//! editable block document with debounced persistence.
//!
//! # Architecture
//!
//! - **Pure parsing**: sections, TOC and extraction helpers are total
//!   functions over the Markdown string
//! - **Immutable snapshots**: every edit produces a new block list with dense
//!   `0..n-1` positions
//! - **Single writer per document**: one auto-save task, at most one save in
//!   flight, full-snapshot replacement
//!
//! # Modules
//!
//! - [`models`] - Data structures (Block, ParsedSection, SaveStatus, etc.)
//! - [`parsing`] - Section parser, extraction helpers, Markdown↔Block converter
//! - [`editing`] - Block transforms, document controller, slash palette
//! - [`autosave`] - Block store trait and debounced save coordinator
//! - [`session`] - One open document wired to its coordinator
//! - [`config`] - Configuration with defaults and env overrides

pub mod autosave;
pub mod config;
pub mod editing;
pub mod models;
pub mod parsing;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use autosave::{AutoSaveCoordinator, AutoSaveError, AutoSaveHandle, BlockStore};
pub use config::CoreConfig;
pub use editing::{BlockDocument, BlockEditor, EditCommand, EditOutcome, MoveDirection};
pub use models::*;
pub use parsing::{markdown_to_blocks, parse_sections, SummaryExtraction};
pub use session::EditingSession;
