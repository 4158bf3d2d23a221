//! Markdown parsing
//!
//! Three independent pure derivations over the same summary Markdown:
//!
//! - [`parse_sections`]: hierarchical sections for read-only rendering
//! - [`extract`]: intro, table of contents, quotes, action items and terms
//! - [`markdown_to_blocks`]: a flat block list for the first edit session

mod blocks;
pub mod extract;
mod patterns;
mod sections;

pub use blocks::{blocks_from_markdown, blocks_to_markdown, markdown_to_blocks, render_block};
pub use extract::SummaryExtraction;
pub use sections::{classify_item, parse_sections, ItemRule, ITEM_RULES};
