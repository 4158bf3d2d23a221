//! Utility functions for Summanote Core

mod markdown;

pub use markdown::{strip_inline_markdown, trim_quote_glyphs};
