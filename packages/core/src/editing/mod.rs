//! Block editing engine
//!
//! - [`BlockEditor`]: pure transforms from one block snapshot to the next
//! - [`BlockDocument`]: holds the current snapshot and commits outcomes
//! - [`SlashCommandPalette`]: the slash-command insertion state machine

mod document;
mod operations;
mod slash;

pub use document::{BlockDocument, Commit};
pub use operations::{
    positions_are_dense, renumber, BlockEditor, EditCommand, EditOutcome, Focus, MoveDirection,
};
pub use slash::{
    filter_commands, PaletteMode, PaletteState, SlashCommand, SlashCommandPalette, SLASH_COMMANDS,
    SLASH_TRIGGER,
};
