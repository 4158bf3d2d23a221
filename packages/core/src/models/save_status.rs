//! Save status of the auto-save coordinator
//!
//! Process-local UI state: "latest known state of the last save attempt".
//! Never persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Remote store matches the local snapshot
    #[default]
    Saved,
    /// A save request is in flight
    Saving,
    /// Local edits not yet sent
    Unsaved,
    /// The last save attempt failed; local edits are kept
    Error,
}

impl SaveStatus {
    pub fn is_dirty(&self) -> bool {
        matches!(self, SaveStatus::Unsaved | SaveStatus::Error)
    }
}
