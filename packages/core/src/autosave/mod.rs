//! Auto-save
//!
//! Debounces committed edits and reconciles them with the remote block store.

mod coordinator;
mod error;
mod store;

pub use coordinator::{AutoSaveCoordinator, AutoSaveHandle};
pub use error::AutoSaveError;
pub use store::{BlockStore, InMemoryBlockStore};
