use thiserror::Error;

/// Errors surfaced by the auto-save coordinator and editing session
///
/// Save failures during debounced saves never reach callers as errors; they
/// only move the status to `error`. These variants are returned from
/// explicit calls such as `flush` and session open.
#[derive(Error, Debug)]
pub enum AutoSaveError {
    #[error("Auto-save coordinator for document '{document_id}' has shut down")]
    CoordinatorClosed { document_id: String },

    #[error("Failed to save blocks for document '{document_id}': {source}")]
    SaveFailed {
        document_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to load blocks for document '{document_id}': {source}")]
    LoadFailed {
        document_id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AutoSaveError {
    pub fn closed(document_id: impl Into<String>) -> Self {
        Self::CoordinatorClosed {
            document_id: document_id.into(),
        }
    }

    pub fn save_failed(document_id: impl Into<String>, source: anyhow::Error) -> Self {
        Self::SaveFailed {
            document_id: document_id.into(),
            source,
        }
    }

    pub fn load_failed(document_id: impl Into<String>, source: anyhow::Error) -> Self {
        Self::LoadFailed {
            document_id: document_id.into(),
            source,
        }
    }
}
