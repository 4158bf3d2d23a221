//! Debounced auto-save
//!
//! One background task per open document:
//!
//! 1. Every committed edit publishes the full block snapshot and marks the
//!    document `unsaved`
//! 2. Each new snapshot restarts the debounce timer, so bursts of edits end
//!    in a single save
//! 3. On timer expiry the latest snapshot is sent with one
//!    `replace_blocks` call (`saving` → `saved` / `error`)
//! 4. Edits arriving while a save is in flight are picked up when it
//!    settles and start the next debounce cycle
//!
//! At most one save is in flight per document. There is no automatic retry.
//! Dropping or shutting down the coordinator cancels a pending timer.

use super::error::AutoSaveError;
use super::store::BlockStore;
use crate::config::AutoSaveConfig;
use crate::models::{Block, SaveStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

type Snapshot = Option<Arc<[Block]>>;
type FlushReply = oneshot::Sender<Result<(), AutoSaveError>>;

/// Cloneable handle used by the editing side
#[derive(Clone)]
pub struct AutoSaveHandle {
    document_id: Arc<str>,
    snapshot_tx: Arc<watch::Sender<Snapshot>>,
    status_tx: Arc<watch::Sender<SaveStatus>>,
    flush_tx: mpsc::Sender<FlushReply>,
}

impl AutoSaveHandle {
    /// Publish the snapshot of a committed edit
    ///
    /// Marks the document `unsaved` immediately, unless a save is in flight;
    /// in that case the edit is picked up once the save settles.
    pub fn mark_dirty(&self, snapshot: Arc<[Block]>) {
        // Snapshot before status: a settling save must see the edit
        self.snapshot_tx.send_replace(Some(snapshot));
        self.status_tx.send_if_modified(|status| match status {
            SaveStatus::Saving | SaveStatus::Unsaved => false,
            _ => {
                *status = SaveStatus::Unsaved;
                true
            }
        });

        if self.snapshot_tx.receiver_count() == 0 {
            tracing::warn!(
                "AutoSaveCoordinator for {} has shut down, edit will not be saved",
                self.document_id
            );
        }
    }

    /// Save the latest snapshot now, bypassing the debounce timer
    ///
    /// Resolves once the store call settles. Succeeds immediately when
    /// nothing is pending.
    pub async fn flush(&self) -> Result<(), AutoSaveError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.flush_tx
            .send(reply_tx)
            .await
            .map_err(|_| AutoSaveError::closed(&*self.document_id))?;
        reply_rx
            .await
            .map_err(|_| AutoSaveError::closed(&*self.document_id))?
    }

    pub fn status(&self) -> SaveStatus {
        *self.status_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status_tx.subscribe()
    }
}

/// Owner of the background save task for one document
pub struct AutoSaveCoordinator {
    handle: AutoSaveHandle,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutoSaveCoordinator {
    /// Start the background task
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        document_id: impl Into<String>,
        store: Arc<dyn BlockStore>,
        config: &AutoSaveConfig,
    ) -> Self {
        let document_id: String = document_id.into();
        let debounce = config.debounce();
        tracing::info!(
            "AutoSaveCoordinator starting for {} (debounce {}ms)",
            document_id,
            debounce.as_millis()
        );

        let (snapshot_tx, snapshot_rx) = watch::channel::<Snapshot>(None);
        let (status_tx, _) = watch::channel(SaveStatus::Saved);
        let (flush_tx, flush_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        let handle = AutoSaveHandle {
            document_id: Arc::from(document_id.as_str()),
            snapshot_tx: Arc::new(snapshot_tx),
            status_tx: Arc::new(status_tx),
            flush_tx,
        };

        let worker = SaveWorker {
            document_id,
            store,
            debounce,
            status_tx: Arc::clone(&handle.status_tx),
            snapshot_rx,
            flush_rx,
            shutdown_rx,
            pending: None,
            deadline: None,
        };
        let task = tokio::spawn(worker.run());

        Self {
            handle,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn handle(&self) -> AutoSaveHandle {
        self.handle.clone()
    }

    pub fn status(&self) -> SaveStatus {
        self.handle.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.handle.subscribe()
    }

    /// Stop the background task and wait for it to exit
    ///
    /// A pending debounce timer is cancelled; an in-flight save completes
    /// first. Call `flush` beforehand to persist pending edits.
    pub async fn shutdown(mut self) {
        self.shutdown_tx.take();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("AutoSaveCoordinator task ended abnormally: {}", e);
            }
        }
    }
}

/// State owned by the background task
struct SaveWorker {
    document_id: String,
    store: Arc<dyn BlockStore>,
    debounce: Duration,
    status_tx: Arc<watch::Sender<SaveStatus>>,
    snapshot_rx: watch::Receiver<Snapshot>,
    flush_rx: mpsc::Receiver<FlushReply>,
    shutdown_rx: mpsc::Receiver<()>,
    /// Latest snapshot not yet sent to the store
    pending: Snapshot,
    /// When the debounce timer fires, if armed
    deadline: Option<Instant>,
}

impl SaveWorker {
    async fn run(mut self) {
        loop {
            let deadline = self.deadline;

            tokio::select! {
                biased; // Check shutdown first

                _ = self.shutdown_rx.recv() => {
                    if self.pending.is_some() {
                        tracing::info!(
                            "AutoSaveCoordinator for {} shutting down, pending save cancelled",
                            self.document_id
                        );
                    } else {
                        tracing::debug!("AutoSaveCoordinator for {} shutting down", self.document_id);
                    }
                    break;
                }

                changed = self.snapshot_rx.changed() => {
                    if changed.is_err() {
                        tracing::debug!("All handles for {} dropped", self.document_id);
                        break;
                    }
                    self.take_snapshot();
                }

                Some(reply) = self.flush_rx.recv() => {
                    if self.snapshot_rx.has_changed().unwrap_or(false) {
                        self.take_snapshot();
                    }
                    self.deadline = None;
                    let result = self.save_pending().await;
                    let _ = reply.send(result);
                }

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.deadline = None;
                    if let Err(e) = self.save_pending().await {
                        tracing::warn!("{}", e);
                    }
                }
            }
        }
    }

    /// Adopt the latest published snapshot and restart the debounce timer
    fn take_snapshot(&mut self) {
        self.pending = self.snapshot_rx.borrow_and_update().clone();
        self.set_status(SaveStatus::Unsaved);
        self.deadline = Some(Instant::now() + self.debounce);
    }

    fn set_status(&self, next: SaveStatus) {
        self.status_tx.send_if_modified(|status| {
            if *status == next {
                false
            } else {
                *status = next;
                true
            }
        });
    }

    /// Send the pending snapshot, if any, with a single store call
    async fn save_pending(&mut self) -> Result<(), AutoSaveError> {
        let Some(snapshot) = self.pending.take() else {
            return Ok(());
        };

        self.set_status(SaveStatus::Saving);
        tracing::debug!(
            "Saving {} blocks for document {}",
            snapshot.len(),
            self.document_id
        );
        let result = self
            .store
            .replace_blocks(&self.document_id, snapshot.to_vec())
            .await;

        let settled = match result {
            Ok(()) => SaveStatus::Saved,
            Err(_) => SaveStatus::Error,
        };

        // Checked under the status lock so a concurrent `mark_dirty` either
        // lands before (seen here) or after (turns `saved` back to `unsaved`)
        let mut edited = false;
        let snapshot_rx = &self.snapshot_rx;
        self.status_tx.send_if_modified(|status| {
            edited = snapshot_rx.has_changed().unwrap_or(false);
            let next = match settled {
                SaveStatus::Saved if edited => SaveStatus::Unsaved,
                other => other,
            };
            if *status == next {
                false
            } else {
                *status = next;
                true
            }
        });

        // Edits made while the save was in flight start the next cycle
        if edited {
            self.pending = self.snapshot_rx.borrow_and_update().clone();
            self.deadline = Some(Instant::now() + self.debounce);
        }

        result.map_err(|e| AutoSaveError::save_failed(self.document_id.as_str(), e))
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;
