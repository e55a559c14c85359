//! Per-record draft buffers with debounced autosave.
//!
//! An [`EditorSession`] owns the local draft of the selected record. Edits
//! apply to the draft immediately and arm a trailing debounce; when the
//! quiet period elapses the draft is validated and sent as one update.
//! Selecting another record replaces the draft and cancels any pending save.
//! A save response that arrives after the selection moved on is ignored, and
//! a failed save never discards the draft.

mod article;
mod debounce;
mod file;

pub use article::ArticleDraft;
pub use debounce::Debouncer;
pub use file::FileDraft;

use crate::api::ConsoleClient;
use crate::error::{ApiError, ApiResult};
use folio_core::config::EditorConfig;
use folio_core::{RecordId, ValidationError};
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// A local, editable copy of one record.
pub trait Draft: Clone + Send + 'static {
    /// Server record the draft is seeded from.
    type Record;
    /// Body of the update mutation.
    type Update: Send + 'static;

    fn seed(record: &Self::Record) -> Self;

    fn id(&self) -> &RecordId;

    /// Validate the draft and build the outbound body.
    fn to_update(&self) -> Result<Self::Update, ValidationError>;

    fn save(
        client: &ConsoleClient,
        id: RecordId,
        update: Self::Update,
    ) -> BoxFuture<'static, ApiResult<Value>>;
}

/// Autosave indicator.
#[derive(Clone, Debug, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    /// Edited; a save is scheduled.
    Pending,
    Saving,
    Saved,
    /// The draft failed local validation and was not sent.
    Invalid(ValidationError),
    /// The server rejected the save. The draft is kept.
    Failed(ApiError),
}

impl SaveStatus {
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Saved | Self::Invalid(_) | Self::Failed(_)
        )
    }
}

struct EditorState<D> {
    draft: Option<D>,
    /// Bumped on every edit, so a save can tell whether it is still current.
    revision: u64,
}

/// Shared between the session and its scheduled saves.
struct Shared<D> {
    client: ConsoleClient,
    state: Mutex<EditorState<D>>,
    status: watch::Sender<SaveStatus>,
}

impl<D: Draft> Shared<D> {
    fn state(&self) -> MutexGuard<'_, EditorState<D>> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("editor state mutex was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        })
    }

    fn is_selected(&self, id: &RecordId) -> bool {
        self.state().draft.as_ref().is_some_and(|d| d.id() == id)
    }

    /// Save the current draft if it still belongs to `expected`.
    ///
    /// Returns `None` when the selection changed before the save started.
    async fn save(&self, expected: RecordId) -> Option<ApiResult<Value>> {
        let (update, revision) = {
            let state = self.state();
            let draft = state.draft.as_ref().filter(|d| d.id() == &expected)?;
            match draft.to_update() {
                Ok(update) => (update, state.revision),
                Err(e) => {
                    debug!(id = %expected, error = %e, "draft invalid; save suppressed");
                    self.status.send_replace(SaveStatus::Invalid(e.clone()));
                    return Some(Err(e.into()));
                }
            }
        };

        self.status.send_replace(SaveStatus::Saving);
        let result = D::save(&self.client, expected.clone(), update).await;

        let (selected, current_revision) = {
            let state = self.state();
            (
                state.draft.as_ref().is_some_and(|d| d.id() == &expected),
                state.revision,
            )
        };
        if !selected {
            debug!(id = %expected, "ignoring save response for a record no longer selected");
            return Some(result);
        }
        match &result {
            Ok(_) if current_revision == revision => {
                self.status.send_replace(SaveStatus::Saved);
            }
            // Newer edits are already scheduled.
            Ok(_) => {}
            Err(e) => {
                warn!(id = %expected, error = %e, "autosave failed");
                self.status.send_replace(SaveStatus::Failed(e.clone()));
            }
        }
        Some(result)
    }
}

/// Editor for one record type.
pub struct EditorSession<D: Draft> {
    shared: Arc<Shared<D>>,
    debounce: Debouncer,
}

impl<D: Draft> EditorSession<D> {
    pub fn new(client: ConsoleClient, delay: Duration) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            shared: Arc::new(Shared {
                client,
                state: Mutex::new(EditorState {
                    draft: None,
                    revision: 0,
                }),
                status,
            }),
            debounce: Debouncer::new(delay),
        }
    }

    pub fn from_config(client: ConsoleClient, config: &EditorConfig) -> Self {
        Self::new(client, config.autosave_delay())
    }

    pub fn client(&self) -> &ConsoleClient {
        &self.shared.client
    }

    /// Show `record` in the editor.
    ///
    /// A different id replaces the draft wholesale and drops any pending
    /// save. The same id keeps the local draft, which wins over server
    /// copies. Returns whether the draft was reseeded.
    pub fn select(&mut self, record: &D::Record) -> bool {
        let seeded = D::seed(record);
        let mut state = self.shared.state();
        if state.draft.as_ref().is_some_and(|d| d.id() == seeded.id()) {
            return false;
        }
        if self.debounce.cancel() {
            debug!("selection changed; pending save discarded");
        }
        debug!(id = %seeded.id(), "editor seeded");
        state.draft = Some(seeded);
        state.revision += 1;
        drop(state);
        self.shared.status.send_replace(SaveStatus::Idle);
        true
    }

    /// Close the editor, discarding any pending save.
    pub fn close(&mut self) {
        self.debounce.cancel();
        self.shared.state().draft = None;
        self.shared.status.send_replace(SaveStatus::Idle);
    }

    pub fn draft(&self) -> Option<D> {
        self.shared.state().draft.clone()
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.shared.state().draft.as_ref().map(|d| d.id().clone())
    }

    pub fn status(&self) -> SaveStatus {
        self.shared.status.borrow().clone()
    }

    /// Follow autosave status changes.
    pub fn status_changes(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status.subscribe()
    }

    pub fn is_save_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    /// Apply `edit` to the draft and (re)schedule the save.
    ///
    /// Returns `None` when nothing is selected.
    pub fn edit<R>(&mut self, edit: impl FnOnce(&mut D) -> R) -> Option<R> {
        let (id, output) = {
            let mut state = self.shared.state();
            let draft = state.draft.as_mut()?;
            let output = edit(draft);
            let id = draft.id().clone();
            state.revision += 1;
            (id, output)
        };
        self.shared.status.send_replace(SaveStatus::Pending);
        let shared = self.shared.clone();
        self.debounce.arm(async move {
            shared.save(id).await;
        });
        Some(output)
    }

    /// Drop the scheduled save, if any.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.debounce.cancel();
        if cancelled {
            self.shared.status.send_replace(SaveStatus::Idle);
        }
        cancelled
    }

    /// Save now instead of waiting for the debounce.
    pub async fn flush(&mut self) -> Option<ApiResult<Value>> {
        self.debounce.cancel();
        let id = self.selected_id()?;
        self.shared.save(id).await
    }

    /// Update the draft without scheduling a save.
    fn modify_quietly<R>(&self, edit: impl FnOnce(&mut D) -> R) -> Option<(RecordId, R)> {
        let mut state = self.shared.state();
        let draft = state.draft.as_mut()?;
        let output = edit(draft);
        Some((draft.id().clone(), output))
    }
}
