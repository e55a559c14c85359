use super::{Draft, EditorSession};
use crate::api::ConsoleClient;
use crate::error::ApiResult;
use folio_core::file_record::{parse_metadata, sanitize_links};
use folio_core::{FileLink, FileRecord, FileRecordUpdate, RecordId, ValidationError, to_slug};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

/// Editable copy of a linked-file record.
///
/// Metadata is edited as text. The last text that parsed is kept in
/// `metadata`; while the text is invalid every save is suppressed.
#[derive(Clone, Debug, PartialEq)]
pub struct FileDraft {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub links: Vec<FileLink>,
    pub is_published: bool,
    metadata_text: String,
    metadata: Value,
    metadata_error: Option<ValidationError>,
}

impl FileDraft {
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            slug: record.slug.clone(),
            description: record.description.clone(),
            links: record.initial_links(),
            is_published: record.is_published,
            metadata_text: record.metadata_text(),
            metadata: record.metadata.clone(),
            metadata_error: None,
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.slug = to_slug(title);
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.slug = to_slug(slug);
    }

    pub fn metadata_text(&self) -> &str {
        &self.metadata_text
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn metadata_error(&self) -> Option<&ValidationError> {
        self.metadata_error.as_ref()
    }

    /// Replace the metadata text, re-validating it.
    pub fn set_metadata_text(&mut self, text: &str) {
        self.metadata_text = text.to_string();
        match parse_metadata(text) {
            Ok(value) => {
                self.metadata = value;
                self.metadata_error = None;
            }
            Err(e) => self.metadata_error = Some(e),
        }
    }

    pub fn add_link(&mut self) {
        self.links.push(FileLink::default());
    }

    pub fn remove_link(&mut self, index: usize) -> Option<FileLink> {
        (index < self.links.len()).then(|| self.links.remove(index))
    }

    /// Move a link one position up (`-1`) or down (`1`).
    pub fn move_link(&mut self, index: usize, direction: isize) -> bool {
        let Some(target) = index.checked_add_signed(direction) else {
            return false;
        };
        if index >= self.links.len() || target >= self.links.len() {
            return false;
        }
        self.links.swap(index, target);
        true
    }
}

impl Draft for FileDraft {
    type Record = FileRecord;
    type Update = FileRecordUpdate;

    fn seed(record: &FileRecord) -> Self {
        Self::from_record(record)
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_update(&self) -> Result<FileRecordUpdate, ValidationError> {
        if let Some(e) = &self.metadata_error {
            return Err(e.clone());
        }
        Ok(FileRecordUpdate {
            title: self.title.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            links: sanitize_links(&self.links)?,
            metadata: self.metadata.clone(),
        })
    }

    fn save(
        client: &ConsoleClient,
        id: RecordId,
        update: FileRecordUpdate,
    ) -> BoxFuture<'static, ApiResult<Value>> {
        let client = client.clone();
        async move { client.update_file(&id, &update).await }.boxed()
    }
}

impl EditorSession<FileDraft> {
    /// Flip visibility through the optimistic publish mutation, without
    /// scheduling an autosave.
    pub async fn toggle_published(&mut self) -> Option<ApiResult<Value>> {
        let (id, next) = self.modify_quietly(|draft| {
            draft.is_published = !draft.is_published;
            draft.is_published
        })?;
        debug!(id = %id, is_published = next, "toggling file visibility");

        let result = self.client().set_file_published(&id, next).await;
        if result.is_err() && self.shared.is_selected(&id) {
            self.modify_quietly(|draft| {
                if draft.is_published == next {
                    draft.is_published = !next;
                }
            });
        }
        Some(result)
    }
}
