use super::{ConsoleClient, Mutation, item_key, json_request};
use crate::cache::{QueryKey, QuerySpec, ResourceKind, ResourceTag, list_tags};
use crate::error::ApiResult;
use crate::transport::ApiRequest;
use folio_core::API_PREFIX;
use folio_core::file_record::{CreateFileRecordRequest, PublishChange};
use folio_core::{FileFilters, FileRecord, FileRecordUpdate, ListFilters, Page, RecordId};
use serde_json::{Value, json};

pub const LIST_ENDPOINT: &str = "getPublicFiles";
pub const ITEM_ENDPOINT: &str = "getPublicFileById";

fn files_path() -> String {
    format!("{API_PREFIX}/public-files")
}

fn file_path(id: &RecordId) -> String {
    format!("{API_PREFIX}/public-files/{id}")
}

fn file_write_tags(id: &RecordId) -> [ResourceTag; 2] {
    [
        ResourceKind::PublicFiles.list(),
        ResourceKind::PublicFiles.item(id),
    ]
}

impl ConsoleClient {
    pub fn files_query(&self, filters: &FileFilters) -> QuerySpec {
        let pairs = filters.query_pairs();
        self.query_spec(
            QueryKey::from_pairs(LIST_ENDPOINT, &pairs),
            ApiRequest::get(files_path()).with_query(pairs),
            |payload| list_tags(ResourceKind::PublicFiles, payload),
        )
    }

    pub async fn list_files(&self, filters: &FileFilters) -> ApiResult<Page<FileRecord>> {
        self.fetch(self.files_query(filters)).await
    }

    pub fn file_key(&self, id: &RecordId) -> QueryKey {
        item_key(ITEM_ENDPOINT, id)
    }

    pub fn file_query(&self, id: &RecordId) -> QuerySpec {
        let tag = ResourceKind::PublicFiles.item(id);
        self.query_spec(
            self.file_key(id),
            ApiRequest::get(file_path(id)),
            move |_| vec![tag.clone()],
        )
    }

    pub async fn get_file(&self, id: &RecordId) -> ApiResult<FileRecord> {
        self.fetch(self.file_query(id)).await
    }

    pub async fn create_file(&self, body: &CreateFileRecordRequest) -> ApiResult<FileRecord> {
        let request = json_request(ApiRequest::post(files_path()), body)?;
        let payload = self
            .mutate(Mutation::new(request).invalidates([ResourceKind::PublicFiles.list()]))
            .await?;
        super::decode(payload)
    }

    pub async fn update_file(&self, id: &RecordId, body: &FileRecordUpdate) -> ApiResult<Value> {
        let request = json_request(ApiRequest::put(file_path(id)), body)?;
        self.mutate(Mutation::new(request).invalidates(file_write_tags(id)))
            .await
    }

    /// Toggle visibility with an optimistic update of the cached record.
    pub async fn set_file_published(&self, id: &RecordId, is_published: bool) -> ApiResult<Value> {
        let request = json_request(
            ApiRequest::patch(format!("{API_PREFIX}/public-files/{id}/publish")),
            &PublishChange { is_published },
        )?;
        let mutation = Mutation::new(request)
            .invalidates(file_write_tags(id))
            .optimistic(self.file_key(id), move |record| {
                if let Some(fields) = record.as_object_mut() {
                    fields.insert("is_published".to_string(), json!(is_published));
                }
            });
        self.mutate(mutation).await
    }

    pub async fn delete_file(&self, id: &RecordId) -> ApiResult<()> {
        self.mutate(Mutation::new(ApiRequest::delete(file_path(id))).invalidates(file_write_tags(id)))
            .await
            .map(|_| ())
    }
}
