use super::{ConsoleClient, Mutation, decode, json_request};
use crate::cache::{QueryKey, QuerySpec, ResourceKind, list_tags};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, FormPart};
use folio_core::API_PREFIX;
use folio_core::media::UploadedImage;
use folio_core::tag::{TagRequest, normalize_tag_name};
use folio_core::{Page, RecordId, Tag};
use serde::Deserialize;

pub const TAGS_ENDPOINT: &str = "getTags";

/// The tags endpoint answers with either a bare array or a page.
#[derive(Deserialize)]
#[serde(untagged)]
enum TagList {
    Bare(Vec<Tag>),
    Paged(Page<Tag>),
}

impl ConsoleClient {
    /// Upload an image, optionally attaching it to an article.
    pub async fn upload_image(
        &self,
        article_id: Option<&RecordId>,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> ApiResult<UploadedImage> {
        let mut parts = vec![FormPart::File {
            name: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes,
        }];
        if let Some(id) = article_id {
            parts.push(FormPart::Text {
                name: "article_id".to_string(),
                value: id.to_string(),
            });
        }
        let request = ApiRequest::post(format!("{API_PREFIX}/images")).with_multipart(parts);
        decode(self.mutate(Mutation::new(request)).await?)
    }

    pub async fn delete_image(&self, id: &RecordId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("{API_PREFIX}/images/{id}"));
        self.mutate(Mutation::new(request).invalidates([
            ResourceKind::Images.item(id),
            ResourceKind::Images.list(),
        ]))
        .await
        .map(|_| ())
    }

    pub fn tags_query(&self) -> QuerySpec {
        self.query_spec(
            QueryKey::bare(TAGS_ENDPOINT),
            ApiRequest::get(format!("{API_PREFIX}/tags")),
            |payload| list_tags(ResourceKind::Tags, payload),
        )
    }

    pub async fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        Ok(match self.fetch::<TagList>(self.tags_query()).await? {
            TagList::Bare(tags) => tags,
            TagList::Paged(page) => page.items,
        })
    }

    /// Create a tag. The name is normalized and checked before sending.
    pub async fn create_tag(&self, name: &str) -> ApiResult<Tag> {
        let name = normalize_tag_name(name)?;
        let request = json_request(
            ApiRequest::post(format!("{API_PREFIX}/tags")),
            &TagRequest { name },
        )?;
        let payload = self
            .mutate(Mutation::new(request).invalidates([ResourceKind::Tags.list()]))
            .await?;
        decode(payload)
    }

    pub async fn rename_tag(&self, id: &RecordId, name: &str) -> ApiResult<Tag> {
        let name = normalize_tag_name(name)?;
        let request = json_request(
            ApiRequest::put(format!("{API_PREFIX}/tags/{id}")),
            &TagRequest { name },
        )?;
        let payload = self
            .mutate(Mutation::new(request).invalidates([ResourceKind::Tags.list()]))
            .await?;
        decode(payload)
    }

    pub async fn delete_tag(&self, id: &RecordId) -> ApiResult<()> {
        let request = ApiRequest::delete(format!("{API_PREFIX}/tags/{id}"));
        self.mutate(Mutation::new(request).invalidates([ResourceKind::Tags.list()]))
            .await
            .map(|_| ())
    }
}
