use super::{ConsoleClient, Mutation, item_key, json_request};
use crate::cache::{QueryKey, QuerySpec, ResourceKind, ResourceTag, TagScope, list_tags};
use crate::error::ApiResult;
use crate::transport::ApiRequest;
use folio_core::API_PREFIX;
use folio_core::article::{CreateArticleRequest, StatusChange};
use folio_core::{Article, ArticleFilters, ArticleStats, ArticleStatus, ArticleUpdate, ListFilters, Page, RecordId};
use serde_json::{Value, json};

pub const LIST_ENDPOINT: &str = "getArticles";
pub const ITEM_ENDPOINT: &str = "getArticleById";
pub const STATS_ENDPOINT: &str = "getArticleStats";

fn articles_path() -> String {
    format!("{API_PREFIX}/articles")
}

fn article_path(id: &RecordId) -> String {
    format!("{API_PREFIX}/articles/{id}")
}

/// Tags made stale by any write to article `id`.
fn article_write_tags(id: Option<&RecordId>) -> Vec<ResourceTag> {
    let mut tags = vec![
        ResourceKind::Articles.list(),
        ResourceTag::Articles(TagScope::Stats),
    ];
    if let Some(id) = id {
        tags.push(ResourceKind::Articles.item(id));
    }
    tags
}

impl ConsoleClient {
    pub fn articles_query(&self, filters: &ArticleFilters) -> QuerySpec {
        let pairs = filters.query_pairs();
        self.query_spec(
            QueryKey::from_pairs(LIST_ENDPOINT, &pairs),
            ApiRequest::get(articles_path()).with_query(pairs),
            |payload| list_tags(ResourceKind::Articles, payload),
        )
    }

    pub async fn list_articles(&self, filters: &ArticleFilters) -> ApiResult<Page<Article>> {
        self.fetch(self.articles_query(filters)).await
    }

    pub fn article_key(&self, id: &RecordId) -> QueryKey {
        item_key(ITEM_ENDPOINT, id)
    }

    pub fn article_query(&self, id: &RecordId) -> QuerySpec {
        let tag = ResourceKind::Articles.item(id);
        self.query_spec(
            self.article_key(id),
            ApiRequest::get(article_path(id)),
            move |_| vec![tag.clone()],
        )
    }

    pub async fn get_article(&self, id: &RecordId) -> ApiResult<Article> {
        self.fetch(self.article_query(id)).await
    }

    pub fn article_stats_query(&self) -> QuerySpec {
        self.query_spec(
            QueryKey::bare(STATS_ENDPOINT),
            ApiRequest::get(format!("{API_PREFIX}/articles/stats")),
            |_| vec![ResourceTag::Articles(TagScope::Stats)],
        )
    }

    pub async fn article_stats(&self) -> ApiResult<ArticleStats> {
        self.fetch(self.article_stats_query()).await
    }

    pub async fn create_article(&self, body: &CreateArticleRequest) -> ApiResult<Article> {
        let request = json_request(ApiRequest::post(articles_path()), body)?;
        let payload = self
            .mutate(Mutation::new(request).invalidates(article_write_tags(None)))
            .await?;
        super::decode(payload)
    }

    pub async fn update_article(&self, id: &RecordId, body: &ArticleUpdate) -> ApiResult<Value> {
        let request = json_request(ApiRequest::put(article_path(id)), body)?;
        self.mutate(Mutation::new(request).invalidates(article_write_tags(Some(id))))
            .await
    }

    /// Publish or unpublish. The cached record shows the new status at once
    /// and reverts if the server rejects the change.
    pub async fn change_article_status(
        &self,
        id: &RecordId,
        status: ArticleStatus,
    ) -> ApiResult<Value> {
        let request = json_request(
            ApiRequest::patch(format!("{API_PREFIX}/articles/{id}/status")),
            &StatusChange { status },
        )?;
        let mutation = Mutation::new(request)
            .invalidates(article_write_tags(Some(id)))
            .optimistic(self.article_key(id), move |article| {
                if let Some(fields) = article.as_object_mut() {
                    fields.insert("status".to_string(), json!(status.as_str()));
                }
            });
        self.mutate(mutation).await
    }

    pub async fn delete_article(&self, id: &RecordId) -> ApiResult<()> {
        self.mutate(
            Mutation::new(ApiRequest::delete(article_path(id)))
                .invalidates(article_write_tags(Some(id))),
        )
        .await
        .map(|_| ())
    }
}
