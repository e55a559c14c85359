use super::{Draft, EditorSession};
use crate::api::ConsoleClient;
use crate::error::ApiResult;
use folio_core::tag::{add_tag, normalize_tag_name, remove_tag};
use folio_core::{Article, ArticleSource, ArticleStatus, ArticleUpdate, RecordId, ValidationError, to_slug};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

/// Editable copy of an article.
#[derive(Clone, Debug, PartialEq)]
pub struct ArticleDraft {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub summary: String,
    pub content: String,
    pub external_link: String,
    pub source: ArticleSource,
    pub tags: Vec<String>,
    pub image_ids: Vec<RecordId>,
    pub hero_image_id: Option<RecordId>,
    pub status: ArticleStatus,
}

impl ArticleDraft {
    pub fn from_article(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            slug: article.slug.clone(),
            author: article.author.clone(),
            summary: article.summary.clone(),
            content: article.content.clone().unwrap_or_default(),
            external_link: article.external_link.clone().unwrap_or_default(),
            source: article.source_mode(),
            tags: article.tags.clone(),
            image_ids: article.image_ids.clone(),
            hero_image_id: article.hero_image_id.clone(),
            status: article.status,
        }
    }

    /// Set the title and derive the slug from it.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.slug = to_slug(title);
    }

    /// Set the slug, normalized to its URL-safe form.
    pub fn set_slug(&mut self, slug: &str) {
        self.slug = to_slug(slug);
    }

    pub fn add_tag(&mut self, raw: &str) -> Result<bool, ValidationError> {
        add_tag(&mut self.tags, raw)
    }

    pub fn remove_tag(&mut self, name: &str) -> bool {
        remove_tag(&mut self.tags, name)
    }

    /// Replace the attached images. The hero must be one of them.
    pub fn set_images(&mut self, image_ids: Vec<RecordId>, hero: Option<RecordId>) {
        self.hero_image_id = hero.filter(|h| image_ids.contains(h));
        self.image_ids = image_ids;
    }
}

impl Draft for ArticleDraft {
    type Record = Article;
    type Update = ArticleUpdate;

    fn seed(record: &Article) -> Self {
        Self::from_article(record)
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    /// Only the body field of the current source mode is sent.
    fn to_update(&self) -> Result<ArticleUpdate, ValidationError> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let name = normalize_tag_name(tag)?;
            if !tags.iter().any(|t| t.eq_ignore_ascii_case(&name)) {
                tags.push(name);
            }
        }
        let (content, external_link) = match self.source {
            ArticleSource::Inline => (Some(self.content.clone()), None),
            ArticleSource::Drive => {
                let link = self.external_link.trim();
                (None, (!link.is_empty()).then(|| link.to_string()))
            }
        };
        Ok(ArticleUpdate {
            title: self.title.clone(),
            slug: self.slug.clone(),
            author: self.author.clone(),
            summary: self.summary.clone(),
            content,
            status: self.status,
            tags,
            image_ids: self.image_ids.clone(),
            hero_image_id: self.hero_image_id.clone(),
            source: self.source,
            external_link,
        })
    }

    fn save(
        client: &ConsoleClient,
        id: RecordId,
        update: ArticleUpdate,
    ) -> BoxFuture<'static, ApiResult<Value>> {
        let client = client.clone();
        async move { client.update_article(&id, &update).await }.boxed()
    }
}

impl EditorSession<ArticleDraft> {
    /// Flip publish state through the optimistic status mutation.
    ///
    /// The draft follows immediately and no autosave is scheduled. If the
    /// server rejects the change the draft's status is put back.
    pub async fn toggle_status(&mut self) -> Option<ApiResult<Value>> {
        let (id, (previous, next)) = self.modify_quietly(|draft| {
            let previous = draft.status;
            draft.status = previous.toggled();
            (previous, draft.status)
        })?;
        debug!(id = %id, from = %previous, to = %next, "toggling article status");

        let result = self.client().change_article_status(&id, next).await;
        if result.is_err() && self.shared.is_selected(&id) {
            self.modify_quietly(|draft| {
                if draft.status == next {
                    draft.status = previous;
                }
            });
        }
        Some(result)
    }
}
