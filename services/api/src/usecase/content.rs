use chrono::{DateTime, Utc};
use uuid::Uuid;

use stillwater_domain::content::ContentKind;
use stillwater_domain::pagination::{PageRequest, Paginated};
use stillwater_domain::query::Period;

use crate::domain::filter::ContentFilter;
use crate::domain::repository::ContentRepository;
use crate::domain::types::{ContentItem, ContentPatch};
use crate::error::ApiError;

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

fn require_body(body: &str) -> Result<String, ApiError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ApiError::validation("body is required"));
    }
    Ok(body.to_owned())
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListContentUseCase<R: ContentRepository> {
    pub repo: R,
}

impl<R: ContentRepository> ListContentUseCase<R> {
    pub async fn execute(
        &self,
        filter: &ContentFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<ContentItem>, ApiError> {
        self.repo.list(filter, page).await
    }
}

pub struct GetContentUseCase<R: ContentRepository> {
    pub repo: R,
}

impl<R: ContentRepository> GetContentUseCase<R> {
    pub async fn execute(&self, kind: ContentKind, id: Uuid) -> Result<ContentItem, ApiError> {
        self.repo
            .find_by_id(kind, id)
            .await?
            .ok_or(ApiError::ContentNotFound)
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CreateContentInput {
    pub title: Option<String>,
    pub body: String,
    pub author: Option<String>,
    pub media_url: Option<String>,
    pub tags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_published: Option<bool>,
    pub order_index: Option<i32>,
}

pub struct CreateContentUseCase<R: ContentRepository> {
    pub repo: R,
}

impl<R: ContentRepository> CreateContentUseCase<R> {
    pub async fn execute(
        &self,
        kind: ContentKind,
        input: CreateContentInput,
    ) -> Result<ContentItem, ApiError> {
        let now = Utc::now();
        let item = ContentItem {
            id: Uuid::now_v7(),
            kind,
            title: input.title.filter(|t| !t.trim().is_empty()),
            body: require_body(&input.body)?,
            author: input.author.filter(|a| !a.trim().is_empty()),
            media_url: input.media_url.filter(|u| !u.trim().is_empty()),
            tags: clean_tags(input.tags),
            scheduled_at: input.scheduled_at,
            is_active: input.is_active.unwrap_or(true),
            is_archived: input.is_archived.unwrap_or(false),
            is_published: input.is_published.unwrap_or(true),
            order_index: input.order_index.unwrap_or(0),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&item).await?;
        Ok(item)
    }
}

// ── Update / Delete ──────────────────────────────────────────────────────────

pub struct UpdateContentUseCase<R: ContentRepository> {
    pub repo: R,
}

impl<R: ContentRepository> UpdateContentUseCase<R> {
    pub async fn execute(
        &self,
        kind: ContentKind,
        id: Uuid,
        mut patch: ContentPatch,
    ) -> Result<ContentItem, ApiError> {
        if let Some(body) = patch.body.as_deref() {
            patch.body = Some(require_body(body)?);
        }
        if let Some(tags) = patch.tags.take() {
            patch.tags = Some(clean_tags(tags));
        }
        self.repo
            .update(kind, id, &patch)
            .await?
            .ok_or(ApiError::ContentNotFound)
    }
}

pub struct DeleteContentUseCase<R: ContentRepository> {
    pub repo: R,
}

impl<R: ContentRepository> DeleteContentUseCase<R> {
    pub async fn execute(&self, kind: ContentKind, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.delete(kind, id).await? {
            return Err(ApiError::ContentNotFound);
        }
        Ok(())
    }
}

// ── Daily / weekly affirmation ───────────────────────────────────────────────

pub struct CurrentAffirmationUseCase<R: ContentRepository> {
    pub repo: R,
}

impl<R: ContentRepository> CurrentAffirmationUseCase<R> {
    /// Today's affirmation, or this week's for [`Period::ThisWeek`].
    pub async fn execute(&self, period: Period, now: DateTime<Utc>) -> Result<ContentItem, ApiError> {
        let kind = match period {
            Period::Today => ContentKind::Affirmation,
            Period::ThisWeek => ContentKind::WeeklyAffirmation,
        };
        self.repo
            .current(kind, period.window(now))
            .await?
            .ok_or(ApiError::NoAffirmation)
    }
}
