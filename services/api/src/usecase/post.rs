use chrono::Utc;
use uuid::Uuid;

use stillwater_domain::pagination::{PageRequest, Paginated};
use stillwater_domain::post::{PostStatus, Visibility};

use crate::domain::filter::PostFilter;
use crate::domain::repository::PostRepository;
use crate::domain::types::{FlagOutcome, Post, PostStats};
use crate::error::ApiError;

// ── List / Stats ─────────────────────────────────────────────────────────────

pub struct ListPostsUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> ListPostsUseCase<R> {
    pub async fn execute(
        &self,
        filter: &PostFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Post>, ApiError> {
        self.repo.list(filter, page).await
    }
}

pub struct PostStatsUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> PostStatsUseCase<R> {
    pub async fn execute(&self) -> Result<PostStats, ApiError> {
        self.repo.stats().await
    }
}

// ── Get ──────────────────────────────────────────────────────────────────────

/// Admin lookup; soft-deleted posts are still returned.
pub struct GetPostUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> GetPostUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Post, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::PostNotFound)
    }
}

/// App lookup; hides posts the viewer may not see.
pub struct GetVisiblePostUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> GetVisiblePostUseCase<R> {
    pub async fn execute(&self, id: Uuid, viewer: Uuid) -> Result<Post, ApiError> {
        visible_post(&self.repo, id, viewer).await
    }
}

async fn visible_post<R: PostRepository>(repo: &R, id: Uuid, viewer: Uuid) -> Result<Post, ApiError> {
    repo.find_by_id(id)
        .await?
        .filter(|p| p.visible_to(viewer))
        .ok_or(ApiError::PostNotFound)
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub visibility: Option<Visibility>,
}

pub struct CreatePostUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> CreatePostUseCase<R> {
    /// New posts wait for moderation.
    pub async fn execute(&self, user_id: Uuid, input: CreatePostInput) -> Result<Post, ApiError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ApiError::validation("title is required"));
        }
        let content = input.content.trim();
        if content.is_empty() {
            return Err(ApiError::validation("content is required"));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            user_id,
            title: title.to_owned(),
            content: content.to_owned(),
            image_url: input.image_url.filter(|u| !u.trim().is_empty()),
            status: PostStatus::Pending,
            visibility: input.visibility.unwrap_or_default(),
            flag_count: 0,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&post).await?;
        Ok(post)
    }
}

// ── Moderation ───────────────────────────────────────────────────────────────

pub struct SetPostStatusUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> SetPostStatusUseCase<R> {
    pub async fn execute(&self, id: Uuid, status: PostStatus) -> Result<Post, ApiError> {
        self.repo
            .set_status(id, status)
            .await?
            .ok_or(ApiError::PostNotFound)
    }
}

pub struct DeletePostUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> DeletePostUseCase<R> {
    /// Admin soft delete.
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.soft_delete(id, Utc::now()).await? {
            return Err(ApiError::PostNotFound);
        }
        Ok(())
    }

    /// Owner soft delete. Other users get `Forbidden`.
    pub async fn execute_as_owner(&self, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let post = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|p| !p.is_deleted())
            .ok_or(ApiError::PostNotFound)?;
        if post.user_id != user_id {
            return Err(ApiError::Forbidden);
        }
        self.execute(id).await
    }
}

// ── Flag ─────────────────────────────────────────────────────────────────────

pub struct FlagPostUseCase<R: PostRepository> {
    pub repo: R,
}

impl<R: PostRepository> FlagPostUseCase<R> {
    /// Returns the post's new flag count.
    pub async fn execute(&self, id: Uuid, user_id: Uuid) -> Result<i32, ApiError> {
        visible_post(&self.repo, id, user_id).await?;
        match self.repo.flag(id, user_id).await? {
            FlagOutcome::Flagged { flag_count } => Ok(flag_count),
            FlagOutcome::AlreadyFlagged => Err(ApiError::AlreadyFlagged),
        }
    }
}
