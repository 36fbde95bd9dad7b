#![allow(async_fn_in_trait)]

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use stillwater_domain::answer::{EmbeddedAnswer, QuestionKind};
use stillwater_domain::content::ContentKind;
use stillwater_domain::pagination::{PageRequest, Paginated};
use stillwater_domain::post::PostStatus;
use stillwater_domain::query::Window;

use crate::domain::filter::{
    ContentFilter, NotificationFilter, PostFilter, QuestionFilter, UserFilter,
};
use crate::domain::types::{
    Admin, AnswerSet, AppUser, AppUserPatch, CodePurpose, ContentItem, ContentPatch, Credential,
    FlagOutcome, NewAdmin, NewAppUser, Notification, NotificationPatch, OneTimeCode, OutboxEvent,
    Post, PostStats, Question, QuestionPatch, SocialIdentity, SocialProvider,
};
use crate::error::ApiError;

/// Password credentials of one principal kind.
///
/// Implemented by both the admin and the app-user repositories so login and
/// password reset are written once.
pub trait CredentialStore: Send + Sync {
    /// Purpose used for this principal kind's one-time codes.
    fn purpose(&self) -> CodePurpose;

    async fn find_credential(&self, email: &str) -> Result<Option<Credential>, ApiError>;

    /// Returns `false` if the principal no longer exists.
    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, ApiError>;
}

pub trait AdminRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError>;
    async fn count(&self) -> Result<u64, ApiError>;
    /// Fails with `EmailTaken` on a duplicate email.
    async fn create(&self, admin: &NewAdmin) -> Result<Admin, ApiError>;
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<Option<String>>,
        email: Option<String>,
    ) -> Result<Option<Admin>, ApiError>;
}

pub trait AppUserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AppUser>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, ApiError>;
    async fn find_by_provider(
        &self,
        provider: SocialProvider,
        subject: &str,
    ) -> Result<Option<AppUser>, ApiError>;
    /// Fails with `EmailTaken` on a duplicate email.
    async fn create(&self, user: &NewAppUser) -> Result<AppUser, ApiError>;
    async fn link_provider(
        &self,
        id: Uuid,
        identity: &SocialIdentity,
    ) -> Result<Option<AppUser>, ApiError>;
    async fn update_profile(
        &self,
        id: Uuid,
        patch: &AppUserPatch,
    ) -> Result<Option<AppUser>, ApiError>;
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<AppUser>, ApiError>;
    async fn list(
        &self,
        filter: &UserFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<AppUser>, ApiError>;
    /// Replace the user's onboarding answer collection.
    async fn save_onboarding_answers(
        &self,
        id: Uuid,
        answers: &[EmbeddedAnswer],
    ) -> Result<(), ApiError>;
    /// Replace the check-in collection and update the streak in one write.
    async fn save_checkin(
        &self,
        id: Uuid,
        answers: &[EmbeddedAnswer],
        streak: i32,
        checkin_date: NaiveDate,
    ) -> Result<(), ApiError>;
    /// Identity plus one answer collection, for every user or just one.
    async fn load_answer_sets(
        &self,
        kind: QuestionKind,
        user_id: Option<Uuid>,
    ) -> Result<Vec<AnswerSet>, ApiError>;
    async fn active_user_ids(&self) -> Result<Vec<Uuid>, ApiError>;
}

pub trait OneTimeCodeRepository: Send + Sync {
    /// Delete every earlier code for the same (email, purpose) and insert
    /// `code`, in one transaction.
    async fn replace(&self, code: &OneTimeCode) -> Result<(), ApiError>;
    async fn find_valid(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, ApiError>;
    /// Mark the code consumed. Returns `false` if it already was.
    async fn consume(&self, id: Uuid) -> Result<bool, ApiError>;
    /// Count a wrong guess against the live code for (email, purpose) and
    /// delete it once it reaches `max_attempts`. Returns `true` if revoked.
    async fn record_miss(
        &self,
        email: &str,
        purpose: CodePurpose,
        max_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError>;
}

pub trait QuestionRepository: Send + Sync {
    async fn list(
        &self,
        filter: &QuestionFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Question>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>, ApiError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Question>, ApiError>;
    async fn max_order(&self, kind: QuestionKind) -> Result<Option<i32>, ApiError>;
    async fn create(&self, question: &Question) -> Result<(), ApiError>;
    async fn update(&self, id: Uuid, patch: &QuestionPatch)
    -> Result<Option<Question>, ApiError>;
    async fn set_order(&self, id: Uuid, order: i32) -> Result<bool, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

pub trait ContentRepository: Send + Sync {
    async fn list(
        &self,
        filter: &ContentFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<ContentItem>, ApiError>;
    async fn find_by_id(&self, kind: ContentKind, id: Uuid)
    -> Result<Option<ContentItem>, ApiError>;
    async fn create(&self, item: &ContentItem) -> Result<(), ApiError>;
    async fn update(
        &self,
        kind: ContentKind,
        id: Uuid,
        patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, ApiError>;
    async fn delete(&self, kind: ContentKind, id: Uuid) -> Result<bool, ApiError>;
    /// The visible item of `kind` scheduled inside `window`, or unscheduled.
    async fn current(
        &self,
        kind: ContentKind,
        window: Window,
    ) -> Result<Option<ContentItem>, ApiError>;
}

pub trait PostRepository: Send + Sync {
    /// Never includes soft-deleted posts.
    async fn list(
        &self,
        filter: &PostFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Post>, ApiError>;
    async fn stats(&self) -> Result<PostStats, ApiError>;
    /// Direct lookup, soft-deleted posts included.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, ApiError>;
    async fn create(&self, post: &Post) -> Result<(), ApiError>;
    async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<Option<Post>, ApiError>;
    /// Returns `false` if the post is missing or already deleted.
    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, ApiError>;
    /// Record a flag by `user_id`, incrementing `flag_count` only for a new flag.
    async fn flag(&self, post_id: Uuid, user_id: Uuid) -> Result<FlagOutcome, ApiError>;
}

pub trait NotificationRepository: Send + Sync {
    async fn list(
        &self,
        filter: &NotificationFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Notification>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, ApiError>;
    async fn create(&self, notification: &Notification) -> Result<(), ApiError>;
    async fn update(
        &self,
        id: Uuid,
        patch: &NotificationPatch,
    ) -> Result<Option<Notification>, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
    /// Mark sent and enqueue `event` in one transaction.
    /// Returns `false` if the notification was already sent.
    async fn mark_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<bool, ApiError>;
    /// Scheduled notifications whose time has come.
    async fn due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Notification>, ApiError>;
}

// ── Ports ────────────────────────────────────────────────────────────────────

/// Delivers one-time codes by email.
pub trait OtpMailer: Send + Sync {
    /// Returns `false` if the transport refused the message.
    async fn send(&self, email: &str, code: &str, purpose: CodePurpose) -> Result<bool, ApiError>;
}

pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key` and return its public URL.
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> Result<String, ApiError>;
}

pub trait IdTokenVerifier: Send + Sync {
    async fn verify(
        &self,
        provider: SocialProvider,
        id_token: &str,
    ) -> Result<SocialIdentity, ApiError>;
}
