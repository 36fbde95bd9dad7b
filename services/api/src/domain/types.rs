use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use stillwater_domain::answer::{AnswerValue, EmbeddedAnswer, QuestionKind, QuestionType};
use stillwater_domain::content::ContentKind;
use stillwater_domain::notification::{NotificationStatus, NotificationTarget};
use stillwater_domain::post::{PostStatus, Visibility};

/// One-time codes expire 10 minutes after issue.
pub const OTP_TTL_SECS: i64 = 600;
pub const OTP_LEN: usize = 6;
/// Wrong guesses a live code survives before it is revoked.
pub const OTP_MAX_ATTEMPTS: i32 = 5;
pub const MIN_PASSWORD_LEN: usize = 8;

// ── Principals ───────────────────────────────────────────────────────────────

/// Dashboard administrator, without the password hash.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

/// Mobile-app user, without the password hash or embedded answers.
#[derive(Debug, Clone)]
pub struct AppUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub google_id: Option<String>,
    pub apple_id: Option<String>,
    pub has_password: bool,
    pub is_active: bool,
    pub streak: i32,
    pub last_checkin_date: Option<NaiveDate>,
    pub device_sync: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAppUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub apple_id: Option<String>,
}

/// Profile fields an end-user may change. `Some(None)` clears a field.
#[derive(Debug, Clone, Default)]
pub struct AppUserPatch {
    pub name: Option<Option<String>>,
    pub device_sync: Option<Option<Value>>,
}

/// Email and password hash of either principal kind.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: Uuid,
    pub email: String,
    /// `None` for end-users created by social login.
    pub password_hash: Option<String>,
}

/// A resolved caller of an `AnyAuth` route.
#[derive(Debug, Clone)]
pub enum Principal {
    Admin(Admin),
    User(AppUser),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::Admin(a) => a.id,
            Principal::User(u) => u.id,
        }
    }
}

// ── One-time codes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Admin,
    User,
}

impl CodePurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OneTimeCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub purpose: CodePurpose,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && self.expires_at > now
    }
}

// ── Questions ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Question {
    pub id: Uuid,
    pub kind: QuestionKind,
    pub title: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    pub kind: Option<QuestionKind>,
    pub title: Option<String>,
    pub question_type: Option<QuestionType>,
    pub options: Option<Vec<String>>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

// ── Content ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ContentItem {
    pub id: Uuid,
    pub kind: ContentKind,
    pub title: Option<String>,
    pub body: String,
    pub author: Option<String>,
    pub media_url: Option<String>,
    pub tags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_archived: bool,
    pub is_published: bool,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial content update. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
    pub title: Option<Option<String>>,
    pub body: Option<String>,
    pub author: Option<Option<String>>,
    pub media_url: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_published: Option<bool>,
    pub order_index: Option<i32>,
}

// ── Posts ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub visibility: Visibility,
    pub flag_count: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether `viewer` may see this post in the app.
    pub fn visible_to(&self, viewer: Uuid) -> bool {
        if self.is_deleted() {
            return false;
        }
        self.user_id == viewer
            || (self.status == PostStatus::Approved && self.visibility == Visibility::Public)
    }
}

/// Per-status counts over non-deleted posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub flagged: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged { flag_count: i32 },
    AlreadyFlagged,
}

// ── Notifications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub target: NotificationTarget,
    pub target_user_ids: Vec<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: NotificationStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationPatch {
    pub title: Option<String>,
    pub message: Option<String>,
    pub target: Option<NotificationTarget>,
    pub target_user_ids: Option<Vec<Uuid>>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub status: Option<NotificationStatus>,
}

/// Event handed to the delivery workers through the outbox table.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: Value,
    pub idempotency_key: String,
}

// ── Submissions ──────────────────────────────────────────────────────────────

/// A user's identity plus one of their embedded answer collections.
#[derive(Debug, Clone)]
pub struct AnswerSet {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub answers: Vec<EmbeddedAnswer>,
}

/// One (user × answer) pair after flattening.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRow {
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub user_email: String,
    pub question_id: Uuid,
    pub value: AnswerValue,
    pub answered_at: DateTime<Utc>,
    pub checkin_date: Option<NaiveDate>,
}

/// A submission row with the question's title and type attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub row: SubmissionRow,
    pub question_title: String,
    /// `None` when the question has since been deleted.
    pub question_type: Option<QuestionType>,
}

// ── Social login ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Apple,
}

impl SocialProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Apple => "apple",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "google" => Some(Self::Google),
            "apple" => Some(Self::Apple),
            _ => None,
        }
    }
}

/// Verified claims from a provider id token.
#[derive(Debug, Clone)]
pub struct SocialIdentity {
    pub provider: SocialProvider,
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}
