//! JSON shapes returned by both route trees.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use stillwater_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use stillwater_domain::answer::{AnswerValue, EmbeddedAnswer, QuestionKind, QuestionType};
use stillwater_domain::content::ContentKind;
use stillwater_domain::notification::{NotificationStatus, NotificationTarget};
use stillwater_domain::post::{PostStatus, Visibility};

use crate::domain::types::{
    Admin, AppUser, ContentItem, Notification, Post, Principal, Question, Submission,
};

// ── Principals ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminView {
    fn from(a: Admin) -> Self {
        Self {
            id: a.id,
            email: a.email,
            name: a.name,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppUserView {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub has_password: bool,
    /// Linked sign-in providers, e.g. `["google"]`.
    pub providers: Vec<&'static str>,
    pub is_active: bool,
    pub streak: i32,
    pub last_checkin_date: Option<NaiveDate>,
    pub device_sync: Option<Value>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<AppUser> for AppUserView {
    fn from(u: AppUser) -> Self {
        let mut providers = Vec::new();
        if u.google_id.is_some() {
            providers.push("google");
        }
        if u.apple_id.is_some() {
            providers.push("apple");
        }
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            has_password: u.has_password,
            providers,
            is_active: u.is_active,
            streak: u.streak,
            last_checkin_date: u.last_checkin_date,
            device_sync: u.device_sync,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", content = "principal", rename_all = "snake_case")]
pub enum PrincipalView {
    Admin(AdminView),
    User(AppUserView),
}

impl From<Principal> for PrincipalView {
    fn from(p: Principal) -> Self {
        match p {
            Principal::Admin(a) => Self::Admin(a.into()),
            Principal::User(u) => Self::User(u.into()),
        }
    }
}

// ── Questions ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub kind: QuestionKind,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub order: i32,
    pub is_active: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionView {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            kind: q.kind,
            title: q.title,
            question_type: q.question_type,
            options: q.options,
            order: q.order,
            is_active: q.is_active,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

// ── Content ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ContentView {
    pub id: Uuid,
    pub kind: ContentKind,
    pub title: Option<String>,
    pub body: String,
    pub author: Option<String>,
    pub media_url: Option<String>,
    pub tags: Vec<String>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_archived: bool,
    pub is_published: bool,
    pub order_index: i32,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<ContentItem> for ContentView {
    fn from(c: ContentItem) -> Self {
        Self {
            id: c.id,
            kind: c.kind,
            title: c.title,
            body: c.body,
            author: c.author,
            media_url: c.media_url,
            tags: c.tags,
            scheduled_at: c.scheduled_at,
            is_active: c.is_active,
            is_archived: c.is_archived,
            is_published: c.is_published,
            order_index: c.order_index,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

// ── Posts ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub visibility: Visibility,
    pub flag_count: i32,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostView {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            title: p.title,
            content: p.content,
            image_url: p.image_url,
            status: p.status,
            visibility: p.visibility,
            flag_count: p.flag_count,
            deleted_at: p.deleted_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── Notifications ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct NotificationView {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub target: NotificationTarget,
    pub target_user_ids: Vec<Uuid>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: NotificationStatus,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Notification> for NotificationView {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            target: n.target,
            target_user_ids: n.target_user_ids,
            scheduled_at: n.scheduled_at,
            status: n.status,
            sent_at: n.sent_at,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

/// What an end-user sees in their inbox; recipient lists stay private.
#[derive(Debug, Serialize)]
pub struct InboxItemView {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<Notification> for InboxItemView {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            sent_at: n.sent_at,
        }
    }
}

// ── Answers ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub question_id: Uuid,
    pub answer: AnswerValue,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub answered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkin_date: Option<NaiveDate>,
}

impl From<EmbeddedAnswer> for AnswerView {
    fn from(a: EmbeddedAnswer) -> Self {
        Self {
            question_id: a.question_id,
            answer: a.value,
            answered_at: a.answered_at,
            checkin_date: a.checkin_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionView {
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub user_email: String,
    pub question_id: Uuid,
    pub question_title: String,
    /// `"unknown"` once the question has been deleted.
    pub question_type: &'static str,
    pub answer: AnswerValue,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub answered_at: DateTime<Utc>,
    pub checkin_date: Option<NaiveDate>,
}

impl From<Submission> for SubmissionView {
    fn from(s: Submission) -> Self {
        Self {
            user_id: s.row.user_id,
            user_name: s.row.user_name,
            user_email: s.row.user_email,
            question_id: s.row.question_id,
            question_title: s.question_title,
            question_type: s.question_type.map_or("unknown", QuestionType::as_str),
            answer: s.row.value,
            answered_at: s.row.answered_at,
            checkin_date: s.row.checkin_date,
        }
    }
}
