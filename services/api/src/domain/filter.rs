//! Typed per-resource list filters built from [`ListParams`].
//!
//! Filters only carry the fields a resource supports. They are compiled into
//! database conditions by the `infra` layer.

use chrono::NaiveDate;
use uuid::Uuid;

use stillwater_domain::answer::QuestionKind;
use stillwater_domain::content::ContentKind;
use stillwater_domain::notification::{NotificationStatus, NotificationTarget};
use stillwater_domain::post::{PostStatus, Visibility};
use stillwater_domain::query::{ListParams, QueryError, parse_choice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
    pub kind: ContentKind,
    pub search: Option<String>,
    pub active: Option<bool>,
    pub archived: Option<bool>,
    pub published: Option<bool>,
    pub tag: Option<String>,
    pub author: Option<String>,
}

impl ContentFilter {
    pub fn admin(kind: ContentKind, params: &ListParams) -> Result<Self, QueryError> {
        Ok(Self {
            kind,
            search: params.search(),
            active: params.active()?,
            archived: params.archived()?,
            published: params.published()?,
            tag: params.tag(),
            author: params.author(),
        })
    }

    /// App listings only ever see active, non-archived, published items.
    pub fn app(kind: ContentKind, params: &ListParams) -> Self {
        Self {
            kind,
            search: params.search(),
            active: Some(true),
            archived: Some(false),
            published: Some(true),
            tag: params.tag(),
            author: params.author(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub kind: Option<QuestionKind>,
    pub search: Option<String>,
    pub active: Option<bool>,
}

impl QuestionFilter {
    pub fn admin(params: &ListParams) -> Result<Self, QueryError> {
        Ok(Self {
            kind: parse_choice("kind", &params.kind, QuestionKind::parse)?,
            search: params.search(),
            active: params.active()?,
        })
    }

    pub fn active_of(kind: QuestionKind) -> Self {
        Self {
            kind: Some(kind),
            search: None,
            active: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: Option<String>,
    pub active: Option<bool>,
}

impl UserFilter {
    pub fn admin(params: &ListParams) -> Result<Self, QueryError> {
        Ok(Self {
            search: params.search(),
            active: params.active()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub search: Option<String>,
    pub status: Option<PostStatus>,
    /// `true`: at least one flag; `false`: no flags.
    pub flagged: Option<bool>,
    pub user_id: Option<Uuid>,
    pub visibility: Option<Visibility>,
}

impl PostFilter {
    pub fn admin(params: &ListParams) -> Result<Self, QueryError> {
        Ok(Self {
            search: params.search(),
            status: parse_choice("status", &params.status, PostStatus::parse)?,
            flagged: params.flagged()?,
            user_id: params.user_id()?,
            visibility: None,
        })
    }

    /// The community feed, or the viewer's own posts when `mine=true`.
    pub fn app(params: &ListParams, viewer: Uuid) -> Result<Self, QueryError> {
        let search = params.search();
        if params.mine()? == Some(true) {
            return Ok(Self {
                search,
                user_id: Some(viewer),
                ..Default::default()
            });
        }
        Ok(Self {
            search,
            status: Some(PostStatus::Approved),
            visibility: Some(Visibility::Public),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    pub search: Option<String>,
    pub status: Option<NotificationStatus>,
    pub target: Option<NotificationTarget>,
    /// Restrict to notifications addressed to everyone or to this user.
    pub recipient: Option<Uuid>,
}

impl NotificationFilter {
    pub fn admin(params: &ListParams) -> Result<Self, QueryError> {
        Ok(Self {
            search: params.search(),
            status: parse_choice("status", &params.status, NotificationStatus::parse)?,
            target: parse_choice("kind", &params.kind, NotificationTarget::parse)?,
            recipient: None,
        })
    }

    pub fn inbox(user_id: Uuid) -> Self {
        Self {
            status: Some(NotificationStatus::Sent),
            recipient: Some(user_id),
            ..Default::default()
        }
    }
}

/// Post-flatten filters for the submission aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub date: Option<NaiveDate>,
    pub question_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl SubmissionFilter {
    pub fn from_params(params: &ListParams) -> Result<Self, QueryError> {
        Ok(Self {
            date: params.date()?,
            question_id: params.question_id()?,
            user_id: params.user_id()?,
        })
    }
}
