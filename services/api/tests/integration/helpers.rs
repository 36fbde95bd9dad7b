use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use stillwater_api::domain::filter::{
    ContentFilter, NotificationFilter, PostFilter, QuestionFilter, UserFilter,
};
use stillwater_api::domain::repository::{
    AdminRepository, AppUserRepository, ContentRepository, CredentialStore, IdTokenVerifier,
    NotificationRepository, ObjectStore, OneTimeCodeRepository, OtpMailer, PostRepository,
    QuestionRepository,
};
use stillwater_api::domain::types::{
    Admin, AnswerSet, AppUser, AppUserPatch, CodePurpose, ContentItem, ContentPatch, Credential,
    FlagOutcome, NewAdmin, NewAppUser, Notification, NotificationPatch, OneTimeCode,
    OutboxEvent, Post, PostStats, Question, QuestionPatch, SocialIdentity, SocialProvider,
};
use stillwater_api::error::ApiError;
use stillwater_api::usecase::credential::hash_password;
use stillwater_domain::answer::{EmbeddedAnswer, QuestionKind, QuestionType};
use stillwater_domain::content::ContentKind;
use stillwater_domain::notification::{NotificationStatus, NotificationTarget};
use stillwater_domain::pagination::{PageRequest, Paginated};
use stillwater_domain::post::{PostStatus, Visibility};
use stillwater_domain::query::Window;

pub use stillwater_testing::auth::TEST_JWT_SECRET;

// ── MockAdminRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoredAdmin {
    pub admin: Admin,
    pub password_hash: String,
}

#[derive(Clone, Default)]
pub struct MockAdminRepo {
    pub admins: Arc<Mutex<Vec<StoredAdmin>>>,
}

impl MockAdminRepo {
    pub fn new(admins: Vec<StoredAdmin>) -> Self {
        Self {
            admins: Arc::new(Mutex::new(admins)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn hash_of(&self, id: Uuid) -> Option<String> {
        self.admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.admin.id == id)
            .map(|a| a.password_hash.clone())
    }
}

impl CredentialStore for MockAdminRepo {
    fn purpose(&self) -> CodePurpose {
        CodePurpose::Admin
    }

    async fn find_credential(&self, email: &str) -> Result<Option<Credential>, ApiError> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.admin.email == email)
            .map(|a| Credential {
                id: a.admin.id,
                email: a.admin.email.clone(),
                password_hash: Some(a.password_hash.clone()),
            }))
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, ApiError> {
        let mut admins = self.admins.lock().unwrap();
        match admins.iter_mut().find(|a| a.admin.id == id) {
            Some(a) => {
                a.password_hash = hash.to_owned();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl AdminRepository for MockAdminRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, ApiError> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.admin.id == id)
            .map(|a| a.admin.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.admin.email == email)
            .map(|a| a.admin.clone()))
    }

    async fn count(&self) -> Result<u64, ApiError> {
        Ok(self.admins.lock().unwrap().len() as u64)
    }

    async fn create(&self, admin: &NewAdmin) -> Result<Admin, ApiError> {
        let now = Utc::now();
        let created = Admin {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.admins.lock().unwrap().push(StoredAdmin {
            admin: created.clone(),
            password_hash: admin.password_hash.clone(),
        });
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<Option<String>>,
        email: Option<String>,
    ) -> Result<Option<Admin>, ApiError> {
        let mut admins = self.admins.lock().unwrap();
        let Some(stored) = admins.iter_mut().find(|a| a.admin.id == id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            stored.admin.name = name;
        }
        if let Some(email) = email {
            stored.admin.email = email;
        }
        Ok(Some(stored.admin.clone()))
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoredUser {
    pub user: AppUser,
    pub password_hash: Option<String>,
    pub onboarding: Vec<EmbeddedAnswer>,
    pub checkins: Vec<EmbeddedAnswer>,
}

impl StoredUser {
    pub fn new(user: AppUser) -> Self {
        Self {
            user,
            password_hash: None,
            onboarding: Vec::new(),
            checkins: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<StoredUser>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<StoredUser>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn stored(&self, id: Uuid) -> Option<StoredUser> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user.id == id)
            .cloned()
    }

    fn find(&self, pred: impl Fn(&AppUser) -> bool) -> Option<AppUser> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| pred(&u.user))
            .map(|u| u.user.clone())
    }

    fn modify(&self, id: Uuid, f: impl FnOnce(&mut StoredUser)) -> Option<AppUser> {
        let mut users = self.users.lock().unwrap();
        let stored = users.iter_mut().find(|u| u.user.id == id)?;
        f(stored);
        Some(stored.user.clone())
    }
}

impl CredentialStore for MockUserRepo {
    fn purpose(&self) -> CodePurpose {
        CodePurpose::User
    }

    async fn find_credential(&self, email: &str) -> Result<Option<Credential>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| Credential {
                id: u.user.id,
                email: u.user.email.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, ApiError> {
        Ok(self
            .modify(id, |u| {
                u.password_hash = Some(hash.to_owned());
                u.user.has_password = true;
            })
            .is_some())
    }
}

impl AppUserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AppUser>, ApiError> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, ApiError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn find_by_provider(
        &self,
        provider: SocialProvider,
        subject: &str,
    ) -> Result<Option<AppUser>, ApiError> {
        Ok(self.find(|u| match provider {
            SocialProvider::Google => u.google_id.as_deref() == Some(subject),
            SocialProvider::Apple => u.apple_id.as_deref() == Some(subject),
        }))
    }

    async fn create(&self, user: &NewAppUser) -> Result<AppUser, ApiError> {
        if self.find(|u| u.email == user.email).is_some() {
            return Err(ApiError::EmailTaken);
        }
        let now = Utc::now();
        let created = AppUser {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            google_id: user.google_id.clone(),
            apple_id: user.apple_id.clone(),
            has_password: user.password_hash.is_some(),
            is_active: true,
            streak: 0,
            last_checkin_date: None,
            device_sync: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(StoredUser {
            password_hash: user.password_hash.clone(),
            ..StoredUser::new(created.clone())
        });
        Ok(created)
    }

    async fn link_provider(
        &self,
        id: Uuid,
        identity: &SocialIdentity,
    ) -> Result<Option<AppUser>, ApiError> {
        Ok(self.modify(id, |u| match identity.provider {
            SocialProvider::Google => u.user.google_id = Some(identity.subject.clone()),
            SocialProvider::Apple => u.user.apple_id = Some(identity.subject.clone()),
        }))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &AppUserPatch,
    ) -> Result<Option<AppUser>, ApiError> {
        Ok(self.modify(id, |u| {
            if let Some(name) = &patch.name {
                u.user.name = name.clone();
            }
            if let Some(device_sync) = &patch.device_sync {
                u.user.device_sync = device_sync.clone();
            }
        }))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<AppUser>, ApiError> {
        Ok(self.modify(id, |u| u.user.is_active = is_active))
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<AppUser>, ApiError> {
        let users = self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.user.clone())
            .filter(|u| filter.active.is_none_or(|active| u.is_active == active))
            .collect();
        Ok(Paginated::slice(users, page))
    }

    async fn save_onboarding_answers(
        &self,
        id: Uuid,
        answers: &[EmbeddedAnswer],
    ) -> Result<(), ApiError> {
        self.modify(id, |u| u.onboarding = answers.to_vec());
        Ok(())
    }

    async fn save_checkin(
        &self,
        id: Uuid,
        answers: &[EmbeddedAnswer],
        streak: i32,
        checkin_date: NaiveDate,
    ) -> Result<(), ApiError> {
        self.modify(id, |u| {
            u.checkins = answers.to_vec();
            u.user.streak = streak;
            u.user.last_checkin_date = Some(checkin_date);
        });
        Ok(())
    }

    async fn load_answer_sets(
        &self,
        kind: QuestionKind,
        user_id: Option<Uuid>,
    ) -> Result<Vec<AnswerSet>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| user_id.is_none_or(|id| u.user.id == id))
            .map(|u| AnswerSet {
                user_id: u.user.id,
                name: u.user.name.clone(),
                email: u.user.email.clone(),
                answers: match kind {
                    QuestionKind::Onboarding => u.onboarding.clone(),
                    QuestionKind::Checkin => u.checkins.clone(),
                },
            })
            .collect())
    }

    async fn active_user_ids(&self) -> Result<Vec<Uuid>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.user.is_active)
            .map(|u| u.user.id)
            .collect())
    }
}

// ── MockCodeRepo / MockMailer ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCodeRepo {
    pub codes: Arc<Mutex<Vec<OneTimeCode>>>,
}

impl MockCodeRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn unconsumed(&self, email: &str, purpose: CodePurpose) -> Vec<OneTimeCode> {
        self.codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.email == email && c.purpose == purpose && !c.consumed)
            .cloned()
            .collect()
    }
}

impl OneTimeCodeRepository for MockCodeRepo {
    async fn replace(&self, code: &OneTimeCode) -> Result<(), ApiError> {
        let mut codes = self.codes.lock().unwrap();
        codes.retain(|c| !(c.email == code.email && c.purpose == code.purpose));
        codes.push(code.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, ApiError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| {
                c.email == email && c.purpose == purpose && c.code == code && c.is_valid_at(now)
            })
            .cloned())
    }

    async fn consume(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut codes = self.codes.lock().unwrap();
        match codes.iter_mut().find(|c| c.id == id && !c.consumed) {
            Some(c) => {
                c.consumed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_miss(
        &self,
        email: &str,
        purpose: CodePurpose,
        max_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let mut codes = self.codes.lock().unwrap();
        let live =
            |c: &OneTimeCode| c.email == email && c.purpose == purpose && c.is_valid_at(now);
        for code in codes.iter_mut().filter(|c| live(c)) {
            code.attempts += 1;
        }
        let before = codes.len();
        codes.retain(|c| !(live(c) && c.attempts >= max_attempts));
        Ok(codes.len() < before)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.expires_at > now);
        Ok((before - codes.len()) as u64)
    }
}

#[derive(Clone)]
pub struct MockMailer {
    pub delivered: bool,
    pub sent: Arc<Mutex<Vec<(String, String, CodePurpose)>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            delivered: true,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            delivered: false,
            ..Self::new()
        }
    }

    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, code, _)| code.clone())
    }
}

impl OtpMailer for MockMailer {
    async fn send(&self, email: &str, code: &str, purpose: CodePurpose) -> Result<bool, ApiError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_owned(), code.to_owned(), purpose));
        Ok(self.delivered)
    }
}

// ── MockQuestionRepo ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockQuestionRepo {
    pub questions: Arc<Mutex<Vec<Question>>>,
    pub lookups: Arc<Mutex<Vec<Vec<Uuid>>>>,
}

impl MockQuestionRepo {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
            ..Default::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Question> {
        self.questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == id)
            .cloned()
    }
}

impl QuestionRepository for MockQuestionRepo {
    async fn list(
        &self,
        filter: &QuestionFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Question>, ApiError> {
        let mut questions: Vec<Question> = self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| filter.kind.is_none_or(|k| q.kind == k))
            .filter(|q| filter.active.is_none_or(|a| q.is_active == a))
            .cloned()
            .collect();
        questions.sort_by_key(|q| (q.order, q.created_at));
        Ok(Paginated::slice(questions, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>, ApiError> {
        Ok(self.get(id))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Question>, ApiError> {
        self.lookups.lock().unwrap().push(ids.to_vec());
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn max_order(&self, kind: QuestionKind) -> Result<Option<i32>, ApiError> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.kind == kind)
            .map(|q| q.order)
            .max())
    }

    async fn create(&self, question: &Question) -> Result<(), ApiError> {
        self.questions.lock().unwrap().push(question.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &QuestionPatch,
    ) -> Result<Option<Question>, ApiError> {
        let mut questions = self.questions.lock().unwrap();
        let Some(q) = questions.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        if let Some(kind) = patch.kind {
            q.kind = kind;
        }
        if let Some(title) = &patch.title {
            q.title = title.clone();
        }
        if let Some(question_type) = patch.question_type {
            q.question_type = question_type;
        }
        if let Some(options) = &patch.options {
            q.options = options.clone();
        }
        if let Some(order) = patch.order {
            q.order = order;
        }
        if let Some(is_active) = patch.is_active {
            q.is_active = is_active;
        }
        Ok(Some(q.clone()))
    }

    async fn set_order(&self, id: Uuid, order: i32) -> Result<bool, ApiError> {
        let mut questions = self.questions.lock().unwrap();
        match questions.iter_mut().find(|q| q.id == id) {
            Some(q) => {
                q.order = order;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut questions = self.questions.lock().unwrap();
        let before = questions.len();
        questions.retain(|q| q.id != id);
        Ok(questions.len() != before)
    }
}

// ── MockContentRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockContentRepo {
    pub items: Arc<Mutex<Vec<ContentItem>>>,
}

impl MockContentRepo {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
        }
    }
}

impl ContentRepository for MockContentRepo {
    async fn list(
        &self,
        filter: &ContentFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<ContentItem>, ApiError> {
        let items = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.kind == filter.kind)
            .cloned()
            .collect();
        Ok(Paginated::slice(items, page))
    }

    async fn find_by_id(
        &self,
        kind: ContentKind,
        id: Uuid,
    ) -> Result<Option<ContentItem>, ApiError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.kind == kind && c.id == id)
            .cloned())
    }

    async fn create(&self, item: &ContentItem) -> Result<(), ApiError> {
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn update(
        &self,
        kind: ContentKind,
        id: Uuid,
        patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, ApiError> {
        let mut items = self.items.lock().unwrap();
        let Some(item) = items.iter_mut().find(|c| c.kind == kind && c.id == id) else {
            return Ok(None);
        };
        if let Some(body) = &patch.body {
            item.body = body.clone();
        }
        if let Some(title) = &patch.title {
            item.title = title.clone();
        }
        if let Some(tags) = &patch.tags {
            item.tags = tags.clone();
        }
        Ok(Some(item.clone()))
    }

    async fn delete(&self, kind: ContentKind, id: Uuid) -> Result<bool, ApiError> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|c| !(c.kind == kind && c.id == id));
        Ok(items.len() != before)
    }

    async fn current(
        &self,
        kind: ContentKind,
        window: Window,
    ) -> Result<Option<ContentItem>, ApiError> {
        let mut candidates: Vec<ContentItem> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.kind == kind && c.is_active && !c.is_archived && c.is_published)
            .filter(|c| {
                c.scheduled_at
                    .is_none_or(|at| at >= window.start && at < window.end)
            })
            .cloned()
            .collect();
        candidates.sort_by(|a, b| match (a.scheduled_at, b.scheduled_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        });
        Ok(candidates.into_iter().next())
    }
}

// ── MockPostRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPostRepo {
    pub posts: Arc<Mutex<Vec<Post>>>,
    pub flags: Arc<Mutex<HashSet<(Uuid, Uuid)>>>,
}

impl MockPostRepo {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: Arc::new(Mutex::new(posts)),
            ..Default::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Post> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

impl PostRepository for MockPostRepo {
    async fn list(
        &self,
        filter: &PostFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Post>, ApiError> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !p.is_deleted())
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .filter(|p| filter.visibility.is_none_or(|v| p.visibility == v))
            .filter(|p| filter.user_id.is_none_or(|u| p.user_id == u))
            .filter(|p| filter.flagged.is_none_or(|f| (p.flag_count > 0) == f))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Paginated::slice(posts, page))
    }

    async fn stats(&self) -> Result<PostStats, ApiError> {
        let posts = self.posts.lock().unwrap();
        let mut stats = PostStats::default();
        for post in posts.iter().filter(|p| !p.is_deleted()) {
            stats.total += 1;
            match post.status {
                PostStatus::Pending => stats.pending += 1,
                PostStatus::Approved => stats.approved += 1,
                PostStatus::Rejected => stats.rejected += 1,
            }
            if post.flag_count > 0 {
                stats.flagged += 1;
            }
        }
        Ok(stats)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, ApiError> {
        Ok(self.get(id))
    }

    async fn create(&self, post: &Post) -> Result<(), ApiError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<Option<Post>, ApiError> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts
            .iter_mut()
            .find(|p| p.id == id && !p.is_deleted())
            .map(|p| {
                p.status = status;
                p.clone()
            }))
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, ApiError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == id && !p.is_deleted()) {
            Some(p) => {
                p.deleted_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn flag(&self, post_id: Uuid, user_id: Uuid) -> Result<FlagOutcome, ApiError> {
        if !self.flags.lock().unwrap().insert((post_id, user_id)) {
            return Ok(FlagOutcome::AlreadyFlagged);
        }
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(ApiError::PostNotFound)?;
        post.flag_count += 1;
        Ok(FlagOutcome::Flagged {
            flag_count: post.flag_count,
        })
    }
}

// ── MockNotificationRepo ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockNotificationRepo {
    pub notifications: Arc<Mutex<Vec<Notification>>>,
    pub events: Arc<Mutex<Vec<OutboxEvent>>>,
}

impl MockNotificationRepo {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications: Arc::new(Mutex::new(notifications)),
            ..Default::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }
}

impl NotificationRepository for MockNotificationRepo {
    async fn list(
        &self,
        filter: &NotificationFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Notification>, ApiError> {
        let items = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| filter.status.is_none_or(|s| n.status == s))
            .filter(|n| filter.target.is_none_or(|t| n.target == t))
            .filter(|n| {
                filter.recipient.is_none_or(|uid| {
                    n.target == NotificationTarget::All || n.target_user_ids.contains(&uid)
                })
            })
            .cloned()
            .collect();
        Ok(Paginated::slice(items, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, ApiError> {
        Ok(self.get(id))
    }

    async fn create(&self, notification: &Notification) -> Result<(), ApiError> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &NotificationPatch,
    ) -> Result<Option<Notification>, ApiError> {
        let mut notifications = self.notifications.lock().unwrap();
        let Some(n) = notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            n.title = title.clone();
        }
        if let Some(message) = &patch.message {
            n.message = message.clone();
        }
        if let Some(target) = patch.target {
            n.target = target;
        }
        if let Some(ids) = &patch.target_user_ids {
            n.target_user_ids = ids.clone();
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            n.scheduled_at = scheduled_at;
        }
        if let Some(status) = patch.status {
            n.status = status;
        }
        Ok(Some(n.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        Ok(notifications.len() != before)
    }

    async fn mark_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<bool, ApiError> {
        let mut notifications = self.notifications.lock().unwrap();
        let Some(n) = notifications
            .iter_mut()
            .find(|n| n.id == id && n.status != NotificationStatus::Sent)
        else {
            return Ok(false);
        };
        n.status = NotificationStatus::Sent;
        n.sent_at = Some(sent_at);
        self.events.lock().unwrap().push(event.clone());
        Ok(true)
    }

    async fn due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Notification>, ApiError> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.status == NotificationStatus::Scheduled)
            .filter(|n| n.scheduled_at.is_some_and(|at| at <= now))
            .cloned()
            .collect())
    }
}

// ── Ports ────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockObjectStore {
    pub puts: Arc<Mutex<Vec<(String, String, usize)>>>,
}

impl ObjectStore for MockObjectStore {
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> Result<String, ApiError> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_owned(), content_type.to_owned(), body.len()));
        Ok(format!("https://cdn.example.com/{key}"))
    }
}

/// Accepts exactly one token string and returns a fixed identity for it.
pub struct MockVerifier {
    pub token: String,
    pub identity: SocialIdentity,
}

impl IdTokenVerifier for MockVerifier {
    async fn verify(
        &self,
        provider: SocialProvider,
        id_token: &str,
    ) -> Result<SocialIdentity, ApiError> {
        if id_token != self.token || provider != self.identity.provider {
            return Err(ApiError::InvalidToken);
        }
        Ok(self.identity.clone())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub const TEST_PASSWORD: &str = "correct horse battery";

pub fn test_admin() -> StoredAdmin {
    let now = Utc::now();
    StoredAdmin {
        admin: Admin {
            id: Uuid::parse_str("00000000-0000-0000-0000-00000000000a").unwrap(),
            email: "admin@example.com".to_owned(),
            name: Some("Admin".to_owned()),
            created_at: now,
            updated_at: now,
        },
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
    }
}

pub fn test_user() -> AppUser {
    let now = Utc::now();
    AppUser {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        name: Some("Ada".to_owned()),
        email: "user@example.com".to_owned(),
        google_id: None,
        apple_id: None,
        has_password: true,
        is_active: true,
        streak: 0,
        last_checkin_date: None,
        device_sync: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn stored_user_with_password(user: AppUser) -> StoredUser {
    StoredUser {
        password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
        ..StoredUser::new(user)
    }
}

pub fn test_question(kind: QuestionKind, question_type: QuestionType, order: i32) -> Question {
    let now = Utc::now();
    Question {
        id: Uuid::new_v4(),
        kind,
        title: format!("Question {order}"),
        question_type,
        options: if question_type.has_options() {
            vec!["calm".to_owned(), "tense".to_owned()]
        } else {
            Vec::new()
        },
        order,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_post(user_id: Uuid, status: PostStatus) -> Post {
    let now = Utc::now();
    Post {
        id: Uuid::new_v4(),
        user_id,
        title: "First light".to_owned(),
        content: "Walked by the lake this morning.".to_owned(),
        image_url: None,
        status,
        visibility: Visibility::Public,
        flag_count: 0,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_notification(status: NotificationStatus, target: NotificationTarget) -> Notification {
    let now = Utc::now();
    Notification {
        id: Uuid::new_v4(),
        title: "Breathe".to_owned(),
        message: "Take a minute for yourself.".to_owned(),
        target,
        target_user_ids: Vec::new(),
        scheduled_at: None,
        status,
        sent_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_content(kind: ContentKind, scheduled_at: Option<DateTime<Utc>>) -> ContentItem {
    let now = Utc::now();
    ContentItem {
        id: Uuid::new_v4(),
        kind,
        title: None,
        body: "You are enough.".to_owned(),
        author: None,
        media_url: None,
        tags: Vec::new(),
        scheduled_at,
        is_active: true,
        is_archived: false,
        is_published: true,
        order_index: 0,
        created_at: now,
        updated_at: now,
    }
}
