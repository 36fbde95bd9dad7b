use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde_json::Value;
use uuid::Uuid;

use stillwater_api_schema::app_users;
use stillwater_core::sea_ext::{fetch_page, search_any};
use stillwater_domain::answer::{EmbeddedAnswer, QuestionKind};
use stillwater_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::UserFilter;
use crate::domain::repository::{AppUserRepository, CredentialStore};
use crate::domain::types::{
    AnswerSet, AppUser, AppUserPatch, CodePurpose, Credential, NewAppUser, SocialIdentity,
    SocialProvider,
};
use crate::error::ApiError;
use crate::infra::db::{from_json_column, is_unique_violation, to_json_column};

#[derive(Clone)]
pub struct DbAppUserRepository {
    pub db: DatabaseConnection,
}

impl DbAppUserRepository {
    /// Run an active-model update, mapping a missing row to `None`.
    async fn apply(
        &self,
        model: app_users::ActiveModel,
        what: &'static str,
    ) -> Result<Option<AppUser>, ApiError> {
        match model.update(&self.db).await {
            Ok(model) => Ok(Some(user_from_model(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) if is_unique_violation(&e) => Err(ApiError::EmailTaken),
            Err(e) => Err(ApiError::Internal(anyhow::Error::new(e).context(what))),
        }
    }
}

fn provider_column(provider: SocialProvider) -> app_users::Column {
    match provider {
        SocialProvider::Google => app_users::Column::GoogleId,
        SocialProvider::Apple => app_users::Column::AppleId,
    }
}

fn answers_column(kind: QuestionKind) -> app_users::Column {
    match kind {
        QuestionKind::Onboarding => app_users::Column::OnboardingAnswers,
        QuestionKind::Checkin => app_users::Column::CheckinAnswers,
    }
}

fn user_condition(filter: &UserFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(term) = filter.search.as_deref() {
        cond = cond.add(search_any(
            &[app_users::Column::Name, app_users::Column::Email],
            term,
        ));
    }
    if let Some(active) = filter.active {
        cond = cond.add(app_users::Column::IsActive.eq(active));
    }
    cond
}

impl AppUserRepository for DbAppUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AppUser>, ApiError> {
        let model = app_users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, ApiError> {
        let model = app_users::Entity::find()
            .filter(app_users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_provider(
        &self,
        provider: SocialProvider,
        subject: &str,
    ) -> Result<Option<AppUser>, ApiError> {
        let model = app_users::Entity::find()
            .filter(provider_column(provider).eq(subject))
            .one(&self.db)
            .await
            .context("find user by provider")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &NewAppUser) -> Result<AppUser, ApiError> {
        let now = Utc::now();
        let result = app_users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            google_id: Set(user.google_id.clone()),
            apple_id: Set(user.apple_id.clone()),
            is_active: Set(true),
            streak: Set(0),
            last_checkin_date: Set(None),
            onboarding_answers: Set(Value::Array(Vec::new())),
            checkin_answers: Set(Value::Array(Vec::new())),
            device_sync: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(user_from_model(model)),
            Err(e) if is_unique_violation(&e) => Err(ApiError::EmailTaken),
            Err(e) => Err(ApiError::Internal(anyhow::Error::new(e).context("insert user"))),
        }
    }

    async fn link_provider(
        &self,
        id: Uuid,
        identity: &SocialIdentity,
    ) -> Result<Option<AppUser>, ApiError> {
        let mut model = app_users::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        match identity.provider {
            SocialProvider::Google => model.google_id = Set(Some(identity.subject.clone())),
            SocialProvider::Apple => model.apple_id = Set(Some(identity.subject.clone())),
        }
        self.apply(model, "link provider").await
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &AppUserPatch,
    ) -> Result<Option<AppUser>, ApiError> {
        let mut model = app_users::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = &patch.name {
            model.name = Set(name.clone());
        }
        if let Some(sync) = &patch.device_sync {
            model.device_sync = Set(sync.clone());
        }
        self.apply(model, "update user profile").await
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<AppUser>, ApiError> {
        let model = app_users::ActiveModel {
            id: Set(id),
            is_active: Set(is_active),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        self.apply(model, "set user active").await
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<AppUser>, ApiError> {
        let select = app_users::Entity::find()
            .filter(user_condition(filter))
            .order_by_desc(app_users::Column::CreatedAt);
        let page = fetch_page(select, page, &self.db)
            .await
            .context("list users")?;
        Ok(page.map(user_from_model))
    }

    async fn save_onboarding_answers(
        &self,
        id: Uuid,
        answers: &[EmbeddedAnswer],
    ) -> Result<(), ApiError> {
        let model = app_users::ActiveModel {
            id: Set(id),
            onboarding_answers: Set(to_json_column("onboarding_answers", &answers)?),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        self.apply(model, "save onboarding answers")
            .await?
            .ok_or(ApiError::UserNotFound)?;
        Ok(())
    }

    async fn save_checkin(
        &self,
        id: Uuid,
        answers: &[EmbeddedAnswer],
        streak: i32,
        checkin_date: NaiveDate,
    ) -> Result<(), ApiError> {
        let model = app_users::ActiveModel {
            id: Set(id),
            checkin_answers: Set(to_json_column("checkin_answers", &answers)?),
            streak: Set(streak),
            last_checkin_date: Set(Some(checkin_date)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        self.apply(model, "save check-in")
            .await?
            .ok_or(ApiError::UserNotFound)?;
        Ok(())
    }

    async fn load_answer_sets(
        &self,
        kind: QuestionKind,
        user_id: Option<Uuid>,
    ) -> Result<Vec<AnswerSet>, ApiError> {
        let mut select = app_users::Entity::find()
            .select_only()
            .column(app_users::Column::Id)
            .column(app_users::Column::Name)
            .column(app_users::Column::Email)
            .column(answers_column(kind));
        if let Some(user_id) = user_id {
            select = select.filter(app_users::Column::Id.eq(user_id));
        }
        let rows: Vec<(Uuid, Option<String>, String, Value)> = select
            .into_tuple()
            .all(&self.db)
            .await
            .context("load answer sets")?;

        rows.into_iter()
            .map(|(user_id, name, email, answers)| {
                Ok(AnswerSet {
                    user_id,
                    name,
                    email,
                    answers: from_json_column("answers", answers)?,
                })
            })
            .collect()
    }

    async fn active_user_ids(&self) -> Result<Vec<Uuid>, ApiError> {
        let ids: Vec<Uuid> = app_users::Entity::find()
            .select_only()
            .column(app_users::Column::Id)
            .filter(app_users::Column::IsActive.eq(true))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list active user ids")?;
        Ok(ids)
    }
}

impl CredentialStore for DbAppUserRepository {
    fn purpose(&self) -> CodePurpose {
        CodePurpose::User
    }

    async fn find_credential(&self, email: &str) -> Result<Option<Credential>, ApiError> {
        let model = app_users::Entity::find()
            .filter(app_users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user credential")?;
        Ok(model.map(|m| Credential {
            id: m.id,
            email: m.email,
            password_hash: m.password_hash,
        }))
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, ApiError> {
        let model = app_users::ActiveModel {
            id: Set(id),
            password_hash: Set(Some(hash.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(self.apply(model, "update user password").await?.is_some())
    }
}

fn user_from_model(model: app_users::Model) -> AppUser {
    AppUser {
        id: model.id,
        name: model.name,
        email: model.email,
        google_id: model.google_id,
        apple_id: model.apple_id,
        has_password: model.password_hash.is_some(),
        is_active: model.is_active,
        streak: model.streak,
        last_checkin_date: model.last_checkin_date,
        device_sync: model.device_sync,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
