use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use uuid::Uuid;

use stillwater_api_schema::questions;
use stillwater_core::sea_ext::{contains_ci, fetch_page};
use stillwater_domain::answer::{QuestionKind, QuestionType};
use stillwater_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::QuestionFilter;
use crate::domain::repository::QuestionRepository;
use crate::domain::types::{Question, QuestionPatch};
use crate::error::ApiError;
use crate::infra::db::{from_json_column, parse_column, to_json_column};

#[derive(Clone)]
pub struct DbQuestionRepository {
    pub db: DatabaseConnection,
}

fn question_condition(filter: &QuestionFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(kind) = filter.kind {
        cond = cond.add(questions::Column::Kind.eq(kind.as_str()));
    }
    if let Some(term) = filter.search.as_deref() {
        cond = cond.add(contains_ci(questions::Column::Title, term));
    }
    if let Some(active) = filter.active {
        cond = cond.add(questions::Column::IsActive.eq(active));
    }
    cond
}

impl QuestionRepository for DbQuestionRepository {
    async fn list(
        &self,
        filter: &QuestionFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Question>, ApiError> {
        let select = questions::Entity::find()
            .filter(question_condition(filter))
            .order_by_asc(questions::Column::SortOrder)
            .order_by_asc(questions::Column::CreatedAt);
        fetch_page(select, page, &self.db)
            .await
            .context("list questions")?
            .try_map(question_from_model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>, ApiError> {
        let model = questions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find question")?;
        model.map(question_from_model).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Question>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        questions::Entity::find()
            .filter(questions::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find questions by ids")?
            .into_iter()
            .map(question_from_model)
            .collect()
    }

    async fn max_order(&self, kind: QuestionKind) -> Result<Option<i32>, ApiError> {
        let max: Option<Option<i32>> = questions::Entity::find()
            .select_only()
            .column_as(questions::Column::SortOrder.max(), "max_order")
            .filter(questions::Column::Kind.eq(kind.as_str()))
            .into_tuple()
            .one(&self.db)
            .await
            .context("max question order")?;
        Ok(max.flatten())
    }

    async fn create(&self, question: &Question) -> Result<(), ApiError> {
        questions::ActiveModel {
            id: Set(question.id),
            kind: Set(question.kind.as_str().to_owned()),
            title: Set(question.title.clone()),
            question_type: Set(question.question_type.as_str().to_owned()),
            options: Set(to_json_column("options", &question.options)?),
            sort_order: Set(question.order),
            is_active: Set(question.is_active),
            created_at: Set(question.created_at),
            updated_at: Set(question.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert question")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &QuestionPatch,
    ) -> Result<Option<Question>, ApiError> {
        let mut model = questions::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(kind) = patch.kind {
            model.kind = Set(kind.as_str().to_owned());
        }
        if let Some(title) = &patch.title {
            model.title = Set(title.clone());
        }
        if let Some(question_type) = patch.question_type {
            model.question_type = Set(question_type.as_str().to_owned());
        }
        if let Some(options) = &patch.options {
            model.options = Set(to_json_column("options", options)?);
        }
        if let Some(order) = patch.order {
            model.sort_order = Set(order);
        }
        if let Some(active) = patch.is_active {
            model.is_active = Set(active);
        }

        match model.update(&self.db).await {
            Ok(model) => question_from_model(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(ApiError::Internal(anyhow::Error::new(e).context("update question"))),
        }
    }

    async fn set_order(&self, id: Uuid, order: i32) -> Result<bool, ApiError> {
        let result = questions::Entity::update_many()
            .col_expr(questions::Column::SortOrder, Expr::value(order))
            .col_expr(questions::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(questions::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set question order")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = questions::Entity::delete_many()
            .filter(questions::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete question")?;
        Ok(result.rows_affected > 0)
    }
}

fn question_from_model(model: questions::Model) -> Result<Question, ApiError> {
    Ok(Question {
        id: model.id,
        kind: parse_column("kind", &model.kind, QuestionKind::parse)?,
        title: model.title,
        question_type: parse_column("question_type", &model.question_type, QuestionType::parse)?,
        options: from_json_column("options", model.options)?,
        order: model.sort_order,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
