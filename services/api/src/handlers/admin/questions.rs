use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stillwater_core::envelope::{Message, Success};
use stillwater_domain::answer::{QuestionKind, QuestionType};
use stillwater_domain::pagination::Paginated;

use crate::domain::filter::QuestionFilter;
use crate::domain::types::QuestionPatch;
use crate::error::ApiError;
use crate::handlers::extract::{JsonBody, ListQuery, parse_id};
use crate::handlers::views::QuestionView;
use crate::middleware::auth::{AdminAuth, AnyAuth};
use crate::state::AppState;
use crate::usecase::question::{
    CreateQuestionInput, CreateQuestionUseCase, DeleteQuestionUseCase, GetQuestionUseCase,
    ListQuestionsUseCase, ReorderItem, ReorderQuestionsUseCase, UpdateQuestionUseCase,
};

#[derive(Serialize)]
pub struct QuestionBody {
    pub question: QuestionView,
}

// ── GET /api/admin/questions ─────────────────────────────────────────────────

pub async fn list_questions(
    _principal: AnyAuth,
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<QuestionView>>, ApiError> {
    let filter = QuestionFilter::admin(&params)?;
    let page = params.page_request()?;
    let usecase = ListQuestionsUseCase {
        repo: state.question_repo(),
    };
    let questions = usecase.execute(&filter, page).await?;
    Ok(Success::new(questions.map(QuestionView::from)))
}

// ── POST /api/admin/questions ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateQuestionRequest {
    pub kind: QuestionKind,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn create_question(
    _admin: AdminAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateQuestionUseCase {
        repo: state.question_repo(),
    };
    let question = usecase
        .execute(CreateQuestionInput {
            kind: body.kind,
            title: body.title,
            question_type: body.question_type,
            options: body.options,
            order: body.order,
            is_active: body.is_active,
        })
        .await?;
    Ok(Success::created(QuestionBody {
        question: question.into(),
    }))
}

// ── GET /api/admin/questions/{id} ────────────────────────────────────────────

pub async fn get_question(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<QuestionBody>, ApiError> {
    let usecase = GetQuestionUseCase {
        repo: state.question_repo(),
    };
    let question = usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(QuestionBody {
        question: question.into(),
    }))
}

// ── PATCH /api/admin/questions/{id} ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateQuestionRequest {
    pub kind: Option<QuestionKind>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<QuestionType>,
    pub options: Option<Vec<String>>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn update_question(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateQuestionRequest>,
) -> Result<Success<QuestionBody>, ApiError> {
    let usecase = UpdateQuestionUseCase {
        repo: state.question_repo(),
    };
    let question = usecase
        .execute(
            parse_id(&id)?,
            QuestionPatch {
                kind: body.kind,
                title: body.title,
                question_type: body.question_type,
                options: body.options,
                order: body.order,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Success::new(QuestionBody {
        question: question.into(),
    }))
}

// ── DELETE /api/admin/questions/{id} ─────────────────────────────────────────

pub async fn delete_question(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<Message>, ApiError> {
    let usecase = DeleteQuestionUseCase {
        repo: state.question_repo(),
    };
    usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(Message {
        message: "question deleted",
    }))
}

// ── POST /api/admin/questions/reorder ────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReorderEntry {
    pub id: Uuid,
    pub order: i32,
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderEntry>,
}

#[derive(Serialize)]
pub struct ReorderResponse {
    pub updated: u64,
}

pub async fn reorder_questions(
    _admin: AdminAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ReorderRequest>,
) -> Result<Success<ReorderResponse>, ApiError> {
    let items: Vec<ReorderItem> = body
        .items
        .into_iter()
        .map(|entry| ReorderItem {
            id: entry.id,
            order: entry.order,
        })
        .collect();
    let usecase = ReorderQuestionsUseCase {
        repo: state.question_repo(),
    };
    let updated = usecase.execute(&items).await?;
    Ok(Success::new(ReorderResponse { updated }))
}
