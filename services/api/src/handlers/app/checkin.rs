//! Onboarding questionnaire and the daily check-in.

use axum::extract::State;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use stillwater_core::envelope::Success;
use stillwater_domain::answer::QuestionKind;
use stillwater_domain::pagination::Paginated;

use crate::domain::filter::{QuestionFilter, SubmissionFilter};
use crate::error::ApiError;
use crate::handlers::extract::{JsonBody, ListQuery};
use crate::handlers::views::{AnswerView, QuestionView, SubmissionView};
use crate::middleware::auth::UserAuth;
use crate::state::AppState;
use crate::usecase::question::ListQuestionsUseCase;
use crate::usecase::submission::{
    ListSubmissionsUseCase, RawAnswer, SubmitCheckinUseCase, SubmitOnboardingUseCase,
};

#[derive(Deserialize)]
pub struct AnswerEntry {
    pub question_id: Uuid,
    pub answer: Value,
}

#[derive(Deserialize)]
pub struct AnswersRequest {
    pub answers: Vec<AnswerEntry>,
}

impl AnswersRequest {
    fn into_raw(self) -> Result<Vec<RawAnswer>, ApiError> {
        if self.answers.is_empty() {
            return Err(ApiError::validation("answers must not be empty"));
        }
        Ok(self
            .answers
            .into_iter()
            .map(|entry| RawAnswer {
                question_id: entry.question_id,
                value: entry.answer,
            })
            .collect())
    }
}

async fn active_questions(
    state: &AppState,
    kind: QuestionKind,
) -> Result<Paginated<QuestionView>, ApiError> {
    let usecase = ListQuestionsUseCase {
        repo: state.question_repo(),
    };
    let questions = usecase
        .execute(&QuestionFilter::active_of(kind), None)
        .await?;
    Ok(questions.map(QuestionView::from))
}

// ── GET /api/app/onboarding/questions ────────────────────────────────────────

pub async fn onboarding_questions(
    _user: UserAuth,
    State(state): State<AppState>,
) -> Result<Success<Paginated<QuestionView>>, ApiError> {
    Ok(Success::new(
        active_questions(&state, QuestionKind::Onboarding).await?,
    ))
}

// ── POST /api/app/onboarding/answers ─────────────────────────────────────────

#[derive(Serialize)]
pub struct OnboardingBody {
    pub answers: Vec<AnswerView>,
}

pub async fn submit_onboarding(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AnswersRequest>,
) -> Result<Success<OnboardingBody>, ApiError> {
    let raw = body.into_raw()?;
    let usecase = SubmitOnboardingUseCase {
        users: state.user_repo(),
        questions: state.question_repo(),
    };
    let answers = usecase.execute(&user, &raw).await?;
    Ok(Success::new(OnboardingBody {
        answers: answers.into_iter().map(AnswerView::from).collect(),
    }))
}

// ── GET /api/app/checkin/questions ───────────────────────────────────────────

pub async fn checkin_questions(
    _user: UserAuth,
    State(state): State<AppState>,
) -> Result<Success<Paginated<QuestionView>>, ApiError> {
    Ok(Success::new(
        active_questions(&state, QuestionKind::Checkin).await?,
    ))
}

// ── POST /api/app/checkin ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckinBody {
    pub date: NaiveDate,
    pub streak: i32,
    pub answers: Vec<AnswerView>,
}

pub async fn submit_checkin(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AnswersRequest>,
) -> Result<Success<CheckinBody>, ApiError> {
    let raw = body.into_raw()?;
    let usecase = SubmitCheckinUseCase {
        users: state.user_repo(),
        questions: state.question_repo(),
    };
    let result = usecase.execute(&user, &raw).await?;
    tracing::debug!(user_id = %user.id, streak = result.streak, "check-in recorded");
    Ok(Success::new(CheckinBody {
        date: result.date,
        streak: result.streak,
        answers: result.answers.into_iter().map(AnswerView::from).collect(),
    }))
}

// ── GET /api/app/checkin/history ─────────────────────────────────────────────

/// The caller's own check-in answers, newest first, with question titles.
pub async fn checkin_history(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<SubmissionView>>, ApiError> {
    let filter = SubmissionFilter {
        user_id: Some(user.id),
        ..SubmissionFilter::from_params(&params)?
    };
    let page = params.page_request()?;
    let usecase = ListSubmissionsUseCase {
        users: state.user_repo(),
        questions: state.question_repo(),
    };
    let history = usecase
        .execute(QuestionKind::Checkin, &filter, page)
        .await?;
    Ok(Success::new(history.map(SubmissionView::from)))
}
