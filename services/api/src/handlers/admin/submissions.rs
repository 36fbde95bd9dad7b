use axum::extract::{Path, State};

use stillwater_core::envelope::Success;
use stillwater_domain::answer::QuestionKind;
use stillwater_domain::pagination::Paginated;

use crate::domain::filter::SubmissionFilter;
use crate::error::ApiError;
use crate::handlers::extract::ListQuery;
use crate::handlers::views::SubmissionView;
use crate::middleware::auth::AdminAuth;
use crate::state::AppState;
use crate::usecase::submission::ListSubmissionsUseCase;

// ── GET /api/admin/submissions/{kind} ────────────────────────────────────────

/// Every answer of the given kind, one row per user and answer, newest first.
/// Accepts `date`, `question_id` and `user_id` alongside `page`/`limit`.
pub async fn list_submissions(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<SubmissionView>>, ApiError> {
    let kind = QuestionKind::parse(&kind)
        .ok_or_else(|| ApiError::validation("kind must be onboarding or checkin"))?;
    let filter = SubmissionFilter::from_params(&params)?;
    let page = params.page_request()?;
    let usecase = ListSubmissionsUseCase {
        users: state.user_repo(),
        questions: state.question_repo(),
    };
    let submissions = usecase.execute(kind, &filter, page).await?;
    Ok(Success::new(submissions.map(SubmissionView::from)))
}
