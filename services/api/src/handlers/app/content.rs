use axum::extract::{Path, State};
use chrono::Utc;
use serde::Serialize;

use stillwater_core::envelope::Success;
use stillwater_domain::pagination::Paginated;
use stillwater_domain::query::Period;

use crate::domain::filter::ContentFilter;
use crate::error::ApiError;
use crate::handlers::admin::content::parse_kind;
use crate::handlers::extract::ListQuery;
use crate::handlers::views::ContentView;
use crate::middleware::auth::UserAuth;
use crate::state::AppState;
use crate::usecase::content::{CurrentAffirmationUseCase, ListContentUseCase};

// ── GET /api/app/content/{kind} ──────────────────────────────────────────────

pub async fn list_content(
    _user: UserAuth,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<ContentView>>, ApiError> {
    let filter = ContentFilter::app(parse_kind(&kind)?, &params);
    let page = params.page_request()?;
    let usecase = ListContentUseCase {
        repo: state.content_repo(),
    };
    let items = usecase.execute(&filter, page).await?;
    Ok(Success::new(items.map(ContentView::from)))
}

// ── GET /api/app/daily-affirmation, /api/app/weekly-affirmation ──────────────

#[derive(Serialize)]
pub struct AffirmationBody {
    pub affirmation: ContentView,
}

async fn current(state: &AppState, period: Period) -> Result<Success<AffirmationBody>, ApiError> {
    let usecase = CurrentAffirmationUseCase {
        repo: state.content_repo(),
    };
    let item = usecase.execute(period, Utc::now()).await?;
    Ok(Success::new(AffirmationBody {
        affirmation: item.into(),
    }))
}

pub async fn daily_affirmation(
    _user: UserAuth,
    State(state): State<AppState>,
) -> Result<Success<AffirmationBody>, ApiError> {
    current(&state, Period::Today).await
}

pub async fn weekly_affirmation(
    _user: UserAuth,
    State(state): State<AppState>,
) -> Result<Success<AffirmationBody>, ApiError> {
    current(&state, Period::ThisWeek).await
}
