use axum::extract::State;

use stillwater_core::envelope::Success;
use stillwater_domain::pagination::Paginated;

use crate::domain::filter::NotificationFilter;
use crate::error::ApiError;
use crate::handlers::extract::ListQuery;
use crate::handlers::views::InboxItemView;
use crate::middleware::auth::UserAuth;
use crate::state::AppState;
use crate::usecase::notification::ListNotificationsUseCase;

// ── GET /api/app/notifications ───────────────────────────────────────────────

pub async fn inbox(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<InboxItemView>>, ApiError> {
    let page = params.page_request()?;
    let usecase = ListNotificationsUseCase {
        repo: state.notification_repo(),
    };
    let items = usecase
        .execute(&NotificationFilter::inbox(user.id), page)
        .await?;
    Ok(Success::new(items.map(InboxItemView::from)))
}
