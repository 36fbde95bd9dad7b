use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use stillwater_core::health::{check_database, healthz};
use stillwater_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{admin, app};
use crate::middleware::guard::edge_guard;
use crate::state::AppState;

/// Headroom for multipart boundaries and the `folder` field on top of the
/// image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    check_database(&state.db).await
}

fn admin_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(admin::auth::register))
        .route("/auth/login", post(admin::auth::login))
        .route("/auth/logout", post(admin::auth::logout))
        .route(
            "/auth/me",
            get(admin::auth::get_me).patch(admin::auth::update_me),
        )
        .route("/auth/forgot-password", post(admin::auth::forgot_password))
        .route("/auth/reset-password", post(admin::auth::reset_password))
        // Questions
        .route(
            "/questions",
            get(admin::questions::list_questions).post(admin::questions::create_question),
        )
        .route("/questions/reorder", post(admin::questions::reorder_questions))
        .route(
            "/questions/{id}",
            get(admin::questions::get_question)
                .patch(admin::questions::update_question)
                .delete(admin::questions::delete_question),
        )
        // Content
        .route(
            "/content/{kind}",
            get(admin::content::list_content).post(admin::content::create_content),
        )
        .route(
            "/content/{kind}/{id}",
            get(admin::content::get_content)
                .patch(admin::content::update_content)
                .delete(admin::content::delete_content),
        )
        // Users
        .route("/users", get(admin::users::list_users))
        .route(
            "/users/{id}",
            get(admin::users::get_user).patch(admin::users::set_user_active),
        )
        // Posts
        .route("/posts", get(admin::posts::list_posts))
        .route("/posts/stats", get(admin::posts::post_stats))
        .route(
            "/posts/{id}",
            get(admin::posts::get_post).delete(admin::posts::delete_post),
        )
        .route("/posts/{id}/status", patch(admin::posts::set_post_status))
        // Notifications
        .route(
            "/notifications",
            get(admin::notifications::list_notifications)
                .post(admin::notifications::create_notification),
        )
        .route(
            "/notifications/{id}",
            get(admin::notifications::get_notification)
                .patch(admin::notifications::update_notification)
                .delete(admin::notifications::delete_notification),
        )
        .route(
            "/notifications/{id}/send",
            post(admin::notifications::send_notification),
        )
        // Submissions
        .route(
            "/submissions/{kind}",
            get(admin::submissions::list_submissions),
        )
        // Upload
        .route(
            "/upload",
            post(admin::upload::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

fn app_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(app::auth::register))
        .route("/auth/login", post(app::auth::login))
        .route("/auth/social", post(app::auth::social_login))
        .route("/auth/forgot-password", post(app::auth::forgot_password))
        .route("/auth/reset-password", post(app::auth::reset_password))
        // Profile
        .route("/me", get(app::me::get_me).patch(app::me::update_me))
        // Onboarding / check-in
        .route(
            "/onboarding/questions",
            get(app::checkin::onboarding_questions),
        )
        .route("/onboarding/answers", post(app::checkin::submit_onboarding))
        .route("/checkin/questions", get(app::checkin::checkin_questions))
        .route("/checkin", post(app::checkin::submit_checkin))
        .route("/checkin/history", get(app::checkin::checkin_history))
        // Content
        .route("/content/{kind}", get(app::content::list_content))
        .route("/daily-affirmation", get(app::content::daily_affirmation))
        .route("/weekly-affirmation", get(app::content::weekly_affirmation))
        // Posts
        .route(
            "/posts",
            get(app::posts::list_posts).post(app::posts::create_post),
        )
        .route(
            "/posts/{id}",
            get(app::posts::get_post).delete(app::posts::delete_post),
        )
        .route("/posts/{id}/flag", post(app::posts::flag_post))
        // Notifications
        .route("/notifications", get(app::notifications::inbox))
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.upload_max_bytes + MULTIPART_OVERHEAD;
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api/admin", admin_routes(upload_limit))
        .nest("/api/app", app_routes())
        .layer(from_fn_with_state(state.clone(), edge_guard))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
