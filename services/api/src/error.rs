use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use stillwater_core::error::ErrorEnvelope;
use stillwater_domain::answer::AnswerError;
use stillwater_domain::query::QueryError;

/// API error variants. Each maps to one status code and one `kind`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // ── 400 ──
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
    #[error("invalid answer for question {question_id}: {source}")]
    InvalidAnswer {
        question_id: Uuid,
        source: AnswerError,
    },
    #[error("question {0} does not exist or is not active")]
    InvalidQuestion(Uuid),
    #[error("invalid or expired code")]
    InvalidCode,
    #[error("sign-in with this provider is not enabled")]
    ProviderDisabled,

    // ── 401 ──
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid email or password")]
    InvalidCredentials,

    // ── 403 ──
    #[error("account is disabled")]
    AccountDisabled,
    #[error("forbidden")]
    Forbidden,

    // ── 404 ──
    #[error("admin not found")]
    AdminNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("account not found")]
    PrincipalNotFound,
    #[error("question not found")]
    QuestionNotFound,
    #[error("content not found")]
    ContentNotFound,
    #[error("no affirmation available")]
    NoAffirmation,
    #[error("post not found")]
    PostNotFound,
    #[error("notification not found")]
    NotificationNotFound,

    // ── 409 ──
    #[error("email already registered")]
    EmailTaken,
    #[error("post already flagged")]
    AlreadyFlagged,
    #[error("notification already sent")]
    AlreadySent,

    // ── 413 / 415 ──
    #[error("file too large")]
    PayloadTooLarge,
    #[error("unsupported file type")]
    UnsupportedMediaType,

    // ── 500 ──
    #[error("failed to deliver code")]
    DeliveryFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::InvalidAnswer { .. } => "INVALID_ANSWER",
            Self::InvalidQuestion(_) => "INVALID_QUESTION",
            Self::InvalidCode => "INVALID_CODE",
            Self::ProviderDisabled => "PROVIDER_DISABLED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::Forbidden => "FORBIDDEN",
            Self::AdminNotFound => "ADMIN_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::PrincipalNotFound => "PRINCIPAL_NOT_FOUND",
            Self::QuestionNotFound => "QUESTION_NOT_FOUND",
            Self::ContentNotFound => "CONTENT_NOT_FOUND",
            Self::NoAffirmation => "NO_AFFIRMATION",
            Self::PostNotFound => "POST_NOT_FOUND",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::AlreadyFlagged => "ALREADY_FLAGGED",
            Self::AlreadySent => "ALREADY_SENT",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidQuery(_)
            | Self::InvalidAnswer { .. }
            | Self::InvalidQuestion(_)
            | Self::InvalidCode
            | Self::ProviderDisabled => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountDisabled | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::AdminNotFound
            | Self::UserNotFound
            | Self::PrincipalNotFound
            | Self::QuestionNotFound
            | Self::ContentNotFound
            | Self::NoAffirmation
            | Self::PostNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken | Self::AlreadyFlagged | Self::AlreadySent => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::DeliveryFailed | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut envelope = ErrorEnvelope::new(self.kind(), self.to_string());
        // Only 500s are logged here; TraceLayer records method/uri/status for every request.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            // TODO: gate the raw detail behind a config flag once the dashboard stops reading `error`.
            envelope = envelope.with_detail(format!("{e:#}"));
        }
        envelope.into_response_with(status)
    }
}
