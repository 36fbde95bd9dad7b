use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure envelope shared by every endpoint:
/// `{ "success": false, "kind": ..., "message": ..., "error"?: ... }`.
///
/// `error` carries the raw underlying error message and is only populated
/// for internal errors.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, axum::Json(self)).into_response()
    }
}
