use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Success envelope: `{ "success": true, ...payload }`.
///
/// The payload must serialize as a JSON object; its fields are flattened
/// next to `success`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    /// Respond with `201 Created`.
    pub fn created(payload: T) -> (StatusCode, Self) {
        (StatusCode::CREATED, Self::new(payload))
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}

/// Payload carrying only a human-readable message.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}
