//! Request extractors whose rejections use the API failure envelope.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use stillwater_domain::query::ListParams;

use crate::error::ApiError;

/// Recognised list parameters parsed from the raw query string.
#[derive(Debug, Clone, Default)]
pub struct ListQuery(pub ListParams);

pub fn parse_list_params(query: Option<&str>) -> Result<ListParams, ApiError> {
    match query {
        None | Some("") => Ok(ListParams::default()),
        Some(query) => serde_qs::from_str(query)
            .map_err(|e| ApiError::validation(format!("invalid query string: {e}"))),
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ListQuery {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let params = parse_list_params(parts.uri.query()).map(ListQuery);
        async move { params }
    }
}

/// A JSON request body. Malformed bodies are rejected with `VALIDATION`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::validation(rejection.body_text())),
        }
    }
}

pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("{raw:?} is not a valid id")))
}
