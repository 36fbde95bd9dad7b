//! Response body helpers.

use axum::body::Body;
use axum::response::Response;
use serde_json::Value;

/// Collect a response body and parse it as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Build a JSON request body.
pub fn json_request_body(value: &Value) -> Body {
    Body::from(bytes::Bytes::from(value.to_string()))
}
