use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use stillwater_core::envelope::Success;

use crate::error::ApiError;
use crate::middleware::auth::AdminAuth;
use crate::state::AppState;
use crate::usecase::upload::{UploadImageUseCase, UploadInput, UploadedImage};

const IMAGE_FIELD: &str = "image";
const FOLDER_FIELD: &str = "folder";

#[derive(Serialize)]
pub struct UploadBody {
    pub url: String,
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

impl From<UploadedImage> for UploadBody {
    fn from(u: UploadedImage) -> Self {
        Self {
            url: u.url,
            key: u.key,
            content_type: u.content_type,
            size: u.size,
        }
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::validation(e.body_text())
    }
}

// ── POST /api/admin/upload ───────────────────────────────────────────────────

pub async fn upload_image(
    _admin: AdminAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut image = None;
    let mut folder = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some(IMAGE_FIELD) => {
                let content_type = field.content_type().map(str::to_owned);
                let body = field.bytes().await.map_err(multipart_error)?;
                image = Some((content_type, body));
            }
            Some(FOLDER_FIELD) => {
                folder = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (content_type, body) =
        image.ok_or_else(|| ApiError::validation("multipart field `image` is required"))?;
    let usecase = UploadImageUseCase {
        store: state.storage.clone(),
        max_bytes: state.upload_max_bytes,
    };
    let uploaded = usecase
        .execute(UploadInput {
            content_type,
            body,
            folder,
        })
        .await?;
    Ok(Success::created(UploadBody::from(uploaded)))
}
