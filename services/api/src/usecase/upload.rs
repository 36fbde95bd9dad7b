use bytes::Bytes;
use uuid::Uuid;

use crate::domain::repository::ObjectStore;
use crate::error::ApiError;

pub const DEFAULT_FOLDER: &str = "uploads";

/// Accepted image MIME types and the extension stored objects get.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Lowercase `a-z0-9-_` segments separated by `/`.
fn sanitize_folder(folder: Option<&str>) -> Result<String, ApiError> {
    let folder = folder.map(str::trim).unwrap_or_default().trim_matches('/');
    if folder.is_empty() {
        return Ok(DEFAULT_FOLDER.to_owned());
    }
    let valid = folder.split('/').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    });
    if !valid {
        return Err(ApiError::validation("folder is invalid"));
    }
    Ok(folder.to_owned())
}

pub struct UploadInput {
    pub content_type: Option<String>,
    pub body: Bytes,
    pub folder: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub url: String,
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

pub struct UploadImageUseCase<S: ObjectStore> {
    pub store: S,
    pub max_bytes: usize,
}

impl<S: ObjectStore> UploadImageUseCase<S> {
    pub async fn execute(&self, input: UploadInput) -> Result<UploadedImage, ApiError> {
        let content_type = input
            .content_type
            .ok_or(ApiError::UnsupportedMediaType)?;
        let ext = image_extension(&content_type).ok_or(ApiError::UnsupportedMediaType)?;
        if input.body.is_empty() {
            return Err(ApiError::validation("image is empty"));
        }
        if input.body.len() > self.max_bytes {
            return Err(ApiError::PayloadTooLarge);
        }

        let folder = sanitize_folder(input.folder.as_deref())?;
        let key = format!("{folder}/{}.{ext}", Uuid::new_v4());
        let size = input.body.len();
        let url = self.store.put(&key, &content_type, input.body).await?;
        tracing::info!(key = %key, size, "image uploaded");

        Ok(UploadedImage {
            url,
            key,
            content_type,
            size,
        })
    }
}
