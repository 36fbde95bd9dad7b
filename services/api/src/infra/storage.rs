use anyhow::Context as _;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;

use crate::config::StorageConfig;
use crate::domain::repository::ObjectStore;
use crate::error::ApiError;

/// Object storage reached over plain HTTP `PUT` with a bearer key.
#[derive(Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpObjectStore {
    pub fn new(client: reqwest::Client, config: StorageConfig) -> Self {
        Self { client, config }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.config.public_url)
    }
}

impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> Result<String, ApiError> {
        let url = format!("{}/{key}", self.config.base_url);
        self.client
            .put(&url)
            .bearer_auth(&self.config.api_key)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .context("upload object")?
            .error_for_status()
            .context("object storage rejected upload")?;
        Ok(self.public_url(key))
    }
}
