use std::str::FromStr;

use anyhow::{Context as _, anyhow};

/// Object storage endpoint used by the upload route.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL objects are `PUT` to, e.g. `https://storage.internal/bucket`.
    pub base_url: String,
    /// Base URL returned to clients, e.g. `https://cdn.example.com`.
    pub public_url: String,
    pub api_key: String,
}

/// API service configuration loaded from environment variables.
/// A `.env` file in the working directory is loaded first when present.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for admin and end-user tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Admin cookie Domain attribute. Env var: `COOKIE_DOMAIN`.
    pub cookie_domain: Option<String>,
    /// Admin cookie Secure attribute (default true). Env var: `COOKIE_SECURE`.
    pub cookie_secure: bool,
    pub storage: StorageConfig,
    /// Maximum accepted upload size in bytes (default 5 MiB). Env var: `UPLOAD_MAX_BYTES`.
    pub upload_max_bytes: usize,
    /// Google sign-in is disabled when unset. Env var: `GOOGLE_CLIENT_ID`.
    pub google_client_id: Option<String>,
    /// Apple sign-in is disabled when unset. Env var: `APPLE_CLIENT_ID`.
    pub apple_client_id: Option<String>,
    /// Background job period in seconds (default 60). Env var: `JOB_INTERVAL_SECS`.
    pub job_interval_secs: u64,
}

pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{key} must be set"));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_port: parse_or(get("API_PORT"), "API_PORT", 3000)?,
            cookie_domain: get("COOKIE_DOMAIN"),
            cookie_secure: parse_or(get("COOKIE_SECURE"), "COOKIE_SECURE", true)?,
            storage: StorageConfig {
                base_url: required("STORAGE_BASE_URL")?
                    .trim_end_matches('/')
                    .to_owned(),
                public_url: required("STORAGE_PUBLIC_URL")?
                    .trim_end_matches('/')
                    .to_owned(),
                api_key: required("STORAGE_API_KEY")?,
            },
            upload_max_bytes: parse_or(
                get("UPLOAD_MAX_BYTES"),
                "UPLOAD_MAX_BYTES",
                DEFAULT_UPLOAD_MAX_BYTES,
            )?,
            google_client_id: get("GOOGLE_CLIENT_ID"),
            apple_client_id: get("APPLE_CLIENT_ID"),
            job_interval_secs: parse_or(get("JOB_INTERVAL_SECS"), "JOB_INTERVAL_SECS", 60)?,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v.trim().parse().with_context(|| format!("invalid {key}")),
        None => Ok(default),
    }
}
