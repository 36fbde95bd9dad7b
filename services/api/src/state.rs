use sea_orm::DatabaseConnection;

use stillwater_auth_types::cookie::CookieSettings;
use stillwater_auth_types::token::TokenCodec;

use crate::config::ApiConfig;
use crate::infra::db::{
    DbAdminRepository, DbAppUserRepository, DbContentRepository, DbNotificationRepository,
    DbOneTimeCodeRepository, DbPostRepository, DbQuestionRepository,
};
use crate::infra::mailer::OutboxOtpMailer;
use crate::infra::social::JwksIdTokenVerifier;
use crate::infra::storage::HttpObjectStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub codec: TokenCodec,
    pub cookies: CookieSettings,
    pub upload_max_bytes: usize,
    pub storage: HttpObjectStore,
    pub verifier: JwksIdTokenVerifier,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &ApiConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            db,
            codec: TokenCodec::new(&config.jwt_secret),
            cookies: CookieSettings {
                domain: config.cookie_domain.clone(),
                secure: config.cookie_secure,
            },
            upload_max_bytes: config.upload_max_bytes,
            storage: HttpObjectStore::new(http.clone(), config.storage.clone()),
            verifier: JwksIdTokenVerifier::new(
                http,
                config.google_client_id.clone(),
                config.apple_client_id.clone(),
            ),
        }
    }

    pub fn admin_repo(&self) -> DbAdminRepository {
        DbAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbAppUserRepository {
        DbAppUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbOneTimeCodeRepository {
        DbOneTimeCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn question_repo(&self) -> DbQuestionRepository {
        DbQuestionRepository {
            db: self.db.clone(),
        }
    }

    pub fn content_repo(&self) -> DbContentRepository {
        DbContentRepository {
            db: self.db.clone(),
        }
    }

    pub fn post_repo(&self) -> DbPostRepository {
        DbPostRepository {
            db: self.db.clone(),
        }
    }

    pub fn notification_repo(&self) -> DbNotificationRepository {
        DbNotificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_mailer(&self) -> OutboxOtpMailer {
        OutboxOtpMailer {
            db: self.db.clone(),
        }
    }
}
