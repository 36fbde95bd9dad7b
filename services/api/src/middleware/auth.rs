//! Principal extractors.
//!
//! Each handler asks for exactly one of [`AdminAuth`], [`UserAuth`] or
//! [`AnyAuth`]; a rejection short-circuits the request before the handler
//! parses anything else.

use axum::extract::FromRequestParts;
use http::HeaderMap;
use http::request::Parts;

use stillwater_auth_types::credential::{CredentialSource, extract_credential};
use stillwater_auth_types::token::TokenCodec;
use uuid::Uuid;

use crate::domain::repository::{AdminRepository, AppUserRepository};
use crate::domain::types::{Admin, AppUser, Principal};
use crate::error::ApiError;
use crate::state::AppState;

fn verified_subject(
    headers: &HeaderMap,
    source: CredentialSource,
    codec: &TokenCodec,
) -> Result<Uuid, ApiError> {
    let token = extract_credential(headers, source).ok_or(ApiError::Unauthenticated)?;
    codec.verify(&token).map_err(|_| ApiError::InvalidToken)
}

fn active(user: AppUser) -> Result<AppUser, ApiError> {
    if !user.is_active {
        return Err(ApiError::AccountDisabled);
    }
    Ok(user)
}

pub async fn resolve_admin<A: AdminRepository>(
    headers: &HeaderMap,
    codec: &TokenCodec,
    admins: &A,
) -> Result<Admin, ApiError> {
    let id = verified_subject(headers, CredentialSource::CookieThenBearer, codec)?;
    admins.find_by_id(id).await?.ok_or(ApiError::AdminNotFound)
}

pub async fn resolve_user<U: AppUserRepository>(
    headers: &HeaderMap,
    codec: &TokenCodec,
    users: &U,
) -> Result<AppUser, ApiError> {
    let id = verified_subject(headers, CredentialSource::BearerOnly, codec)?;
    active(users.find_by_id(id).await?.ok_or(ApiError::UserNotFound)?)
}

/// Admins are looked up first; the same token subject is then tried as an
/// end-user.
pub async fn resolve_any<A: AdminRepository, U: AppUserRepository>(
    headers: &HeaderMap,
    codec: &TokenCodec,
    admins: &A,
    users: &U,
) -> Result<Principal, ApiError> {
    let id = verified_subject(headers, CredentialSource::CookieThenBearer, codec)?;
    if let Some(admin) = admins.find_by_id(id).await? {
        return Ok(Principal::Admin(admin));
    }
    match users.find_by_id(id).await? {
        Some(user) => active(user).map(Principal::User),
        None => Err(ApiError::PrincipalNotFound),
    }
}

/// An authenticated dashboard administrator.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Admin);

/// An authenticated, active mobile-app user.
#[derive(Debug, Clone)]
pub struct UserAuth(pub AppUser);

/// Either kind of principal; only used on read-only routes.
#[derive(Debug, Clone)]
pub struct AnyAuth(pub Principal);

/// The calling admin when a credential was presented, `None` otherwise.
/// A presented but invalid credential still rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeAdmin(pub Option<Admin>);

// Values are pulled out of `parts` synchronously so the returned future is
// `'static` and does not borrow the request.

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let headers = parts.headers.clone();
        let codec = state.codec.clone();
        let admins = state.admin_repo();
        async move {
            resolve_admin(&headers, &codec, &admins)
                .await
                .map(AdminAuth)
        }
    }
}

impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let headers = parts.headers.clone();
        let codec = state.codec.clone();
        let users = state.user_repo();
        async move { resolve_user(&headers, &codec, &users).await.map(UserAuth) }
    }
}

impl FromRequestParts<AppState> for AnyAuth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let headers = parts.headers.clone();
        let codec = state.codec.clone();
        let admins = state.admin_repo();
        let users = state.user_repo();
        async move {
            resolve_any(&headers, &codec, &admins, &users)
                .await
                .map(AnyAuth)
        }
    }
}

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let headers = parts.headers.clone();
        let codec = state.codec.clone();
        let admins = state.admin_repo();
        async move {
            if extract_credential(&headers, CredentialSource::CookieThenBearer).is_none() {
                return Ok(MaybeAdmin(None));
            }
            resolve_admin(&headers, &codec, &admins)
                .await
                .map(|admin| MaybeAdmin(Some(admin)))
        }
    }
}
