use uuid::Uuid;

use stillwater_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::UserFilter;
use crate::domain::repository::AppUserRepository;
use crate::domain::types::{AppUser, AppUserPatch};
use crate::error::ApiError;

pub struct ListUsersUseCase<R: AppUserRepository> {
    pub repo: R,
}

impl<R: AppUserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        filter: &UserFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<AppUser>, ApiError> {
        self.repo.list(filter, page).await
    }
}

pub struct GetUserUseCase<R: AppUserRepository> {
    pub repo: R,
}

impl<R: AppUserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<AppUser, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

pub struct SetUserActiveUseCase<R: AppUserRepository> {
    pub repo: R,
}

impl<R: AppUserRepository> SetUserActiveUseCase<R> {
    pub async fn execute(&self, id: Uuid, is_active: bool) -> Result<AppUser, ApiError> {
        let user = self
            .repo
            .set_active(id, is_active)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        tracing::info!(user_id = %id, is_active, "user activation changed");
        Ok(user)
    }
}

pub struct UpdateProfileUseCase<R: AppUserRepository> {
    pub repo: R,
}

impl<R: AppUserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(&self, id: Uuid, mut patch: AppUserPatch) -> Result<AppUser, ApiError> {
        if let Some(name) = patch.name.take() {
            patch.name = Some(name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()));
        }
        if let Some(Some(sync)) = patch.device_sync.as_ref() {
            if !sync.is_object() {
                return Err(ApiError::validation("device_sync must be an object"));
            }
        }
        self.repo
            .update_profile(id, &patch)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}
