use serde_json::json;
use uuid::Uuid;

use stillwater_api::domain::filter::UserFilter;
use stillwater_api::domain::types::AppUserPatch;
use stillwater_api::error::ApiError;
use stillwater_api::usecase::user::{
    GetUserUseCase, ListUsersUseCase, SetUserActiveUseCase, UpdateProfileUseCase,
};
use stillwater_domain::pagination::PageRequest;

use crate::helpers::{MockUserRepo, StoredUser, test_user};

fn two_users() -> MockUserRepo {
    let active = test_user();
    let mut inactive = test_user();
    inactive.id = Uuid::new_v4();
    inactive.email = "idle@example.com".to_owned();
    inactive.is_active = false;
    MockUserRepo::new(vec![StoredUser::new(active), StoredUser::new(inactive)])
}

#[tokio::test]
async fn should_list_users_with_and_without_pagination() {
    let usecase = ListUsersUseCase { repo: two_users() };

    let all = usecase.execute(&UserFilter::default(), None).await.unwrap();
    assert_eq!(all.items.len(), 2);
    assert!(all.pagination.is_none());

    let paged = usecase
        .execute(&UserFilter::default(), Some(PageRequest::new(1, 1).unwrap()))
        .await
        .unwrap();
    assert_eq!(paged.items.len(), 1);
    let info = paged.pagination.unwrap();
    assert_eq!((info.total, info.pages), (2, 2));
}

#[tokio::test]
async fn should_filter_users_by_activity() {
    let usecase = ListUsersUseCase { repo: two_users() };
    let filter = UserFilter {
        active: Some(false),
        ..Default::default()
    };

    let result = usecase.execute(&filter, None).await.unwrap();
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].email, "idle@example.com");
}

#[tokio::test]
async fn should_deactivate_user() {
    let user = test_user();
    let repo = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let usecase = SetUserActiveUseCase { repo: repo.clone() };

    let updated = usecase.execute(user.id, false).await.unwrap();

    assert!(!updated.is_active);
    assert!(!repo.stored(user.id).unwrap().user.is_active);
}

#[tokio::test]
async fn should_report_unknown_user() {
    let repo = MockUserRepo::empty();

    let get = GetUserUseCase { repo: repo.clone() }
        .execute(Uuid::new_v4())
        .await;
    assert!(matches!(get, Err(ApiError::UserNotFound)));

    let toggle = SetUserActiveUseCase { repo }
        .execute(Uuid::new_v4(), true)
        .await;
    assert!(matches!(toggle, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn should_trim_profile_name_and_reject_non_object_device_sync() {
    let user = test_user();
    let repo = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let usecase = UpdateProfileUseCase { repo: repo.clone() };

    let updated = usecase
        .execute(
            user.id,
            AppUserPatch {
                name: Some(Some("  Mira  ".to_owned())),
                device_sync: Some(Some(json!({ "steps": true }))),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Mira"));
    assert_eq!(updated.device_sync, Some(json!({ "steps": true })));

    let rejected = usecase
        .execute(
            user.id,
            AppUserPatch {
                name: None,
                device_sync: Some(Some(json!([1, 2]))),
            },
        )
        .await;
    assert!(matches!(rejected, Err(ApiError::Validation(_))));
}
