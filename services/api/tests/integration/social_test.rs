use stillwater_api::domain::types::{SocialIdentity, SocialProvider};
use stillwater_api::error::ApiError;
use stillwater_api::usecase::social::{SocialLoginInput, SocialLoginUseCase};
use stillwater_auth_types::token::TokenCodec;

use crate::helpers::{
    MockUserRepo, MockVerifier, StoredUser, TEST_JWT_SECRET, stored_user_with_password,
    test_user,
};

fn verifier(provider: SocialProvider, subject: &str, email: Option<&str>) -> MockVerifier {
    MockVerifier {
        token: "provider-token".to_owned(),
        identity: SocialIdentity {
            provider,
            subject: subject.to_owned(),
            email: email.map(str::to_owned),
            name: Some("From Provider".to_owned()),
        },
    }
}

fn input(provider: SocialProvider, name: Option<&str>) -> SocialLoginInput {
    SocialLoginInput {
        provider,
        id_token: "provider-token".to_owned(),
        name: name.map(str::to_owned),
    }
}

#[tokio::test]
async fn should_sign_in_user_already_linked_to_provider() {
    let mut user = test_user();
    user.google_id = Some("g-1".to_owned());
    let users = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let usecase = SocialLoginUseCase {
        users: users.clone(),
        verifier: verifier(SocialProvider::Google, "g-1", None),
        codec: TokenCodec::new(TEST_JWT_SECRET),
    };

    let session = usecase
        .execute(input(SocialProvider::Google, None))
        .await
        .unwrap();
    assert_eq!(session.user.id, user.id);
    assert_eq!(users.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_link_provider_to_account_with_matching_email() {
    let user = test_user();
    let users = MockUserRepo::new(vec![stored_user_with_password(user.clone())]);
    let usecase = SocialLoginUseCase {
        users: users.clone(),
        verifier: verifier(SocialProvider::Apple, "a-9", Some("USER@example.com")),
        codec: TokenCodec::new(TEST_JWT_SECRET),
    };

    let session = usecase
        .execute(input(SocialProvider::Apple, None))
        .await
        .unwrap();

    assert_eq!(session.user.id, user.id);
    assert_eq!(session.user.apple_id.as_deref(), Some("a-9"));
    assert!(session.user.has_password);
}

#[tokio::test]
async fn should_create_password_less_account_for_new_identity() {
    let users = MockUserRepo::empty();
    let usecase = SocialLoginUseCase {
        users: users.clone(),
        verifier: verifier(SocialProvider::Apple, "a-1", Some("fresh@example.com")),
        codec: TokenCodec::new(TEST_JWT_SECRET),
    };

    let session = usecase
        .execute(input(SocialProvider::Apple, Some("Given Name")))
        .await
        .unwrap();

    assert_eq!(session.user.email, "fresh@example.com");
    assert_eq!(session.user.name.as_deref(), Some("Given Name"));
    assert!(!session.user.has_password);
    assert!(users.stored(session.user.id).unwrap().password_hash.is_none());
}

#[tokio::test]
async fn should_reject_identity_without_email_when_no_link_exists() {
    let usecase = SocialLoginUseCase {
        users: MockUserRepo::empty(),
        verifier: verifier(SocialProvider::Google, "g-2", None),
        codec: TokenCodec::new(TEST_JWT_SECRET),
    };

    let result = usecase.execute(input(SocialProvider::Google, None)).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_propagate_verifier_rejection() {
    let usecase = SocialLoginUseCase {
        users: MockUserRepo::empty(),
        verifier: verifier(SocialProvider::Google, "g-3", Some("x@example.com")),
        codec: TokenCodec::new(TEST_JWT_SECRET),
    };

    let result = usecase
        .execute(SocialLoginInput {
            provider: SocialProvider::Google,
            id_token: "forged".to_owned(),
            name: None,
        })
        .await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_refuse_social_login_for_deactivated_user() {
    let mut user = test_user();
    user.google_id = Some("g-4".to_owned());
    user.is_active = false;
    let usecase = SocialLoginUseCase {
        users: MockUserRepo::new(vec![StoredUser::new(user)]),
        verifier: verifier(SocialProvider::Google, "g-4", None),
        codec: TokenCodec::new(TEST_JWT_SECRET),
    };

    let result = usecase.execute(input(SocialProvider::Google, None)).await;
    assert!(matches!(result, Err(ApiError::AccountDisabled)));
}
