use stillwater_api::domain::types::{CodePurpose, OTP_MAX_ATTEMPTS};
use stillwater_api::error::ApiError;
use stillwater_api::usecase::auth::UserLoginUseCase;
use stillwater_api::usecase::password_reset::{
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase,
};
use stillwater_auth_types::token::TokenCodec;

use crate::helpers::{
    MockAdminRepo, MockCodeRepo, MockMailer, MockUserRepo, TEST_JWT_SECRET,
    stored_user_with_password, test_admin, test_user,
};

const NEW_PASSWORD: &str = "a brand new passphrase";

// ── RequestPasswordResetUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_keep_one_live_code_per_email() {
    let user = test_user();
    let codes = MockCodeRepo::empty();
    let mailer = MockMailer::new();
    let usecase = RequestPasswordResetUseCase {
        store: MockUserRepo::new(vec![stored_user_with_password(user.clone())]),
        codes: codes.clone(),
        mailer: mailer.clone(),
    };

    usecase.execute(&user.email).await.unwrap();
    usecase.execute(&user.email).await.unwrap();

    let live = codes.unconsumed(&user.email, CodePurpose::User);
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].code.len(), 6);
    assert!(live[0].code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(mailer.last_code(), Some(live[0].code.clone()));
}

#[tokio::test]
async fn should_scope_codes_by_principal_kind() {
    let admin = test_admin();
    let codes = MockCodeRepo::empty();
    let usecase = RequestPasswordResetUseCase {
        store: MockAdminRepo::new(vec![admin.clone()]),
        codes: codes.clone(),
        mailer: MockMailer::new(),
    };

    usecase.execute(&admin.admin.email).await.unwrap();

    assert_eq!(codes.unconsumed(&admin.admin.email, CodePurpose::Admin).len(), 1);
    assert!(codes.unconsumed(&admin.admin.email, CodePurpose::User).is_empty());
}

#[tokio::test]
async fn should_report_unknown_email() {
    let usecase = RequestPasswordResetUseCase {
        store: MockUserRepo::empty(),
        codes: MockCodeRepo::empty(),
        mailer: MockMailer::new(),
    };

    let result = usecase.execute("ghost@example.com").await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn should_surface_mail_delivery_failure() {
    let user = test_user();
    let usecase = RequestPasswordResetUseCase {
        store: MockUserRepo::new(vec![stored_user_with_password(user.clone())]),
        codes: MockCodeRepo::empty(),
        mailer: MockMailer::failing(),
    };

    let result = usecase.execute(&user.email).await;
    assert!(matches!(result, Err(ApiError::DeliveryFailed)));
}

// ── ResetPasswordUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_with_valid_code_once() {
    let user = test_user();
    let users = MockUserRepo::new(vec![stored_user_with_password(user.clone())]);
    let codes = MockCodeRepo::empty();
    let mailer = MockMailer::new();
    RequestPasswordResetUseCase {
        store: users.clone(),
        codes: codes.clone(),
        mailer: mailer.clone(),
    }
    .execute(&user.email)
    .await
    .unwrap();
    let code = mailer.last_code().unwrap();

    let reset = ResetPasswordUseCase {
        store: users.clone(),
        codes: codes.clone(),
    };
    reset
        .execute(ResetPasswordInput {
            email: user.email.clone(),
            code: code.clone(),
            new_password: NEW_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let login = UserLoginUseCase {
        users: users.clone(),
        codec: TokenCodec::new(TEST_JWT_SECRET),
    };
    assert!(login.execute(&user.email, NEW_PASSWORD).await.is_ok());

    let replay = reset
        .execute(ResetPasswordInput {
            email: user.email.clone(),
            code,
            new_password: "yet another passphrase".to_owned(),
        })
        .await;
    assert!(
        matches!(replay, Err(ApiError::InvalidCode)),
        "expected InvalidCode, got {replay:?}"
    );
}

#[tokio::test]
async fn should_reject_code_issued_for_the_other_principal_kind() {
    let user = test_user();
    let codes = MockCodeRepo::empty();
    let mailer = MockMailer::new();
    RequestPasswordResetUseCase {
        store: MockUserRepo::new(vec![stored_user_with_password(user.clone())]),
        codes: codes.clone(),
        mailer: mailer.clone(),
    }
    .execute(&user.email)
    .await
    .unwrap();

    let mut admin = test_admin();
    admin.admin.email = user.email.clone();
    let result = ResetPasswordUseCase {
        store: MockAdminRepo::new(vec![admin]),
        codes,
    }
    .execute(ResetPasswordInput {
        email: user.email.clone(),
        code: mailer.last_code().unwrap(),
        new_password: NEW_PASSWORD.to_owned(),
    })
    .await;
    assert!(matches!(result, Err(ApiError::InvalidCode)));
}

#[tokio::test]
async fn should_check_new_password_strength_before_consuming_code() {
    let user = test_user();
    let codes = MockCodeRepo::empty();
    let mailer = MockMailer::new();
    let users = MockUserRepo::new(vec![stored_user_with_password(user.clone())]);
    RequestPasswordResetUseCase {
        store: users.clone(),
        codes: codes.clone(),
        mailer: mailer.clone(),
    }
    .execute(&user.email)
    .await
    .unwrap();

    let result = ResetPasswordUseCase {
        store: users,
        codes: codes.clone(),
    }
    .execute(ResetPasswordInput {
        email: user.email.clone(),
        code: mailer.last_code().unwrap(),
        new_password: "short".to_owned(),
    })
    .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(codes.unconsumed(&user.email, CodePurpose::User).len(), 1);
}

#[tokio::test]
async fn should_revoke_code_after_repeated_wrong_guesses() {
    let user = test_user();
    let users = MockUserRepo::new(vec![stored_user_with_password(user.clone())]);
    let codes = MockCodeRepo::empty();
    let mailer = MockMailer::new();
    RequestPasswordResetUseCase {
        store: users.clone(),
        codes: codes.clone(),
        mailer: mailer.clone(),
    }
    .execute(&user.email)
    .await
    .unwrap();
    let code = mailer.last_code().unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let reset = ResetPasswordUseCase {
        store: users,
        codes: codes.clone(),
    };
    let attempt = |guess: &str| ResetPasswordInput {
        email: user.email.clone(),
        code: guess.to_owned(),
        new_password: NEW_PASSWORD.to_owned(),
    };

    for _ in 1..OTP_MAX_ATTEMPTS {
        let miss = reset.execute(attempt(wrong)).await;
        assert!(matches!(miss, Err(ApiError::InvalidCode)));
    }
    let live = codes.unconsumed(&user.email, CodePurpose::User);
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].attempts, OTP_MAX_ATTEMPTS - 1);

    let last_miss = reset.execute(attempt(wrong)).await;
    assert!(matches!(last_miss, Err(ApiError::InvalidCode)));
    assert!(codes.unconsumed(&user.email, CodePurpose::User).is_empty());

    let too_late = reset.execute(attempt(&code)).await;
    assert!(matches!(too_late, Err(ApiError::InvalidCode)));
}
