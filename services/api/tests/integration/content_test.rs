use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use stillwater_api::domain::types::ContentPatch;
use stillwater_api::error::ApiError;
use stillwater_api::usecase::content::{
    CreateContentInput, CreateContentUseCase, CurrentAffirmationUseCase, UpdateContentUseCase,
};
use stillwater_domain::content::ContentKind;
use stillwater_domain::query::Period;

use crate::helpers::{MockContentRepo, test_content};

// ── CurrentAffirmationUseCase ────────────────────────────────────────────────

#[tokio::test]
async fn should_report_missing_weekly_affirmation() {
    let now = Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0).unwrap();
    let last_month = now - Duration::days(30);
    let usecase = CurrentAffirmationUseCase {
        repo: MockContentRepo::new(vec![test_content(
            ContentKind::WeeklyAffirmation,
            Some(last_month),
        )]),
    };

    let result = usecase.execute(Period::ThisWeek, now).await;
    assert!(matches!(result, Err(ApiError::NoAffirmation)));
}

#[tokio::test]
async fn should_prefer_scheduled_item_over_unscheduled_fallback() {
    let now = Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0).unwrap();
    let fallback = test_content(ContentKind::Affirmation, None);
    let today = test_content(
        ContentKind::Affirmation,
        Some(Utc.with_ymd_and_hms(2026, 3, 11, 6, 0, 0).unwrap()),
    );
    let usecase = CurrentAffirmationUseCase {
        repo: MockContentRepo::new(vec![fallback.clone(), today.clone()]),
    };

    let item = usecase.execute(Period::Today, now).await.unwrap();
    assert_eq!(item.id, today.id);
}

#[tokio::test]
async fn should_skip_unpublished_affirmations() {
    let now = Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0).unwrap();
    let mut draft = test_content(ContentKind::Affirmation, Some(now));
    draft.is_published = false;
    let usecase = CurrentAffirmationUseCase {
        repo: MockContentRepo::new(vec![draft]),
    };

    let result = usecase.execute(Period::Today, now).await;
    assert!(matches!(result, Err(ApiError::NoAffirmation)));
}

// ── Create / Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_default_new_content_to_live() {
    let repo = MockContentRepo::default();
    let usecase = CreateContentUseCase { repo: repo.clone() };

    let item = usecase
        .execute(
            ContentKind::Quote,
            CreateContentInput {
                body: "Breathe in.".to_owned(),
                tags: vec!["Calm".to_owned(), "calm".to_owned()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(item.is_active && item.is_published && !item.is_archived);
    assert_eq!(item.tags, vec!["calm"]);
    assert_eq!(repo.items.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_not_update_content_of_another_kind() {
    let item = test_content(ContentKind::Quote, None);
    let usecase = UpdateContentUseCase {
        repo: MockContentRepo::new(vec![item.clone()]),
    };

    let result = usecase
        .execute(
            ContentKind::Media,
            item.id,
            ContentPatch {
                body: Some("changed".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::ContentNotFound)));

    let missing = usecase
        .execute(ContentKind::Quote, Uuid::new_v4(), ContentPatch::default())
        .await;
    assert!(matches!(missing, Err(ApiError::ContentNotFound)));
}
