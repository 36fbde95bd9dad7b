use chrono::{Duration, Utc};
use uuid::Uuid;

use stillwater_api::domain::filter::NotificationFilter;
use stillwater_api::domain::types::NotificationPatch;
use stillwater_api::error::ApiError;
use stillwater_api::usecase::notification::{
    CreateNotificationInput, CreateNotificationUseCase, ListNotificationsUseCase,
    NOTIFICATION_DISPATCH, SendDueNotificationsUseCase, SendNotificationUseCase,
    UpdateNotificationUseCase,
};
use stillwater_domain::notification::{NotificationStatus, NotificationTarget};

use crate::helpers::{
    MockNotificationRepo, MockUserRepo, StoredUser, test_notification, test_user,
};

fn create_input(scheduled: bool) -> CreateNotificationInput {
    CreateNotificationInput {
        title: "Breathe".to_owned(),
        message: "Take a minute.".to_owned(),
        target: NotificationTarget::All,
        target_user_ids: vec![Uuid::new_v4()],
        scheduled_at: scheduled.then(|| Utc::now() + Duration::hours(1)),
    }
}

// ── Create / Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_start_as_draft_or_scheduled() {
    let usecase = CreateNotificationUseCase {
        repo: MockNotificationRepo::default(),
    };

    let draft = usecase.execute(create_input(false)).await.unwrap();
    let scheduled = usecase.execute(create_input(true)).await.unwrap();

    assert_eq!(draft.status, NotificationStatus::Draft);
    assert_eq!(scheduled.status, NotificationStatus::Scheduled);
    assert!(draft.target_user_ids.is_empty());
}

#[tokio::test]
async fn should_require_recipients_for_user_target() {
    let usecase = CreateNotificationUseCase {
        repo: MockNotificationRepo::default(),
    };

    let result = usecase
        .execute(CreateNotificationInput {
            target: NotificationTarget::Users,
            target_user_ids: Vec::new(),
            ..create_input(false)
        })
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_move_to_draft_when_schedule_is_cleared() {
    let mut notification = test_notification(NotificationStatus::Scheduled, NotificationTarget::All);
    notification.scheduled_at = Some(Utc::now() + Duration::hours(2));
    let repo = MockNotificationRepo::new(vec![notification.clone()]);
    let usecase = UpdateNotificationUseCase { repo: repo.clone() };

    let updated = usecase
        .execute(
            notification.id,
            NotificationPatch {
                scheduled_at: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, NotificationStatus::Draft);
    assert_eq!(updated.scheduled_at, None);
}

#[tokio::test]
async fn should_refuse_to_edit_sent_notification() {
    let notification = test_notification(NotificationStatus::Sent, NotificationTarget::All);
    let usecase = UpdateNotificationUseCase {
        repo: MockNotificationRepo::new(vec![notification.clone()]),
    };

    let result = usecase
        .execute(
            notification.id,
            NotificationPatch {
                title: Some("Edited".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::AlreadySent)));
}

// ── SendNotificationUseCase ──────────────────────────────────────────────────

#[tokio::test]
async fn should_send_to_active_users_and_enqueue_one_event() {
    let active = test_user();
    let mut inactive = test_user();
    inactive.id = Uuid::new_v4();
    inactive.email = "gone@example.com".to_owned();
    inactive.is_active = false;
    let notification = test_notification(NotificationStatus::Draft, NotificationTarget::All);
    let repo = MockNotificationRepo::new(vec![notification.clone()]);
    let usecase = SendNotificationUseCase {
        notifications: repo.clone(),
        users: MockUserRepo::new(vec![StoredUser::new(active.clone()), StoredUser::new(inactive)]),
    };

    let sent = usecase.execute(notification.id).await.unwrap();

    assert_eq!(sent.status, NotificationStatus::Sent);
    assert!(sent.sent_at.is_some());
    let events = repo.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, NOTIFICATION_DISPATCH);
    assert_eq!(
        events[0].payload["recipients"],
        serde_json::json!([active.id])
    );
}

#[tokio::test]
async fn should_send_only_once() {
    let notification = test_notification(NotificationStatus::Draft, NotificationTarget::All);
    let repo = MockNotificationRepo::new(vec![notification.clone()]);
    let usecase = SendNotificationUseCase {
        notifications: repo.clone(),
        users: MockUserRepo::empty(),
    };

    usecase.execute(notification.id).await.unwrap();
    let again = usecase.execute(notification.id).await;

    assert!(matches!(again, Err(ApiError::AlreadySent)));
    assert_eq!(repo.events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_show_sent_notifications_in_recipient_inbox() {
    let user = test_user();
    let mut direct = test_notification(NotificationStatus::Draft, NotificationTarget::Users);
    direct.target_user_ids = vec![user.id];
    let mut other = test_notification(NotificationStatus::Draft, NotificationTarget::Users);
    other.target_user_ids = vec![Uuid::new_v4()];
    let broadcast = test_notification(NotificationStatus::Draft, NotificationTarget::All);
    let unsent = test_notification(NotificationStatus::Draft, NotificationTarget::All);
    let repo = MockNotificationRepo::new(vec![
        direct.clone(),
        other.clone(),
        broadcast.clone(),
        unsent,
    ]);
    let sender = SendNotificationUseCase {
        notifications: repo.clone(),
        users: MockUserRepo::new(vec![StoredUser::new(user.clone())]),
    };
    for id in [direct.id, other.id, broadcast.id] {
        sender.execute(id).await.unwrap();
    }

    let inbox = ListNotificationsUseCase { repo }
        .execute(&NotificationFilter::inbox(user.id), None)
        .await
        .unwrap();

    let mut ids: Vec<Uuid> = inbox.items.iter().map(|n| n.id).collect();
    ids.sort();
    let mut expected = vec![direct.id, broadcast.id];
    expected.sort();
    assert_eq!(ids, expected);
}

// ── SendDueNotificationsUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_send_due_scheduled_notifications_only() {
    let now = Utc::now();
    let mut due = test_notification(NotificationStatus::Scheduled, NotificationTarget::All);
    due.scheduled_at = Some(now - Duration::minutes(1));
    let mut later = test_notification(NotificationStatus::Scheduled, NotificationTarget::All);
    later.scheduled_at = Some(now + Duration::hours(1));
    let repo = MockNotificationRepo::new(vec![due.clone(), later.clone()]);
    let usecase = SendDueNotificationsUseCase {
        sender: SendNotificationUseCase {
            notifications: repo.clone(),
            users: MockUserRepo::empty(),
        },
    };

    assert_eq!(usecase.execute(now).await.unwrap(), 1);
    assert_eq!(repo.get(due.id).unwrap().status, NotificationStatus::Sent);
    assert_eq!(repo.get(later.id).unwrap().status, NotificationStatus::Scheduled);
    assert_eq!(usecase.execute(now).await.unwrap(), 0);
}
