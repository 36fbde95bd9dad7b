use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use uuid::Uuid;

use stillwater_api::domain::types::{CodePurpose, OneTimeCode};
use stillwater_api::jobs::{JobRunner, TickReport};
use stillwater_api::usecase::notification::{SendDueNotificationsUseCase, SendNotificationUseCase};
use stillwater_domain::notification::{NotificationStatus, NotificationTarget};

use crate::helpers::{MockCodeRepo, MockNotificationRepo, MockUserRepo, test_notification};

fn code(email: &str, expires_in: Duration) -> OneTimeCode {
    let now = Utc::now();
    OneTimeCode {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        code: "123456".to_owned(),
        purpose: CodePurpose::User,
        expires_at: now + expires_in,
        consumed: false,
        attempts: 0,
        created_at: now,
    }
}

fn runner(
    codes: MockCodeRepo,
    notifications: MockNotificationRepo,
) -> JobRunner<MockCodeRepo, MockNotificationRepo, MockUserRepo> {
    JobRunner {
        codes,
        due: SendDueNotificationsUseCase {
            sender: SendNotificationUseCase {
                notifications,
                users: MockUserRepo::empty(),
            },
        },
        interval: StdDuration::from_secs(60),
    }
}

#[tokio::test]
async fn should_purge_expired_codes_and_send_due_notifications() {
    let codes = MockCodeRepo::empty();
    codes.codes.lock().unwrap().extend([
        code("old@example.com", Duration::minutes(-5)),
        code("live@example.com", Duration::minutes(5)),
    ]);
    let mut due = test_notification(NotificationStatus::Scheduled, NotificationTarget::All);
    due.scheduled_at = Some(Utc::now() - Duration::seconds(30));
    let notifications = MockNotificationRepo::new(vec![due.clone()]);

    let report = runner(codes.clone(), notifications.clone())
        .run_once(Utc::now())
        .await;

    assert_eq!(
        report,
        TickReport {
            purged_codes: 1,
            sent_notifications: 1,
        }
    );
    let remaining = codes.codes.lock().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].email, "live@example.com");
    assert_eq!(
        notifications.get(due.id).unwrap().status,
        NotificationStatus::Sent
    );
}

#[tokio::test]
async fn should_report_nothing_when_idle() {
    let report = runner(MockCodeRepo::empty(), MockNotificationRepo::default())
        .run_once(Utc::now())
        .await;
    assert_eq!(report, TickReport::default());
}
