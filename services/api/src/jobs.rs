//! Periodic background work: purging expired one-time codes and sending
//! scheduled notifications.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::repository::{
    AppUserRepository, NotificationRepository, OneTimeCodeRepository,
};
use crate::infra::db::{DbAppUserRepository, DbNotificationRepository, DbOneTimeCodeRepository};
use crate::state::AppState;
use crate::usecase::notification::{SendDueNotificationsUseCase, SendNotificationUseCase};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub purged_codes: u64,
    pub sent_notifications: u64,
}

pub struct JobRunner<C, N, U>
where
    C: OneTimeCodeRepository,
    N: NotificationRepository,
    U: AppUserRepository,
{
    pub codes: C,
    pub due: SendDueNotificationsUseCase<N, U>,
    pub interval: Duration,
}

impl<C, N, U> JobRunner<C, N, U>
where
    C: OneTimeCodeRepository,
    N: NotificationRepository,
    U: AppUserRepository,
{
    /// One pass over every job. A failing job is logged and does not stop
    /// the others.
    pub async fn run_once(&self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();

        match self.codes.purge_expired(now).await {
            Ok(purged) => report.purged_codes = purged,
            Err(e) => error!(error = %e, "purging expired codes failed"),
        }

        match self.due.execute(now).await {
            Ok(sent) => report.sent_notifications = sent,
            Err(e) => error!(error = %e, "sending scheduled notifications failed"),
        }

        if report != TickReport::default() {
            info!(
                purged_codes = report.purged_codes,
                sent_notifications = report.sent_notifications,
                "background jobs ran"
            );
        }
        report
    }
}

impl JobRunner<DbOneTimeCodeRepository, DbNotificationRepository, DbAppUserRepository> {
    pub fn from_state(state: &AppState, interval: Duration) -> Self {
        Self {
            codes: state.code_repo(),
            due: SendDueNotificationsUseCase {
                sender: SendNotificationUseCase {
                    notifications: state.notification_repo(),
                    users: state.user_repo(),
                },
            },
            interval,
        }
    }

    /// Spawn the job loop. The first tick runs immediately.
    pub fn start(self) -> JoinHandle<()> {
        let period = if self.interval.is_zero() {
            Duration::from_secs(1)
        } else {
            self.interval
        };
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.run_once(Utc::now()).await;
            }
        })
    }
}
