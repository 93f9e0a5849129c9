//! Day-ahead renewal reminders.
//!
//! Fires once per day at a configured UTC wall-clock hour and messages
//! every unreminded user expiring in the next-day window. Each delivered
//! reminder is stamped on the record, so a restart near the trigger time
//! cannot double-send; a failed delivery is not stamped and is retried the
//! next day.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use super::lifecycle::{LifecycleEngine, SubscriptionError};
use crate::adapters::telegram::messages;
use crate::domain::Timestamp;
use crate::ports::ChannelGateway;

/// Background service delivering expiry reminders.
pub struct ReminderService {
    engine: Arc<LifecycleEngine>,
    gateway: Arc<dyn ChannelGateway>,
    hour_utc: u32,
}

impl ReminderService {
    /// Creates a service that fires daily at `hour_utc:00`.
    pub fn new(engine: Arc<LifecycleEngine>, gateway: Arc<dyn ChannelGateway>, hour_utc: u32) -> Self {
        Self {
            engine,
            gateway,
            hour_utc,
        }
    }

    /// Run the daily loop until the shutdown signal flips to true.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let wait = duration_until_hour(Utc::now(), self.hour_utc);
            debug!(?wait, "next reminder pass scheduled");
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                }
                _ = time::sleep(wait) => {
                    if let Err(e) = self.remind_once(Timestamp::now()).await {
                        error!(error = %e, "reminder sweep failed");
                    }
                }
            }
        }
    }

    /// Run exactly one reminder pass. Returns the number of users reminded.
    pub async fn remind_once(&self, now: Timestamp) -> Result<usize, SubscriptionError> {
        let due = self.engine.due_for_reminder(now).await?;
        debug!(count = due.len(), "reminder pass");

        let mut reminded = 0;
        for sub in due {
            match self
                .gateway
                .notify_user(sub.user_id, messages::expiry_reminder())
                .await
            {
                Ok(()) => {
                    self.engine.mark_reminded(sub.user_id, now).await?;
                    reminded += 1;
                    info!(user_id = %sub.user_id, expires_at = %sub.expires_at, "reminder sent");
                }
                Err(e) => {
                    // Not stamped: retried on the next pass.
                    warn!(user_id = %sub.user_id, error = %e, "reminder delivery failed");
                }
            }
        }
        Ok(reminded)
    }
}

/// Time to wait from `now` until the next occurrence of `hour:00` UTC.
fn duration_until_hour(now: chrono::DateTime<Utc>, hour: u32) -> Duration {
    let today_at = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .expect("validated hour < 24")
        .and_utc();
    let next = if today_at > now {
        today_at
    } else {
        today_at + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or(Duration::ZERO)
}
