//! Expiration enforcement sweep.
//!
//! Runs at a fixed short interval. For every past-due subscription it
//! revokes membership in every configured channel, deletes the record, and
//! notifies the user. Per-channel revocation failures are logged and
//! skipped; the record is deleted regardless, so one broken channel cannot
//! keep a user in the sweep forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use super::lifecycle::{LifecycleEngine, SubscriptionError};
use crate::adapters::telegram::messages;
use crate::domain::Timestamp;
use crate::ports::ChannelGateway;

/// Background service enforcing subscription expiry.
pub struct ExpirationSweeper {
    engine: Arc<LifecycleEngine>,
    gateway: Arc<dyn ChannelGateway>,
    interval: Duration,
}

impl ExpirationSweeper {
    /// Creates a sweeper that fires every `interval`.
    pub fn new(
        engine: Arc<LifecycleEngine>,
        gateway: Arc<dyn ChannelGateway>,
        interval: Duration,
    ) -> Self {
        Self {
            engine,
            gateway,
            interval,
        }
    }

    /// Run the sweep loop until the shutdown signal flips to true.
    ///
    /// Sweep failures are logged and the loop continues; nothing here may
    /// take the process down.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once(Timestamp::now()).await {
                        error!(error = %e, "expiration sweep failed");
                    }
                }
            }
        }
    }

    /// Run exactly one sweep pass. Returns the number of users removed.
    pub async fn sweep_once(&self, now: Timestamp) -> Result<usize, SubscriptionError> {
        let due = self.engine.due_for_removal(now).await?;
        debug!(count = due.len(), "expiration sweep pass");

        let mut removed = 0;
        for sub in due {
            for &channel_id in self.gateway.channels() {
                if let Err(e) = self.gateway.revoke_access(channel_id, sub.user_id).await {
                    warn!(
                        user_id = %sub.user_id,
                        channel_id = %channel_id,
                        error = %e,
                        "revocation failed, continuing"
                    );
                }
            }

            self.engine.expire(sub.user_id).await?;
            removed += 1;
            info!(user_id = %sub.user_id, expired_at = %sub.expires_at, "subscriber removed");

            let notice = messages::removed_from_channels();
            if let Err(e) = self.gateway.notify_user(sub.user_id, notice).await {
                warn!(user_id = %sub.user_id, error = %e, "removal notice failed");
            }
        }
        Ok(removed)
    }
}
