//! End-to-end lifecycle tests.
//!
//! Drives the engine, the invite delivery, and both sweeps through one
//! realistic flow each, against the in-memory store and a recording
//! gateway. No Telegram traffic involved.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use portero::adapters::telegram::messages;
use portero::adapters::InMemorySubscriptionStore;
use portero::application::{deliver_invites, ExpirationSweeper, LifecycleEngine, ReminderService};
use portero::domain::{ChannelId, Tier, Timestamp, UserId};
use portero::ports::{ChannelGateway, GatewayError, InviteLink, SubscriptionStore};

/// Gateway that records every outbound call.
struct RecordingGateway {
    channels: Vec<ChannelId>,
    invites: Mutex<Vec<ChannelId>>,
    revoked: Mutex<Vec<(ChannelId, UserId)>>,
    messages: Mutex<Vec<(UserId, String)>>,
}

impl RecordingGateway {
    fn new(channels: Vec<ChannelId>) -> Self {
        Self {
            channels,
            invites: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        }
    }

    fn messages_to(&self, user_id: UserId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl ChannelGateway for RecordingGateway {
    fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    async fn create_invite(&self, channel_id: ChannelId) -> Result<InviteLink, GatewayError> {
        self.invites.lock().unwrap().push(channel_id);
        Ok(InviteLink {
            channel_id,
            url: format!("https://t.me/+join{}", channel_id),
        })
    }

    async fn revoke_access(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), GatewayError> {
        self.revoked.lock().unwrap().push((channel_id, user_id));
        Ok(())
    }

    async fn notify_user(&self, user_id: UserId, text: &str) -> Result<(), GatewayError> {
        self.messages
            .lock()
            .unwrap()
            .push((user_id, text.to_string()));
        Ok(())
    }
}

struct Fixture {
    store: Arc<InMemorySubscriptionStore>,
    engine: Arc<LifecycleEngine>,
    gateway: Arc<RecordingGateway>,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemorySubscriptionStore::new());
    let engine = Arc::new(LifecycleEngine::new(store.clone()));
    let gateway = Arc::new(RecordingGateway::new(vec![
        ChannelId::new(-1002112042376),
        ChannelId::new(-1002243092863),
    ]));
    Fixture {
        store,
        engine,
        gateway,
    }
}

#[tokio::test]
async fn trial_lifecycle_from_claim_to_removal() {
    let f = fixture();
    let user = UserId::new(1);
    let t0 = Timestamp::now();

    // Claim the trial and deliver invites, one per channel.
    f.engine.activate_trial(user, t0).await.unwrap();
    let delivered = deliver_invites(f.gateway.as_ref(), user, messages::invite_for_trial)
        .await
        .unwrap();
    assert_eq!(delivered, 2);
    assert_eq!(f.gateway.invites.lock().unwrap().len(), 2);

    // A second claim is refused outright.
    assert!(f
        .engine
        .activate_trial(user, t0.plus(Duration::minutes(5)))
        .await
        .is_err());

    // Thirty-one minutes later the sweep revokes both channels and deletes.
    let sweeper = ExpirationSweeper::new(
        f.engine.clone(),
        f.gateway.clone(),
        StdDuration::from_secs(30),
    );
    let removed = sweeper
        .sweep_once(t0.plus(Duration::minutes(31)))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(f.gateway.revoked.lock().unwrap().len(), 2);
    assert_eq!(f.store.find_subscription(user).await.unwrap(), None);

    // Nine minutes later there is nothing left to do.
    let removed = sweeper
        .sweep_once(t0.plus(Duration::minutes(40)))
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn paid_lifecycle_from_selection_to_reminder() {
    let f = fixture();
    let user = UserId::new(2);
    let t0 = Timestamp::now();

    // The user picks monthly; the proof arrives with that tier attached.
    f.engine.select_tier(user, Tier::Monthly).await.unwrap();
    assert_eq!(f.engine.pending_tier(user).await.unwrap(), Tier::Monthly);

    // The approver accepts: 28 days of access, selection consumed.
    f.engine.approve(user, Tier::Monthly, t0).await.unwrap();
    let sub = f.store.find_subscription(user).await.unwrap().unwrap();
    assert_eq!(sub.expires_at, t0.plus(Duration::days(28)));
    assert!(f.engine.pending_tier(user).await.is_err());

    let delivered = deliver_invites(f.gateway.as_ref(), user, messages::invite_for_subscriber)
        .await
        .unwrap();
    assert_eq!(delivered, 2);

    // Twenty-seven days in, the day-ahead reminder fires exactly once.
    let reminder = ReminderService::new(f.engine.clone(), f.gateway.clone(), 9);
    let at_day_27 = t0.plus(Duration::days(27));
    assert_eq!(reminder.remind_once(at_day_27).await.unwrap(), 1);
    assert_eq!(reminder.remind_once(at_day_27).await.unwrap(), 0);

    let reminders: Vec<_> = f
        .gateway
        .messages_to(user)
        .into_iter()
        .filter(|m| m.contains("expires tomorrow"))
        .collect();
    assert_eq!(reminders.len(), 1);

    // Past the deadline the sweep removes the record.
    let sweeper = ExpirationSweeper::new(
        f.engine.clone(),
        f.gateway.clone(),
        StdDuration::from_secs(30),
    );
    let removed = sweeper
        .sweep_once(t0.plus(Duration::days(28) + Duration::minutes(1)))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(f.store.find_subscription(user).await.unwrap(), None);
}

#[tokio::test]
async fn reapproval_extends_instead_of_stacking() {
    let f = fixture();
    let user = UserId::new(3);
    let t0 = Timestamp::now();

    f.engine.approve(user, Tier::Weekly, t0).await.unwrap();
    let t1 = t0.plus(Duration::days(3));
    f.engine.approve(user, Tier::Annual, t1).await.unwrap();

    let sub = f.store.find_subscription(user).await.unwrap().unwrap();
    assert_eq!(sub.expires_at, t1.plus(Duration::days(364)));
}
