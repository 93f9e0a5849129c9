//! Invite delivery for newly granted access.
//!
//! Used by the trial and approval flows: one single-use link per configured
//! channel, each delivered in its own direct message. Fails on the first
//! platform error so the caller can tell the user something went wrong
//! mid-flow; links already delivered stay valid.

use crate::domain::UserId;
use crate::ports::{ChannelGateway, GatewayError};

/// Mint and deliver one single-use invite per configured channel.
///
/// `render` turns an invite URL into the message accompanying it. Returns
/// the number of invites delivered.
pub async fn deliver_invites(
    gateway: &dyn ChannelGateway,
    user_id: UserId,
    render: fn(&str) -> String,
) -> Result<usize, GatewayError> {
    let mut delivered = 0;
    for &channel_id in gateway.channels() {
        let invite = gateway.create_invite(channel_id).await?;
        gateway.notify_user(user_id, &render(&invite.url)).await?;
        delivered += 1;
    }
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChannelId;
    use crate::ports::InviteLink;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeGateway {
        channels: Vec<ChannelId>,
        fail_on: Option<ChannelId>,
        notified: Mutex<Vec<(UserId, String)>>,
    }

    impl FakeGateway {
        fn new(channels: Vec<ChannelId>) -> Self {
            Self {
                channels,
                fail_on: None,
                notified: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChannelGateway for FakeGateway {
        fn channels(&self) -> &[ChannelId] {
            &self.channels
        }

        async fn create_invite(&self, channel_id: ChannelId) -> Result<InviteLink, GatewayError> {
            if self.fail_on == Some(channel_id) {
                return Err(GatewayError::Delivery("no permission".into()));
            }
            Ok(InviteLink {
                channel_id,
                url: format!("https://t.me/+invite{}", channel_id),
            })
        }

        async fn revoke_access(&self, _: ChannelId, _: UserId) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn notify_user(&self, user_id: UserId, text: &str) -> Result<(), GatewayError> {
            self.notified.lock().unwrap().push((user_id, text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn delivers_one_invite_per_channel() {
        let gateway = FakeGateway::new(vec![ChannelId::new(-100), ChannelId::new(-200)]);
        let user = UserId::new(1);

        let delivered = deliver_invites(&gateway, user, |url| url.to_string())
            .await
            .unwrap();

        assert_eq!(delivered, 2);
        let notified = gateway.notified.lock().unwrap();
        assert_eq!(notified.len(), 2);
        assert!(notified[0].1.contains("invite-100"));
        assert!(notified[1].1.contains("invite-200"));
    }

    #[tokio::test]
    async fn stops_at_the_first_failing_channel() {
        let mut gateway = FakeGateway::new(vec![
            ChannelId::new(-100),
            ChannelId::new(-200),
            ChannelId::new(-300),
        ]);
        gateway.fail_on = Some(ChannelId::new(-200));

        let result = deliver_invites(&gateway, UserId::new(1), |url| url.to_string()).await;

        assert!(result.is_err());
        assert_eq!(gateway.notified.lock().unwrap().len(), 1);
    }
}
