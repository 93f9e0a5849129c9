//! Telegram implementation of the ChannelGateway port.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

use crate::domain::{ChannelId, UserId};
use crate::ports::{ChannelGateway, GatewayError, InviteLink};

/// ChannelGateway over the Telegram Bot API.
pub struct TelegramChannelGateway {
    bot: Bot,
    channels: Vec<ChannelId>,
}

impl TelegramChannelGateway {
    /// Creates a gateway managing the given channels.
    pub fn new(bot: Bot, channels: Vec<ChannelId>) -> Self {
        Self { bot, channels }
    }
}

fn delivery_error(e: teloxide::RequestError) -> GatewayError {
    GatewayError::Delivery(e.to_string())
}

#[async_trait]
impl ChannelGateway for TelegramChannelGateway {
    fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    async fn create_invite(&self, channel_id: ChannelId) -> Result<InviteLink, GatewayError> {
        let link = self
            .bot
            .create_chat_invite_link(ChatId(channel_id.as_i64()))
            .member_limit(1)
            .await
            .map_err(delivery_error)?;

        Ok(InviteLink {
            channel_id,
            url: link.invite_link,
        })
    }

    async fn revoke_access(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), GatewayError> {
        self.bot
            .ban_chat_member(
                ChatId(channel_id.as_i64()),
                teloxide::types::UserId(user_id.as_i64() as u64),
            )
            .await
            .map_err(delivery_error)?;
        Ok(())
    }

    async fn notify_user(&self, user_id: UserId, text: &str) -> Result<(), GatewayError> {
        self.bot
            .send_message(ChatId(user_id.as_i64()), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(delivery_error)?;
        Ok(())
    }
}
