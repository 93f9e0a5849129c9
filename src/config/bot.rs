//! Bot configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::ChannelId;

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token. No embedded default: must come from the environment.
    pub token: String,

    /// Chat id of the single designated approver.
    pub admin_chat_id: i64,

    /// Comma-separated ids of the managed private channels.
    pub channel_ids: String,

    /// Name shown next to the admin contact link.
    #[serde(default = "default_admin_display_name")]
    pub admin_display_name: String,

    /// Card number shown in the payment instructions.
    pub payment_card: String,

    /// Welcome photo sent by /start; plain text is sent when unset.
    #[serde(default)]
    pub welcome_photo_path: Option<PathBuf>,
}

impl BotConfig {
    /// Parse the configured channel id list.
    pub fn channels(&self) -> Result<Vec<ChannelId>, ValidationError> {
        self.channel_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .map_err(|_| ValidationError::InvalidChannelIds(s.to_string()))
            })
            .collect()
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token.is_empty() {
            return Err(ValidationError::MissingRequired("PORTERO__BOT__TOKEN"));
        }
        if self.payment_card.is_empty() {
            return Err(ValidationError::MissingRequired(
                "PORTERO__BOT__PAYMENT_CARD",
            ));
        }
        let channels = self.channels()?;
        if channels.is_empty() {
            return Err(ValidationError::MissingRequired(
                "PORTERO__BOT__CHANNEL_IDS",
            ));
        }
        Ok(())
    }
}

fn default_admin_display_name() -> String {
    "Admin".to_string()
}
