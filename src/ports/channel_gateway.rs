//! Channel gateway port.
//!
//! Outbound contract towards the chat platform: minting single-use invite
//! links, revoking channel membership, and direct-messaging users. Keeping
//! this behind a port lets the sweeps and the lifecycle flows run against a
//! fake in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChannelId, UserId};

/// A single-use invite link to one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteLink {
    /// The channel this link admits to.
    pub channel_id: ChannelId,
    /// The join URL, valid for exactly one new member.
    pub url: String,
}

/// Errors surfaced when talking to the chat platform.
///
/// These are never retried automatically; callers log and either notify the
/// user (mid-flow failures) or skip the affected channel/user pair (sweeps).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The platform rejected or failed the call (missing permission, user
    /// blocked the bot, network failure, ...).
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Outbound operations against the managed channels and their members.
#[async_trait]
pub trait ChannelGateway: Send + Sync {
    /// The channels this deployment manages, in configuration order.
    fn channels(&self) -> &[ChannelId];

    /// Mint a single-use invite link (member limit 1) for one channel.
    async fn create_invite(&self, channel_id: ChannelId) -> Result<InviteLink, GatewayError>;

    /// Remove a user from one channel.
    async fn revoke_access(&self, channel_id: ChannelId, user_id: UserId)
        -> Result<(), GatewayError>;

    /// Send a plain direct message to a user.
    async fn notify_user(&self, user_id: UserId, text: &str) -> Result<(), GatewayError>;
}
