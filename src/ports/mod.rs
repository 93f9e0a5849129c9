//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - [`SubscriptionStore`] - persistence for subscriptions, trial claims,
//!   and pending tier selections
//! - [`ChannelGateway`] - invite issuance, membership revocation, and
//!   direct messages on the chat platform

mod channel_gateway;
mod subscription_store;

pub use channel_gateway::{ChannelGateway, GatewayError, InviteLink};
pub use subscription_store::{StoreError, SubscriptionStore};
