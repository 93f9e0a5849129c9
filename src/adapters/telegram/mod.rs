//! Telegram adapter: dispatcher schema, handlers, and the channel gateway.

mod gateway;
mod handlers;
mod keyboards;
pub mod messages;
mod payload;

pub use gateway::TelegramChannelGateway;
pub use handlers::{schema, Command};
pub use payload::CallbackPayload;
