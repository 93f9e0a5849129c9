//! Portero - Telegram bot selling timed access to private channels.
//!
//! Users pick a subscription tier, upload proof of payment, and a designated
//! approver accepts or rejects the request. The bot mints single-use invite
//! links, enforces expiry with a periodic sweep, and sends day-ahead renewal
//! reminders.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
