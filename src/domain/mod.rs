//! Domain layer - value objects and entities of the subscription lifecycle.
//!
//! Everything here is pure: no IO, no platform types. The lifecycle rules
//! that need persistence live in [`crate::application::LifecycleEngine`],
//! which drives these types through the store port.

mod ids;
mod subscription;
mod tier;
mod timestamp;

pub use ids::{ChannelId, UserId};
pub use subscription::Subscription;
pub use tier::{trial_duration, Tier, UnknownTier, TRIAL_DURATION_MINUTES};
pub use timestamp::Timestamp;
