//! Application layer - lifecycle orchestration and the periodic sweeps.
//!
//! This layer drives the domain through the ports: the [`LifecycleEngine`]
//! owns every store mutation, and the two background services
//! ([`ExpirationSweeper`], [`ReminderService`]) trigger it on their own
//! schedules.

mod invites;
mod lifecycle;
mod reminder;
mod state;
mod sweeper;

pub use invites::deliver_invites;
pub use lifecycle::{LifecycleEngine, SubscriptionError};
pub use reminder::ReminderService;
pub use state::AppState;
pub use sweeper::ExpirationSweeper;
