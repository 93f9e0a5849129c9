//! Subscription record entity.
//!
//! One record per user. Presence of a record means the user currently has
//! (or until the next sweep, recently had) channel access. There is no
//! separate status column: "expired" is simply `expires_at` in the past,
//! and removal deletes the record.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{Timestamp, UserId};

/// A user's timed channel access.
///
/// # Invariants
///
/// - `user_id` is unique: approving an existing subscriber overwrites the
///   record, it never stacks durations.
/// - `reminded_at` is set at most once per record, when the day-ahead
///   reminder for the current `expires_at` has been delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Owner of this subscription.
    pub user_id: UserId,

    /// When channel access ends.
    pub expires_at: Timestamp,

    /// When the expiry reminder was delivered, if it has been.
    pub reminded_at: Option<Timestamp>,
}

impl Subscription {
    /// Creates a fresh, unreminded subscription.
    pub fn new(user_id: UserId, expires_at: Timestamp) -> Self {
        Self {
            user_id,
            expires_at,
            reminded_at: None,
        }
    }

    /// True once `expires_at` has passed.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_before(&now)
    }

    /// True if this subscription expires within the day-ahead reminder
    /// window: at least 24 hours away, less than 48.
    pub fn in_reminder_window(&self, now: Timestamp) -> bool {
        let from = now.plus(Duration::hours(24));
        let until = now.plus(Duration::hours(48));
        !self.expires_at.is_before(&from) && self.expires_at.is_before(&until)
    }
}
