//! Subscription store port.
//!
//! Key-value persistence keyed by user identity, three independent
//! namespaces: active subscriptions, trial claims, pending tier selections.
//! Writes are always full replacements keyed by user id, so last-writer-wins
//! is acceptable; the single operation that must be atomic at the store
//! level is the trial check-and-set.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Subscription, Tier, Timestamp, UserId};

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted value could not be mapped back into a domain type.
    #[error("corrupt record for user {user_id}: {message}")]
    CorruptRecord { user_id: UserId, message: String },
}

/// Persistence contract for the subscription lifecycle.
///
/// Implementations must survive process restarts; the in-memory adapter is
/// for tests and development only.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert or fully replace the subscription for `sub.user_id`.
    async fn upsert_subscription(&self, sub: &Subscription) -> Result<(), StoreError>;

    /// Look up a user's subscription, if any.
    async fn find_subscription(&self, user_id: UserId) -> Result<Option<Subscription>, StoreError>;

    /// Delete a user's subscription. Deleting a missing record is a no-op.
    async fn delete_subscription(&self, user_id: UserId) -> Result<(), StoreError>;

    /// All subscriptions with `expires_at` strictly before `cutoff`.
    async fn expiring_before(&self, cutoff: Timestamp) -> Result<Vec<Subscription>, StoreError>;

    /// Subscriptions expiring in `[from, until)` that have not yet been
    /// reminded.
    async fn unreminded_expiring_between(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<Subscription>, StoreError>;

    /// Record that the expiry reminder was delivered.
    async fn mark_reminded(&self, user_id: UserId, at: Timestamp) -> Result<(), StoreError>;

    /// Atomically claim the one-time trial for `user_id`.
    ///
    /// Returns `true` if this call claimed it, `false` if it was already
    /// taken. The flag is permanent; there is no way to release it.
    async fn claim_trial(&self, user_id: UserId) -> Result<bool, StoreError>;

    /// Record or replace the tier a user picked while awaiting payment proof.
    async fn set_pending_selection(&self, user_id: UserId, tier: Tier) -> Result<(), StoreError>;

    /// The tier a user picked, if a selection is pending.
    async fn pending_selection(&self, user_id: UserId) -> Result<Option<Tier>, StoreError>;

    /// Drop a user's pending selection. Clearing a missing one is a no-op.
    async fn clear_pending_selection(&self, user_id: UserId) -> Result<(), StoreError>;
}
