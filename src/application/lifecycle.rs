//! Subscription lifecycle engine.
//!
//! The only component that computes expiration timestamps and authorizes
//! state transitions. Every store mutation in the system goes through here;
//! the Telegram handlers and the periodic sweeps are readers and triggers.

use chrono::Duration;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{trial_duration, Subscription, Tier, Timestamp, UserId};
use crate::ports::{StoreError, SubscriptionStore};

/// Errors produced by lifecycle operations.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// The one-time trial was already claimed by this user.
    #[error("trial already claimed by user {0}")]
    TrialAlreadyClaimed(UserId),

    /// Payment proof arrived before any tier was selected.
    #[error("no tier selected for user {0}")]
    NoTierSelected(UserId),

    /// The store failed underneath the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Authorizes and applies every subscription state transition.
pub struct LifecycleEngine {
    store: Arc<dyn SubscriptionStore>,
}

impl LifecycleEngine {
    /// Creates an engine over the given store.
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Grant the one-time trial: 30 minutes of access, once per user for
    /// the lifetime of the system.
    ///
    /// The trial flag is claimed before the subscription is written, so a
    /// rejected claim can never touch an existing expiration.
    ///
    /// # Errors
    ///
    /// `TrialAlreadyClaimed` if this user ever claimed a trial before.
    pub async fn activate_trial(
        &self,
        user_id: UserId,
        now: Timestamp,
    ) -> Result<Subscription, SubscriptionError> {
        if !self.store.claim_trial(user_id).await? {
            return Err(SubscriptionError::TrialAlreadyClaimed(user_id));
        }

        let sub = Subscription::new(user_id, now.plus(trial_duration()));
        self.store.upsert_subscription(&sub).await?;
        tracing::info!(user_id = %user_id, expires_at = %sub.expires_at, "trial activated");
        Ok(sub)
    }

    /// Apply an admin approval: access until `now + duration(tier)`.
    ///
    /// Unconditional upsert: re-approval overwrites the record and resets
    /// the reminder flag, it never stacks durations. The pending selection
    /// is consumed.
    pub async fn approve(
        &self,
        user_id: UserId,
        tier: Tier,
        now: Timestamp,
    ) -> Result<Subscription, SubscriptionError> {
        let sub = Subscription::new(user_id, now.plus(tier.duration()));
        self.store.upsert_subscription(&sub).await?;
        self.store.clear_pending_selection(user_id).await?;
        tracing::info!(user_id = %user_id, tier = %tier, expires_at = %sub.expires_at, "subscription approved");
        Ok(sub)
    }

    /// Record the tier a user picked; overwrites any earlier pick.
    pub async fn select_tier(&self, user_id: UserId, tier: Tier) -> Result<(), SubscriptionError> {
        self.store.set_pending_selection(user_id, tier).await?;
        Ok(())
    }

    /// The tier to attach to an incoming payment proof.
    ///
    /// # Errors
    ///
    /// `NoTierSelected` if the user never picked a tier (or it was already
    /// consumed by a decision).
    pub async fn pending_tier(&self, user_id: UserId) -> Result<Tier, SubscriptionError> {
        self.store
            .pending_selection(user_id)
            .await?
            .ok_or(SubscriptionError::NoTierSelected(user_id))
    }

    /// Drop a user's pending selection (admin rejected the proof).
    pub async fn clear_selection(&self, user_id: UserId) -> Result<(), SubscriptionError> {
        self.store.clear_pending_selection(user_id).await?;
        Ok(())
    }

    /// Subscriptions past due at `now`.
    ///
    /// Non-destructive: the caller revokes channel access first and then
    /// calls [`expire`](Self::expire) for each record, so a crash between
    /// the two leaves the record in place for the next sweep.
    pub async fn due_for_removal(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        Ok(self.store.expiring_before(now).await?)
    }

    /// Delete an expired record. Safe to call for already-removed users.
    pub async fn expire(&self, user_id: UserId) -> Result<(), SubscriptionError> {
        self.store.delete_subscription(user_id).await?;
        Ok(())
    }

    /// Unreminded subscriptions expiring in the day-ahead window
    /// `[now+24h, now+48h)`.
    pub async fn due_for_reminder(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let from = now.plus(Duration::hours(24));
        let until = now.plus(Duration::hours(48));
        Ok(self.store.unreminded_expiring_between(from, until).await?)
    }

    /// Stamp a subscription as reminded so the next sweep skips it.
    pub async fn mark_reminded(
        &self,
        user_id: UserId,
        at: Timestamp,
    ) -> Result<(), SubscriptionError> {
        self.store.mark_reminded(user_id, at).await?;
        Ok(())
    }
}
