//! In-memory subscription store.
//!
//! Keeps all three namespaces in process memory. Useful for tests and
//! development; production uses the SQLite adapter.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Subscription, Tier, Timestamp, UserId};
use crate::ports::{StoreError, SubscriptionStore};

/// In-memory implementation of the SubscriptionStore port.
#[derive(Debug, Clone)]
pub struct InMemorySubscriptionStore {
    subscriptions: Arc<RwLock<HashMap<UserId, Subscription>>>,
    trial_claims: Arc<RwLock<HashSet<UserId>>>,
    selections: Arc<RwLock<HashMap<UserId, Tier>>>,
}

impl InMemorySubscriptionStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            trial_claims: Arc::new(RwLock::new(HashSet::new())),
            selections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of active subscription records (useful for tests).
    pub async fn subscription_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    /// Clear all namespaces (useful for tests).
    pub async fn clear(&self) {
        self.subscriptions.write().await.clear();
        self.trial_claims.write().await.clear();
        self.selections.write().await.clear();
    }
}

impl Default for InMemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn upsert_subscription(&self, sub: &Subscription) -> Result<(), StoreError> {
        self.subscriptions
            .write()
            .await
            .insert(sub.user_id, sub.clone());
        Ok(())
    }

    async fn find_subscription(&self, user_id: UserId) -> Result<Option<Subscription>, StoreError> {
        Ok(self.subscriptions.read().await.get(&user_id).cloned())
    }

    async fn delete_subscription(&self, user_id: UserId) -> Result<(), StoreError> {
        self.subscriptions.write().await.remove(&user_id);
        Ok(())
    }

    async fn expiring_before(&self, cutoff: Timestamp) -> Result<Vec<Subscription>, StoreError> {
        let subs = self.subscriptions.read().await;
        Ok(subs
            .values()
            .filter(|s| s.expires_at.is_before(&cutoff))
            .cloned()
            .collect())
    }

    async fn unreminded_expiring_between(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<Subscription>, StoreError> {
        let subs = self.subscriptions.read().await;
        Ok(subs
            .values()
            .filter(|s| {
                s.reminded_at.is_none()
                    && !s.expires_at.is_before(&from)
                    && s.expires_at.is_before(&until)
            })
            .cloned()
            .collect())
    }

    async fn mark_reminded(&self, user_id: UserId, at: Timestamp) -> Result<(), StoreError> {
        if let Some(sub) = self.subscriptions.write().await.get_mut(&user_id) {
            sub.reminded_at = Some(at);
        }
        Ok(())
    }

    async fn claim_trial(&self, user_id: UserId) -> Result<bool, StoreError> {
        Ok(self.trial_claims.write().await.insert(user_id))
    }

    async fn set_pending_selection(&self, user_id: UserId, tier: Tier) -> Result<(), StoreError> {
        self.selections.write().await.insert(user_id, tier);
        Ok(())
    }

    async fn pending_selection(&self, user_id: UserId) -> Result<Option<Tier>, StoreError> {
        Ok(self.selections.read().await.get(&user_id).copied())
    }

    async fn clear_pending_selection(&self, user_id: UserId) -> Result<(), StoreError> {
        self.selections.write().await.remove(&user_id);
        Ok(())
    }
}
