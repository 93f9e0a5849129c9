//! SQLite implementation of the SubscriptionStore port.
//!
//! Three flat tables, one row per user in each. Timestamps are stored as
//! RFC 3339 TEXT in UTC, so the range queries compare lexicographically.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::{Subscription, Tier, Timestamp, UserId};
use crate::ports::{StoreError, SubscriptionStore};

/// SQLite implementation of the SubscriptionStore port.
///
/// Uses sqlx with a connection pool; the schema is applied by the embedded
/// migrations (see `migrations/`).
pub struct SqliteSubscriptionStore {
    pool: SqlitePool,
}

impl SqliteSubscriptionStore {
    /// Creates a store over the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    user_id: i64,
    expires_at: String,
    reminded_at: Option<String>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = StoreError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(row.user_id);
        let expires_at = parse_timestamp(user_id, &row.expires_at)?;
        let reminded_at = row
            .reminded_at
            .as_deref()
            .map(|s| parse_timestamp(user_id, s))
            .transpose()?;

        Ok(Subscription {
            user_id,
            expires_at,
            reminded_at,
        })
    }
}

fn parse_timestamp(user_id: UserId, s: &str) -> Result<Timestamp, StoreError> {
    Timestamp::parse_rfc3339(s).map_err(|e| StoreError::CorruptRecord {
        user_id,
        message: format!("bad timestamp {:?}: {}", s, e),
    })
}

fn parse_tier(user_id: UserId, s: &str) -> Result<Tier, StoreError> {
    s.parse().map_err(|e| StoreError::CorruptRecord {
        user_id,
        message: format!("{}", e),
    })
}

#[async_trait]
impl SubscriptionStore for SqliteSubscriptionStore {
    async fn upsert_subscription(&self, sub: &Subscription) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, expires_at, reminded_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                expires_at = excluded.expires_at,
                reminded_at = excluded.reminded_at
            "#,
        )
        .bind(sub.user_id.as_i64())
        .bind(sub.expires_at.to_rfc3339())
        .bind(sub.reminded_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_subscription(&self, user_id: UserId) -> Result<Option<Subscription>, StoreError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            "SELECT user_id, expires_at, reminded_at FROM subscriptions WHERE user_id = ?",
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Subscription::try_from).transpose()
    }

    async fn delete_subscription(&self, user_id: UserId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM subscriptions WHERE user_id = ?")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn expiring_before(&self, cutoff: Timestamp) -> Result<Vec<Subscription>, StoreError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(
            "SELECT user_id, expires_at, reminded_at FROM subscriptions WHERE expires_at < ?",
        )
        .bind(cutoff.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn unreminded_expiring_between(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<Subscription>, StoreError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT user_id, expires_at, reminded_at FROM subscriptions
            WHERE reminded_at IS NULL AND expires_at >= ? AND expires_at < ?
            "#,
        )
        .bind(from.to_rfc3339())
        .bind(until.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn mark_reminded(&self, user_id: UserId, at: Timestamp) -> Result<(), StoreError> {
        sqlx::query("UPDATE subscriptions SET reminded_at = ? WHERE user_id = ?")
            .bind(at.to_rfc3339())
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn claim_trial(&self, user_id: UserId) -> Result<bool, StoreError> {
        // Single conditional statement keeps the check-and-set atomic even
        // under a multi-process deployment.
        let result = sqlx::query(
            "INSERT INTO trial_claims (user_id) VALUES (?) ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_pending_selection(&self, user_id: UserId, tier: Tier) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO pending_selections (user_id, tier)
            VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET tier = excluded.tier
            "#,
        )
        .bind(user_id.as_i64())
        .bind(tier.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pending_selection(&self, user_id: UserId) -> Result<Option<Tier>, StoreError> {
        let tier: Option<(String,)> =
            sqlx::query_as("SELECT tier FROM pending_selections WHERE user_id = ?")
                .bind(user_id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        tier.map(|(s,)| parse_tier(user_id, &s)).transpose()
    }

    async fn clear_pending_selection(&self, user_id: UserId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM pending_selections WHERE user_id = ?")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    async fn store() -> SqliteSubscriptionStore {
        // A shared pool against :memory: would give each connection its own
        // database; a single connection keeps the schema visible everywhere.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteSubscriptionStore::migrate(&pool).await.unwrap();
        SqliteSubscriptionStore::new(pool)
    }

    #[tokio::test]
    async fn upsert_then_find_roundtrips() {
        let store = store().await;
        let sub = Subscription::new(UserId::new(1), Timestamp::now());

        store.upsert_subscription(&sub).await.unwrap();
        let found = store.find_subscription(sub.user_id).await.unwrap();
        assert_eq!(found, Some(sub));
    }

    #[tokio::test]
    async fn upsert_overwrites_and_resets_reminder() {
        let store = store().await;
        let user = UserId::new(1);
        let now = Timestamp::now();

        store
            .upsert_subscription(&Subscription::new(user, now))
            .await
            .unwrap();
        store.mark_reminded(user, now).await.unwrap();

        let renewed = Subscription::new(user, now.plus(Duration::days(28)));
        store.upsert_subscription(&renewed).await.unwrap();

        let stored = store.find_subscription(user).await.unwrap().unwrap();
        assert_eq!(stored.expires_at, renewed.expires_at);
        assert_eq!(stored.reminded_at, None);
    }

    #[tokio::test]
    async fn claim_trial_is_atomic_check_and_set() {
        let store = store().await;
        let user = UserId::new(99);

        assert!(store.claim_trial(user).await.unwrap());
        assert!(!store.claim_trial(user).await.unwrap());
        assert!(store.claim_trial(UserId::new(100)).await.unwrap());
    }

    #[tokio::test]
    async fn expiring_before_honors_cutoff() {
        let store = store().await;
        let now = Timestamp::now();

        store
            .upsert_subscription(&Subscription::new(
                UserId::new(1),
                now.plus(Duration::minutes(30)),
            ))
            .await
            .unwrap();
        store
            .upsert_subscription(&Subscription::new(UserId::new(2), now.plus(Duration::days(7))))
            .await
            .unwrap();

        let due = store
            .expiring_before(now.plus(Duration::minutes(31)))
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].user_id, UserId::new(1));

        assert!(store.expiring_before(now).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reminder_query_skips_reminded_rows() {
        let store = store().await;
        let now = Timestamp::now();
        let from = now.plus(Duration::hours(24));
        let until = now.plus(Duration::hours(48));

        store
            .upsert_subscription(&Subscription::new(UserId::new(1), now.plus(Duration::hours(25))))
            .await
            .unwrap();
        store
            .upsert_subscription(&Subscription::new(UserId::new(2), now.plus(Duration::hours(26))))
            .await
            .unwrap();
        store.mark_reminded(UserId::new(2), now).await.unwrap();

        let due = store.unreminded_expiring_between(from, until).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].user_id, UserId::new(1));
    }

    #[tokio::test]
    async fn pending_selection_lifecycle() {
        let store = store().await;
        let user = UserId::new(3);

        assert_eq!(store.pending_selection(user).await.unwrap(), None);

        store.set_pending_selection(user, Tier::Weekly).await.unwrap();
        store.set_pending_selection(user, Tier::Annual).await.unwrap();
        assert_eq!(store.pending_selection(user).await.unwrap(), Some(Tier::Annual));

        store.clear_pending_selection(user).await.unwrap();
        assert_eq!(store.pending_selection(user).await.unwrap(), None);
    }

    #[tokio::test]
    async fn state_survives_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portero.db");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let user = UserId::new(7);
        let expires = Timestamp::now().plus(Duration::days(28));
        {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options.clone())
                .await
                .unwrap();
            SqliteSubscriptionStore::migrate(&pool).await.unwrap();
            let store = SqliteSubscriptionStore::new(pool.clone());

            store
                .upsert_subscription(&Subscription::new(user, expires))
                .await
                .unwrap();
            store.set_pending_selection(user, Tier::Monthly).await.unwrap();
            store.claim_trial(user).await.unwrap();
            pool.close().await;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        SqliteSubscriptionStore::migrate(&pool).await.unwrap();
        let store = SqliteSubscriptionStore::new(pool);

        let stored = store.find_subscription(user).await.unwrap().unwrap();
        assert_eq!(stored.expires_at, expires);
        assert_eq!(store.pending_selection(user).await.unwrap(), Some(Tier::Monthly));
        assert!(!store.claim_trial(user).await.unwrap());
    }
}
