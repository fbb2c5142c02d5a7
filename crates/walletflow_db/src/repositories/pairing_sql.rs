//! SQL implementation of the pairing token repository

use crate::error::DbError;
use crate::repositories::pairing::{PairingRecord, PairingRepository, PairingSource};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};

/// SQL implementation of the pairing token repository
#[derive(Debug, Clone)]
pub struct SqlPairingRepository {
    db_client: DbClient,
}

impl SqlPairingRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn record_from_row(row: &sqlx::any::AnyRow) -> Result<PairingRecord, DbError> {
        let source_text: String = row
            .try_get("source")
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let source = PairingSource::parse(&source_text)
            .ok_or_else(|| DbError::QueryError(format!("unknown pairing source: {source_text}")))?;
        let wasted: i64 = row
            .try_get("wasted")
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        Ok(PairingRecord {
            id: row.try_get("id").ok(),
            pairing_token: row
                .try_get("pairing_token")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            source,
            user_id: row
                .try_get("user_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            wallet_id: row
                .try_get("wallet_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            wasted: wasted != 0,
        })
    }
}

impl PairingRepository for SqlPairingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing pairing token schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS pairing_records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    pairing_token TEXT NOT NULL,
                    source TEXT NOT NULL,
                    user_id BIGINT NOT NULL,
                    wallet_id BIGINT NOT NULL,
                    wasted INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            "#,
            )
            .await?;

        // find_current filters on (user_id, wasted) and orders by id
        self.db_client
            .execute(
                r#"
                CREATE INDEX IF NOT EXISTS idx_pairing_records_user_wasted
                ON pairing_records(user_id, wasted)
            "#,
            )
            .await?;

        Ok(())
    }

    async fn invalidate_all(&self, user_id: i64) -> Result<u64, DbError> {
        debug!("Wasting all pairing tokens for user: {}", user_id);

        let result = sqlx::query(
            r#"
            UPDATE pairing_records
            SET wasted = 1
            WHERE user_id = $1 AND wasted = 0
        "#,
        )
        .bind(user_id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to invalidate pairing tokens: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    async fn save(&self, record: PairingRecord) -> Result<PairingRecord, DbError> {
        debug!(
            "Saving pairing token for user: {} (source: {})",
            record.user_id,
            record.source.as_str()
        );

        let row = sqlx::query(
            r#"
            INSERT INTO pairing_records (pairing_token, source, user_id, wallet_id, wasted)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id
        "#,
        )
        .bind(&record.pairing_token)
        .bind(record.source.as_str())
        .bind(record.user_id)
        .bind(record.wallet_id)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert pairing token: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(PairingRecord {
            id: row.try_get("id").ok(),
            wasted: false,
            ..record
        })
    }

    async fn find_current(&self, user_id: i64) -> Result<Option<PairingRecord>, DbError> {
        debug!("Finding current pairing token for user: {}", user_id);

        let result = sqlx::query(
            r#"
            SELECT id, pairing_token, source, user_id, wallet_id, wasted
            FROM pairing_records
            WHERE user_id = $1 AND wasted = 0
            ORDER BY id DESC
            LIMIT 1
        "#,
        )
        .bind(user_id)
        .fetch_optional(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to find current pairing token: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        result.as_ref().map(Self::record_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> SqlPairingRepository {
        let path = std::env::temp_dir().join(format!("walletflow-pairing-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let client = DbClient::from_url(&url).await.unwrap();
        let repo = SqlPairingRepository::new(client);
        repo.init_schema().await.unwrap();
        repo
    }

    fn record(user_id: i64, token: &str, source: PairingSource) -> PairingRecord {
        PairingRecord {
            id: None,
            pairing_token: token.to_string(),
            source,
            user_id,
            wallet_id: 7,
            wasted: false,
        }
    }

    #[tokio::test]
    async fn rotation_leaves_exactly_one_active_token() {
        let repo = test_repo().await;

        repo.save(record(1, "P1", PairingSource::Precheckout))
            .await
            .unwrap();

        let invalidated = repo.invalidate_all(1).await.unwrap();
        assert_eq!(invalidated, 1);
        repo.save(record(1, "P2", PairingSource::ExpressCheckout))
            .await
            .unwrap();

        let current = repo.find_current(1).await.unwrap().unwrap();
        assert_eq!(current.pairing_token, "P2");
        assert_eq!(current.source, PairingSource::ExpressCheckout);
        assert!(!current.wasted);
    }

    #[tokio::test]
    async fn invalidate_all_is_idempotent() {
        let repo = test_repo().await;

        repo.save(record(1, "P1", PairingSource::Precheckout))
            .await
            .unwrap();

        assert_eq!(repo.invalidate_all(1).await.unwrap(), 1);
        assert_eq!(repo.invalidate_all(1).await.unwrap(), 0);
        assert!(repo.find_current(1).await.unwrap().is_none());

        // no rows at all is also fine
        assert_eq!(repo.invalidate_all(42).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_current_prefers_highest_id() {
        let repo = test_repo().await;

        // Two active tokens can exist transiently; the newest write wins.
        repo.save(record(1, "OLD", PairingSource::Precheckout))
            .await
            .unwrap();
        repo.save(record(1, "NEW", PairingSource::Precheckout))
            .await
            .unwrap();

        let current = repo.find_current(1).await.unwrap().unwrap();
        assert_eq!(current.pairing_token, "NEW");
    }

    #[tokio::test]
    async fn save_assigns_ids_in_insertion_order() {
        let repo = test_repo().await;

        let first = repo
            .save(record(1, "A", PairingSource::Precheckout))
            .await
            .unwrap();
        let second = repo
            .save(record(1, "B", PairingSource::Precheckout))
            .await
            .unwrap();

        assert!(first.id.unwrap() < second.id.unwrap());
    }

    #[tokio::test]
    async fn invalidation_is_scoped_to_the_user() {
        let repo = test_repo().await;

        repo.save(record(1, "P1", PairingSource::Precheckout))
            .await
            .unwrap();
        repo.save(record(2, "Q1", PairingSource::Precheckout))
            .await
            .unwrap();

        repo.invalidate_all(1).await.unwrap();

        assert!(repo.find_current(1).await.unwrap().is_none());
        let other = repo.find_current(2).await.unwrap().unwrap();
        assert_eq!(other.pairing_token, "Q1");
    }
}
