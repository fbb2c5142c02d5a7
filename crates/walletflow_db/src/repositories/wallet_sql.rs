//! SQL implementation of the wallet repository

use crate::error::DbError;
use crate::repositories::wallet::{Wallet, WalletRepository};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};

/// SQL implementation of the wallet repository
#[derive(Debug, Clone)]
pub struct SqlWalletRepository {
    db_client: DbClient,
}

impl SqlWalletRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn wallet_from_row(row: &sqlx::any::AnyRow) -> Result<Wallet, DbError> {
        let enabled: i64 = row
            .try_get("enabled")
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        Ok(Wallet {
            id: row.try_get("id").ok(),
            user_id: row
                .try_get("user_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            default_card_id: row
                .try_get("default_card_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            default_shipping_address_id: row
                .try_get("default_shipping_address_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            enabled: enabled != 0,
        })
    }
}

impl WalletRepository for SqlWalletRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing wallet schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS wallets (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id BIGINT NOT NULL,
                    default_card_id TEXT NOT NULL,
                    default_shipping_address_id TEXT NOT NULL,
                    enabled INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            "#,
            )
            .await?;

        // At most one enabled wallet per user.
        self.db_client
            .execute(
                r#"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_wallets_one_enabled_per_user
                ON wallets(user_id) WHERE enabled = 1
            "#,
            )
            .await?;

        Ok(())
    }

    async fn save(&self, wallet: Wallet) -> Result<Wallet, DbError> {
        debug!("Saving wallet for user: {}", wallet.user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO wallets (user_id, default_card_id, default_shipping_address_id, enabled)
            VALUES ($1, $2, $3, $4)
            RETURNING id
        "#,
        )
        .bind(wallet.user_id)
        .bind(&wallet.default_card_id)
        .bind(&wallet.default_shipping_address_id)
        .bind(i64::from(wallet.enabled))
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert wallet: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(Wallet {
            id: row.try_get("id").ok(),
            ..wallet
        })
    }

    async fn find_enabled_by_user(&self, user_id: i64) -> Result<Option<Wallet>, DbError> {
        debug!("Finding enabled wallet for user: {}", user_id);

        let result = sqlx::query(
            r#"
            SELECT id, user_id, default_card_id, default_shipping_address_id, enabled
            FROM wallets
            WHERE user_id = $1 AND enabled = 1
        "#,
        )
        .bind(user_id)
        .fetch_optional(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to find enabled wallet: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        result.as_ref().map(Self::wallet_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> SqlWalletRepository {
        let path = std::env::temp_dir().join(format!("walletflow-wallets-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let client = DbClient::from_url(&url).await.unwrap();
        let repo = SqlWalletRepository::new(client);
        repo.init_schema().await.unwrap();
        repo
    }

    fn wallet(user_id: i64, enabled: bool) -> Wallet {
        Wallet {
            id: None,
            user_id,
            default_card_id: "C1".to_string(),
            default_shipping_address_id: "A1".to_string(),
            enabled,
        }
    }

    #[tokio::test]
    async fn finds_only_the_enabled_wallet() {
        let repo = test_repo().await;

        repo.save(wallet(1, false)).await.unwrap();
        let enabled = repo.save(wallet(1, true)).await.unwrap();

        let found = repo.find_enabled_by_user(1).await.unwrap().unwrap();
        assert_eq!(found.id, enabled.id);
        assert!(found.enabled);

        assert!(repo.find_enabled_by_user(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_a_second_enabled_wallet_for_the_same_user() {
        let repo = test_repo().await;

        repo.save(wallet(1, true)).await.unwrap();
        let result = repo.save(wallet(1, true)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn disabled_wallets_do_not_conflict() {
        let repo = test_repo().await;

        repo.save(wallet(1, false)).await.unwrap();
        repo.save(wallet(1, false)).await.unwrap();

        assert!(repo.find_enabled_by_user(1).await.unwrap().is_none());
    }
}
