//! SQL implementation of the checkout record repository

use crate::error::DbError;
use crate::repositories::checkout_record::{
    CheckoutRecordRepository, ExpressCheckoutRecord, PrecheckoutRecord,
};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};

/// SQL implementation of the checkout record repository
#[derive(Debug, Clone)]
pub struct SqlCheckoutRecordRepository {
    db_client: DbClient,
}

impl SqlCheckoutRecordRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn text_column(row: &sqlx::any::AnyRow, name: &str) -> Result<String, DbError> {
    row.try_get(name)
        .map_err(|e| DbError::QueryError(e.to_string()))
}

fn id_column(row: &sqlx::any::AnyRow, name: &str) -> Result<i64, DbError> {
    row.try_get(name)
        .map_err(|e| DbError::QueryError(e.to_string()))
}

impl CheckoutRecordRepository for SqlCheckoutRecordRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing checkout record schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS precheckout_records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id BIGINT NOT NULL,
                    wallet_id BIGINT NOT NULL,
                    consumer_wallet_id TEXT NOT NULL,
                    precheckout_transaction_id TEXT NOT NULL,
                    wallet_name TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            "#,
            )
            .await?;

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS express_checkout_records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id BIGINT NOT NULL,
                    wallet_id BIGINT NOT NULL,
                    gateway_wallet_id TEXT NOT NULL,
                    wallet_name TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            "#,
            )
            .await?;

        Ok(())
    }

    async fn save_precheckout(
        &self,
        record: PrecheckoutRecord,
    ) -> Result<PrecheckoutRecord, DbError> {
        debug!("Saving precheckout record for user: {}", record.user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO precheckout_records
                (user_id, wallet_id, consumer_wallet_id, precheckout_transaction_id, wallet_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
        "#,
        )
        .bind(record.user_id)
        .bind(record.wallet_id)
        .bind(&record.consumer_wallet_id)
        .bind(&record.precheckout_transaction_id)
        .bind(&record.wallet_name)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert precheckout record: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(PrecheckoutRecord {
            id: row.try_get("id").ok(),
            ..record
        })
    }

    async fn save_express_checkout(
        &self,
        record: ExpressCheckoutRecord,
    ) -> Result<ExpressCheckoutRecord, DbError> {
        debug!("Saving express checkout record for user: {}", record.user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO express_checkout_records
                (user_id, wallet_id, gateway_wallet_id, wallet_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id
        "#,
        )
        .bind(record.user_id)
        .bind(record.wallet_id)
        .bind(&record.gateway_wallet_id)
        .bind(&record.wallet_name)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert express checkout record: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(ExpressCheckoutRecord {
            id: row.try_get("id").ok(),
            ..record
        })
    }

    async fn find_precheckouts_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<PrecheckoutRecord>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, wallet_id, consumer_wallet_id,
                   precheckout_transaction_id, wallet_name
            FROM precheckout_records
            WHERE user_id = $1
            ORDER BY id ASC
        "#,
        )
        .bind(user_id)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to find precheckout records: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        rows.iter()
            .map(|row| {
                Ok(PrecheckoutRecord {
                    id: row.try_get("id").ok(),
                    user_id: id_column(row, "user_id")?,
                    wallet_id: id_column(row, "wallet_id")?,
                    consumer_wallet_id: text_column(row, "consumer_wallet_id")?,
                    precheckout_transaction_id: text_column(row, "precheckout_transaction_id")?,
                    wallet_name: text_column(row, "wallet_name")?,
                })
            })
            .collect()
    }

    async fn find_express_checkouts_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ExpressCheckoutRecord>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, wallet_id, gateway_wallet_id, wallet_name
            FROM express_checkout_records
            WHERE user_id = $1
            ORDER BY id ASC
        "#,
        )
        .bind(user_id)
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to find express checkout records: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        rows.iter()
            .map(|row| {
                Ok(ExpressCheckoutRecord {
                    id: row.try_get("id").ok(),
                    user_id: id_column(row, "user_id")?,
                    wallet_id: id_column(row, "wallet_id")?,
                    gateway_wallet_id: text_column(row, "gateway_wallet_id")?,
                    wallet_name: text_column(row, "wallet_name")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> SqlCheckoutRecordRepository {
        let path = std::env::temp_dir().join(format!("walletflow-records-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let client = DbClient::from_url(&url).await.unwrap();
        let repo = SqlCheckoutRecordRepository::new(client);
        repo.init_schema().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn precheckout_records_are_appended_in_order() {
        let repo = test_repo().await;

        for tx in ["T1", "T2"] {
            repo.save_precheckout(PrecheckoutRecord {
                id: None,
                user_id: 1,
                wallet_id: 7,
                consumer_wallet_id: "CW1".to_string(),
                precheckout_transaction_id: tx.to_string(),
                wallet_name: "W".to_string(),
            })
            .await
            .unwrap();
        }

        let records = repo.find_precheckouts_by_user(1).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].precheckout_transaction_id, "T1");
        assert_eq!(records[1].precheckout_transaction_id, "T2");
    }

    #[tokio::test]
    async fn express_checkout_records_are_scoped_to_the_user() {
        let repo = test_repo().await;

        repo.save_express_checkout(ExpressCheckoutRecord {
            id: None,
            user_id: 1,
            wallet_id: 7,
            gateway_wallet_id: "WID1".to_string(),
            wallet_name: "W".to_string(),
        })
        .await
        .unwrap();
        repo.save_express_checkout(ExpressCheckoutRecord {
            id: None,
            user_id: 2,
            wallet_id: 8,
            gateway_wallet_id: "WID2".to_string(),
            wallet_name: "X".to_string(),
        })
        .await
        .unwrap();

        let records = repo.find_express_checkouts_by_user(1).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gateway_wallet_id, "WID1");
    }

    #[tokio::test]
    async fn save_returns_the_assigned_id() {
        let repo = test_repo().await;

        let saved = repo
            .save_precheckout(PrecheckoutRecord {
                id: None,
                user_id: 1,
                wallet_id: 7,
                consumer_wallet_id: "CW1".to_string(),
                precheckout_transaction_id: "T1".to_string(),
                wallet_name: "W".to_string(),
            })
            .await
            .unwrap();

        assert!(saved.id.is_some());
    }
}
