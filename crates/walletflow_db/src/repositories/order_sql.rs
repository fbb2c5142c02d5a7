//! SQL implementation of the order repository

use crate::error::DbError;
use crate::repositories::order::{Order, OrderRepository};
use crate::DbClient;
use sqlx::Row;
use tracing::{debug, error};

/// SQL implementation of the order repository
#[derive(Debug, Clone)]
pub struct SqlOrderRepository {
    db_client: DbClient,
}

impl SqlOrderRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn order_from_row(row: &sqlx::any::AnyRow) -> Result<Order, DbError> {
        Ok(Order {
            id: row.try_get("id").ok(),
            post_id: row
                .try_get("post_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
        })
    }
}

impl OrderRepository for SqlOrderRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing order schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS orders (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    post_id BIGINT NOT NULL UNIQUE,
                    user_id BIGINT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )
            "#,
            )
            .await?;

        Ok(())
    }

    async fn save(&self, order: Order) -> Result<Order, DbError> {
        debug!("Saving order with post id: {}", order.post_id);

        let row = sqlx::query(
            r#"
            INSERT INTO orders (post_id, user_id)
            VALUES ($1, $2)
            RETURNING id
        "#,
        )
        .bind(order.post_id)
        .bind(order.user_id)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to insert order: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        Ok(Order {
            id: row.try_get("id").ok(),
            ..order
        })
    }

    async fn find_by_post_id(&self, post_id: i64) -> Result<Option<Order>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, post_id, user_id
            FROM orders
            WHERE post_id = $1
        "#,
        )
        .bind(post_id)
        .fetch_optional(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to find order by post id: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        result.as_ref().map(Self::order_from_row).transpose()
    }

    async fn find_most_recent_by_post_id(&self) -> Result<Option<Order>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, post_id, user_id
            FROM orders
            ORDER BY post_id DESC
            LIMIT 1
        "#,
        )
        .fetch_optional(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to find most recent order: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        result.as_ref().map(Self::order_from_row).transpose()
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, DbError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS order_count
            FROM orders
            WHERE user_id = $1
        "#,
        )
        .bind(user_id)
        .fetch_one(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to count orders: {}", e);
            DbError::QueryError(e.to_string())
        })?;

        row.try_get("order_count")
            .map_err(|e| DbError::QueryError(e.to_string()))
    }
}
