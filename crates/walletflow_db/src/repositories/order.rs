//! Repository for order lookups
//!
//! Orders are read-mostly from the checkout workflow's perspective: the
//! orchestrator never mutates them. The queries mirror what the surrounding
//! application needs — lookup by the externally visible post id, the most
//! recent post, and a per-user count.

use crate::error::DbError;
use serde::{Deserialize, Serialize};

/// An order, identified internally by `id` and externally by `post_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<i64>,
    pub post_id: i64,
    pub user_id: i64,
}

/// Repository for orders
pub trait OrderRepository {
    /// Initialize the database schema.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Store an order.
    fn save(&self, order: Order) -> impl std::future::Future<Output = Result<Order, DbError>> + Send;

    /// Look up an order by its post id.
    fn find_by_post_id(
        &self,
        post_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Order>, DbError>> + Send;

    /// The order with the highest post id, if any.
    fn find_most_recent_by_post_id(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Order>, DbError>> + Send;

    /// Number of orders owned by the user.
    fn count_by_user(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;
}
