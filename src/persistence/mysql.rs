//! MySQL implementation of the order repository.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use super::dsn::DataSourceName;
use super::models::{OrderItemRow, OrderRow};
use crate::domain::{Order, OrderId, OrderRepository};
use crate::error::OrderServiceError;

/// Connection pool and round-trip limits for [`MySqlOrderRepository`].
#[derive(Debug, Clone)]
pub struct MySqlSettings {
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Idle connections kept open.
    pub min_connections: u32,
    /// Deadline for acquiring a connection.
    pub connect_timeout: Duration,
    /// Deadline for a whole `save` or `get` round-trip.
    pub query_timeout: Duration,
}

impl Default for MySqlSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(30),
        }
    }
}

/// MySQL-backed order repository using `sqlx::MySqlPool`.
///
/// Orders live in `orders`, their items in `order_items` keyed by
/// `(order_id, position)`. A save writes both tables in one transaction.
#[derive(Debug, Clone)]
pub struct MySqlOrderRepository {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlOrderRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Parses `dsn`, opens a connection pool, and returns the repository.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidConfig`] for a malformed DSN and
    /// [`OrderServiceError::StorageError`] if the server cannot be reached.
    pub async fn connect(dsn: &str, settings: &MySqlSettings) -> Result<Self, OrderServiceError> {
        let dsn = DataSourceName::parse(dsn)?;
        let options = dsn.connect_options()?;

        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect_with(options)
            .await
            .map_err(|e| OrderServiceError::StorageError(format!("connect to {dsn}: {e}")))?;

        tracing::info!(%dsn, "connected to mysql");
        Ok(Self::new(pool, settings.query_timeout))
    }

    /// Applies the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::StorageError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), OrderServiceError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, OrderServiceError>
    where
        F: Future<Output = Result<T, OrderServiceError>> + Send,
    {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .unwrap_or_else(|_| {
                Err(OrderServiceError::Timeout {
                    operation,
                    after_ms: u64::try_from(self.query_timeout.as_millis()).unwrap_or(u64::MAX),
                })
            })
    }

    async fn save_inner(&self, order: &Order) -> Result<OrderId, OrderServiceError> {
        let mut tx = self.pool.begin().await?;

        let id = if let Some(id) = order.id {
            sqlx::query(
                "INSERT INTO orders (id, customer_id, status, created_at) VALUES (?, ?, ?, ?) AS new \
                 ON DUPLICATE KEY UPDATE customer_id = new.customer_id, \
                 status = new.status, created_at = new.created_at",
            )
            .bind(id.get())
            .bind(order.customer_id)
            .bind(order.status.as_str())
            .bind(order.created_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM order_items WHERE order_id = ?")
                .bind(id.get())
                .execute(&mut *tx)
                .await?;
            id
        } else {
            let result = sqlx::query(
                "INSERT INTO orders (customer_id, status, created_at) VALUES (?, ?, ?)",
            )
            .bind(order.customer_id)
            .bind(order.status.as_str())
            .bind(order.created_at)
            .execute(&mut *tx)
            .await?;

            let raw = i64::try_from(result.last_insert_id()).map_err(|_| {
                OrderServiceError::StorageError(format!(
                    "insert id {} out of range",
                    result.last_insert_id()
                ))
            })?;
            OrderId::new(raw)
        };

        for (position, item) in order.items.iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| {
                OrderServiceError::StorageError(format!("order {id} has too many items"))
            })?;
            sqlx::query(
                "INSERT INTO order_items (order_id, position, product_code, quantity, unit_price) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(id.get())
            .bind(position)
            .bind(&item.product_code)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn get_inner(&self, id: OrderId) -> Result<Order, OrderServiceError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, status, created_at FROM orders WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OrderServiceError::OrderNotFound(id))?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT position, product_code, quantity, unit_price FROM order_items \
             WHERE order_id = ? ORDER BY position ASC",
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await?;

        row.into_order(items)
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn save(&self, order: &mut Order) -> Result<OrderId, OrderServiceError> {
        let id = self.bounded("save order", self.save_inner(order)).await?;
        order.id = Some(id);
        tracing::debug!(order_id = %id, items = order.items.len(), "order saved");
        Ok(id)
    }

    async fn get(&self, id: OrderId) -> Result<Order, OrderServiceError> {
        self.bounded("get order", self.get_inner(id)).await
    }
}
