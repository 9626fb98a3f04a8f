//! In-process order repository.
//!
//! [`InMemoryOrderRepository`] keeps orders in a `HashMap` behind a
//! [`tokio::sync::RwLock`] and mirrors the MySQL adapter's semantics:
//! sequential id assignment, overwrite on re-save, and
//! [`OrderServiceError::OrderNotFound`] for unknown ids.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Order, OrderId, OrderRepository};
use crate::error::OrderServiceError;

#[derive(Debug, Default)]
struct Inner {
    orders: HashMap<OrderId, Order>,
    last_id: i64,
}

/// Order repository backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    inner: RwLock<Inner>,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn len(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    /// Returns `true` if no order is stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.orders.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &mut Order) -> Result<OrderId, OrderServiceError> {
        let mut inner = self.inner.write().await;
        let id = match order.id {
            Some(id) => {
                // Keep auto-increment ahead of explicitly chosen ids, as MySQL does.
                inner.last_id = inner.last_id.max(id.get());
                id
            }
            None => {
                inner.last_id = inner.last_id.checked_add(1).ok_or_else(|| {
                    OrderServiceError::StorageError("order id space exhausted".to_string())
                })?;
                OrderId::new(inner.last_id)
            }
        };
        order.id = Some(id);
        inner.orders.insert(id, order.clone());
        Ok(id)
    }

    async fn get(&self, id: OrderId) -> Result<Order, OrderServiceError> {
        self.inner
            .read()
            .await
            .orders
            .get(&id)
            .cloned()
            .ok_or(OrderServiceError::OrderNotFound(id))
    }
}
