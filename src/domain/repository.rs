//! Repository port for persisting and loading orders.

use async_trait::async_trait;

use super::{Order, OrderId};
use crate::error::OrderServiceError;

/// Persistence port implemented by every order store.
///
/// Implementations classify failures as
/// [`OrderServiceError::OrderNotFound`] or
/// [`OrderServiceError::StorageError`] (plus
/// [`OrderServiceError::Timeout`] where round-trips are bounded).
#[async_trait]
pub trait OrderRepository: Send + Sync + std::fmt::Debug {
    /// Persists the order and its items as one unit of work.
    ///
    /// An order without an id gets a store-assigned id, written back into
    /// `order`. An order that already carries an id overwrites whatever is
    /// stored under it, items included.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::StorageError`] if the store is
    /// unreachable or rejects the write.
    async fn save(&self, order: &mut Order) -> Result<OrderId, OrderServiceError>;

    /// Loads the order stored under `id` with its items in saved order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::OrderNotFound`] if nothing is stored
    /// under `id`, or [`OrderServiceError::StorageError`] on backend
    /// failure.
    async fn get(&self, id: OrderId) -> Result<Order, OrderServiceError>;
}
