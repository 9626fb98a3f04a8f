//! Order service: validates, persists, and loads orders.

use std::sync::Arc;

use crate::domain::{Order, OrderId, OrderItem, OrderRepository};
use crate::error::OrderServiceError;

/// Application core for order placement and lookup.
///
/// Stateless coordinator over a shared [`OrderRepository`]; the storage
/// backend is chosen at startup.
#[derive(Debug, Clone)]
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
}

impl OrderService {
    /// Creates a new `OrderService`.
    #[must_use]
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Returns a reference to the inner repository.
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn OrderRepository> {
        &self.repository
    }

    /// Builds, validates, and saves a new pending order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidRequest`] if the order fails
    /// validation, or the repository's error if the save fails.
    pub async fn place_order(
        &self,
        customer_id: i64,
        items: Vec<OrderItem>,
    ) -> Result<Order, OrderServiceError> {
        let mut order = Order::new(customer_id, items);
        order.validate()?;
        let total = order.total_price()?;

        let order_id = self.repository.save(&mut order).await?;

        tracing::info!(
            %order_id,
            customer_id,
            items = order.items.len(),
            %total,
            "order placed"
        );
        Ok(order)
    }

    /// Loads an order by id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::OrderNotFound`] if no such order exists,
    /// or the repository's storage error.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, OrderServiceError> {
        self.repository.get(order_id).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::OrderStatus;
    use crate::persistence::InMemoryOrderRepository;

    fn make_service() -> OrderService {
        OrderService::new(Arc::new(InMemoryOrderRepository::new()))
    }

    #[tokio::test]
    async fn place_order_assigns_id_and_persists() {
        let service = make_service();
        let items = vec![OrderItem::new("CAM", 5, Decimal::new(132, 2))];

        let Ok(order) = service.place_order(2, items).await else {
            panic!("order placement failed");
        };
        let Some(order_id) = order.id else {
            panic!("placed order should have an id");
        };
        assert_eq!(order.status, OrderStatus::Pending);

        let Ok(loaded) = service.get_order(order_id).await else {
            panic!("order not found");
        };
        assert_eq!(loaded.customer_id, 2);
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn place_order_rejects_invalid_order_without_saving() {
        let repository = Arc::new(InMemoryOrderRepository::new());
        let service = OrderService::new(Arc::clone(&repository) as Arc<dyn OrderRepository>);

        let result = service.place_order(2, Vec::new()).await;
        assert!(matches!(result, Err(OrderServiceError::InvalidRequest(_))));
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn place_order_rejects_overflowing_total() {
        let repository = Arc::new(InMemoryOrderRepository::new());
        let service = OrderService::new(Arc::clone(&repository) as Arc<dyn OrderRepository>);

        let items = vec![OrderItem::new("CAM", 2, Decimal::MAX)];
        let result = service.place_order(2, items).await;
        assert!(matches!(result, Err(OrderServiceError::InvalidRequest(_))));
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn place_order_rejects_sub_column_precision() {
        let service = make_service();
        let items = vec![OrderItem::new("CAM", 1, Decimal::new(1, 5))];
        let result = service.place_order(2, items).await;
        assert!(matches!(result, Err(OrderServiceError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn get_missing_order_is_not_found() {
        let service = make_service();
        let result = service.get_order(OrderId::new(1)).await;
        assert!(matches!(result, Err(OrderServiceError::OrderNotFound(_))));
    }
}
