//! Order DTOs for place and get operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Order, OrderId, OrderItem, OrderStatus};
use crate::error::OrderServiceError;

/// A line item as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemDto {
    /// Product code (e.g. `"CAM"`).
    pub product_code: String,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price as a decimal string (e.g. `"1.32"`).
    pub unit_price: String,
}

impl OrderItemDto {
    /// Converts the DTO into a domain item, parsing the price.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidRequest`] if `unit_price` is not
    /// a decimal number.
    pub fn into_domain(self) -> Result<OrderItem, OrderServiceError> {
        let unit_price: Decimal = self.unit_price.trim().parse().map_err(|_| {
            OrderServiceError::InvalidRequest(format!(
                "invalid unit_price for {}: {:?}",
                self.product_code, self.unit_price
            ))
        })?;
        Ok(OrderItem::new(self.product_code, self.quantity, unit_price))
    }
}

impl From<&OrderItem> for OrderItemDto {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_code: item.product_code.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.normalize().to_string(),
        }
    }
}

/// Request body for `POST /orders`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    /// Customer placing the order.
    pub customer_id: i64,
    /// Line items, in order.
    pub items: Vec<OrderItemDto>,
}

/// Response body for `POST /orders` (201 Created).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaceOrderResponse {
    /// Store-assigned order identifier.
    pub order_id: i64,
    /// Order status.
    pub status: OrderStatus,
    /// Server creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Full order detail for `GET /orders/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    /// Order identifier.
    pub order_id: i64,
    /// Customer who placed the order.
    pub customer_id: i64,
    /// Order status.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Line items, in order.
    pub items: Vec<OrderItemDto>,
    /// Sum of `unit_price * quantity` over all items, as a decimal string.
    pub total_price: String,
}

impl OrderResponse {
    /// Builds the response for an order stored under `order_id`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::Internal`] if the stored items add up to
    /// a total that does not fit in a decimal.
    pub fn new(order_id: OrderId, order: &Order) -> Result<Self, OrderServiceError> {
        let total_price = order
            .total_price()
            .map_err(|e| OrderServiceError::Internal(format!("order {order_id}: {e}")))?;
        Ok(Self {
            order_id: order_id.get(),
            customer_id: order.customer_id,
            status: order.status,
            created_at: order.created_at,
            items: order.items.iter().map(OrderItemDto::from).collect(),
            total_price: total_price.normalize().to_string(),
        })
    }
}
