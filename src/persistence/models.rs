//! Database row models for orders and their line items.
//!
//! Rows are decoded into these structs by sqlx and only then converted
//! into domain types, so malformed data is caught at the boundary and
//! reported as a storage error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::{Order, OrderId, OrderItem, OrderStatus};
use crate::error::OrderServiceError;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    /// Auto-increment primary key.
    pub id: i64,
    /// Customer who placed the order.
    pub customer_id: i64,
    /// Lowercase status string (see [`OrderStatus::as_str`]).
    pub status: String,
    /// Creation timestamp (`DATETIME(6)`, UTC).
    pub created_at: DateTime<Utc>,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    /// Zero-based position of the item within its order.
    pub position: i32,
    /// Product code.
    pub product_code: String,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price (`DECIMAL(19,4)`).
    pub unit_price: Decimal,
}

impl OrderRow {
    /// Assembles the domain order from its row and item rows.
    ///
    /// Item rows must already be sorted by `position`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::StorageError`] if the stored status is
    /// not a known [`OrderStatus`].
    pub fn into_order(self, items: Vec<OrderItemRow>) -> Result<Order, OrderServiceError> {
        let status: OrderStatus = self.status.parse().map_err(|_| {
            OrderServiceError::StorageError(format!(
                "order {} has malformed status {:?}",
                self.id, self.status
            ))
        })?;

        Ok(Order {
            id: Some(OrderId::new(self.id)),
            customer_id: self.customer_id,
            status,
            items: items.into_iter().map(OrderItem::from).collect(),
            created_at: self.created_at,
        })
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_code: row.product_code,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}
