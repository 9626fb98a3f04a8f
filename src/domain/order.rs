//! Order aggregate: an order and its owned line items.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::OrderId;
use crate::error::OrderServiceError;

/// Longest product code the `order_items.product_code` column holds.
pub const MAX_PRODUCT_CODE_LEN: usize = 64;

/// Fractional digits kept by the `DECIMAL(19,4)` price column.
pub const PRICE_SCALE: u32 = 4;

/// Exclusive upper bound of a `DECIMAL(19,4)` price (15 integer digits).
const PRICE_LIMIT: Decimal = Decimal::from_parts(0x_a4c6_8000, 0x_0003_8d7e, 0, false, 0);

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created and persisted, payment not yet settled.
    Pending,
    /// Payment settled.
    Success,
    /// Payment or fulfilment failed.
    Failed,
}

impl OrderStatus {
    /// Returns the stored string form of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(OrderServiceError::InvalidRequest(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// A single product line within an order.
///
/// Has no identity of its own; it lives and dies with its parent
/// [`Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    /// Product code (e.g. `"CAM"`).
    pub product_code: String,
    /// Number of units ordered.
    pub quantity: i32,
    /// Price of a single unit.
    pub unit_price: Decimal,
}

impl OrderItem {
    /// Creates a line item.
    #[must_use]
    pub fn new(product_code: impl Into<String>, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            product_code: product_code.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidRequest`] if the product does not
    /// fit in a [`Decimal`].
    pub fn line_total(&self) -> Result<Decimal, OrderServiceError> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| {
                OrderServiceError::InvalidRequest(format!(
                    "line total overflows for {}",
                    self.product_code
                ))
            })
    }
}

/// A customer's purchase record composed of one or more line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Store-assigned identifier; `None` until the first save.
    pub id: Option<OrderId>,
    /// Customer who placed the order.
    pub customer_id: i64,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Line items, in the order they were placed.
    pub items: Vec<OrderItem>,
    /// Creation timestamp, truncated to microseconds so it survives a
    /// `DATETIME(6)` round trip unchanged.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new, unsaved order in the [`OrderStatus::Pending`] state.
    #[must_use]
    pub fn new(customer_id: i64, items: Vec<OrderItem>) -> Self {
        Self {
            id: None,
            customer_id,
            status: OrderStatus::Pending,
            items,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Sum of every item's line total.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidRequest`] if a line total or the
    /// running sum overflows.
    pub fn total_price(&self) -> Result<Decimal, OrderServiceError> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| {
            total.checked_add(item.line_total()?).ok_or_else(|| {
                OrderServiceError::InvalidRequest("order total overflows".to_string())
            })
        })
    }

    /// Checks the order can be persisted.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidRequest`] if the customer id is
    /// not positive, the item list is empty, an item has an empty or
    /// over-long product code, a non-positive quantity, or a unit price that
    /// is negative or does not fit `DECIMAL(19,4)` exactly, or the order
    /// total overflows.
    pub fn validate(&self) -> Result<(), OrderServiceError> {
        if self.customer_id <= 0 {
            return Err(OrderServiceError::InvalidRequest(format!(
                "customer_id must be positive, got {}",
                self.customer_id
            )));
        }
        if self.items.is_empty() {
            return Err(OrderServiceError::InvalidRequest(
                "order must contain at least one item".to_string(),
            ));
        }
        for (position, item) in self.items.iter().enumerate() {
            if item.product_code.trim().is_empty() {
                return Err(OrderServiceError::InvalidRequest(format!(
                    "item {position}: product_code must not be empty"
                )));
            }
            if item.product_code.chars().count() > MAX_PRODUCT_CODE_LEN {
                return Err(OrderServiceError::InvalidRequest(format!(
                    "item {position}: product_code longer than {MAX_PRODUCT_CODE_LEN} characters"
                )));
            }
            if item.quantity <= 0 {
                return Err(OrderServiceError::InvalidRequest(format!(
                    "item {position}: quantity must be positive, got {}",
                    item.quantity
                )));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(OrderServiceError::InvalidRequest(format!(
                    "item {position}: unit_price must not be negative, got {}",
                    item.unit_price
                )));
            }
            if item.unit_price.normalize().scale() > PRICE_SCALE {
                return Err(OrderServiceError::InvalidRequest(format!(
                    "item {position}: unit_price has more than {PRICE_SCALE} decimal places, got {}",
                    item.unit_price
                )));
            }
            if item.unit_price >= PRICE_LIMIT {
                return Err(OrderServiceError::InvalidRequest(format!(
                    "item {position}: unit_price must be below {PRICE_LIMIT}, got {}",
                    item.unit_price
                )));
            }
        }
        self.total_price()?;
        Ok(())
    }
}
