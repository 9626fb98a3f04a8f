//! Domain layer: the order aggregate and the repository port.
//!
//! This module holds the server-side domain model: order identity, the
//! [`Order`] aggregate with its owned [`OrderItem`]s, and the
//! [`OrderRepository`] trait that persistence adapters implement.

pub mod order;
pub mod order_id;
pub mod repository;

pub use order::{Order, OrderItem, OrderStatus};
pub use order_id::OrderId;
pub use repository::OrderRepository;
