//! Service layer: business logic orchestration.
//!
//! [`OrderService`] validates orders and delegates storage to a
//! [`crate::domain::OrderRepository`].

pub mod order_service;

pub use order_service::OrderService;
