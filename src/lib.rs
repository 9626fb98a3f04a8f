//! # order-service
//!
//! Order microservice: persists orders and their line items in MySQL and
//! exposes placement and lookup over a small REST API.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── OrderService (service/)
//!     │
//!     ├── OrderRepository port (domain/)
//!     │
//!     ├── MySqlOrderRepository (persistence/, sqlx)
//!     └── InMemoryOrderRepository (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
