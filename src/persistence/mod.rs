//! Persistence layer: MySQL and in-memory order repositories.
//!
//! Both adapters implement [`crate::domain::OrderRepository`]. The MySQL
//! implementation uses `sqlx::MySqlPool` and is configured from a
//! driver-style data source name (see [`dsn`]).

pub mod dsn;
pub mod memory;
pub mod models;
pub mod mysql;

pub use dsn::DataSourceName;
pub use memory::InMemoryOrderRepository;
pub use mysql::{MySqlOrderRepository, MySqlSettings};
