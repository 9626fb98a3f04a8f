//! Data Transfer Objects for REST request/response serialization.
//!
//! Prices are serialized as JSON strings to keep decimal precision.

pub mod order_dto;

pub use order_dto::*;
