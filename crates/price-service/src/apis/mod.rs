//! HTTP API handlers.

pub mod price;
