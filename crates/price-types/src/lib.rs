//! Common types module for the price service.
//!
//! This module defines the data model shared by the resolver, the candidate
//! stores and the HTTP layer, together with the configuration validation
//! framework used by pluggable implementations.

/// API types for the HTTP endpoint and its error bodies.
pub mod api;
/// Price records, queries and result projections.
pub mod price;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Configuration validation types for implementation-specific TOML tables.
pub mod validation;

pub use api::*;
pub use price::*;
pub use registry::ImplementationRegistry;
pub use validation::*;
