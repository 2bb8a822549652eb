//! Candidate stores for the price service.
//!
//! A store supplies the price records that may apply to a (product, brand)
//! pair at an instant. Stores are free to pre-filter by validity window and
//! pre-sort by priority; the resolver re-derives the answer either way.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use price_types::{ConfigSchema, ImplementationRegistry, PriceRecord};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur while fetching candidates.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Source of candidate price records.
#[async_trait]
pub trait CandidateSource: Send + Sync {
	/// Returns the records that may apply to `product_id` of `brand_id` at `instant`.
	///
	/// An empty vector means no candidate; errors are reserved for the store
	/// itself being unavailable or corrupt.
	async fn find_candidates(
		&self,
		instant: NaiveDateTime,
		product_id: i64,
		brand_id: i64,
	) -> Result<Vec<PriceRecord>, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for store factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn CandidateSource>, StorageError>;

/// Registry trait for store implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered store implementations as (name, factory) pairs.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Keeps the records of `product_id`/`brand_id` whose window contains
/// `instant`, highest priority first. The sort is stable so equal
/// priorities keep their stored order.
pub(crate) fn select_candidates<'a>(
	records: impl IntoIterator<Item = &'a PriceRecord>,
	instant: NaiveDateTime,
	product_id: i64,
	brand_id: i64,
) -> Vec<PriceRecord> {
	let mut selected: Vec<PriceRecord> = records
		.into_iter()
		.filter(|r| r.product_id == product_id && r.brand_id == brand_id)
		.filter(|r| r.is_applicable_at(instant))
		.cloned()
		.collect();
	selected.sort_by(|a, b| b.priority.cmp(&a.priority));
	selected
}
