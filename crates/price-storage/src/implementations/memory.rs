//! In-memory candidate store.
//!
//! Holds a fixed set of price records declared in configuration, optionally
//! preceded by the built-in demo catalogue. Useful for development and tests
//! where no price file is available.

use crate::{
	select_candidates, CandidateSource, StorageError, StorageFactory, StorageRegistry,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use price_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, PriceRecord, Schema,
};
use serde::Deserialize;

/// Demo catalogue: four price lists of product 35455 of brand 1.
const DEMO_CATALOGUE: &str = include_str!("../../data/demo_prices.json");

/// Returns the records of the built-in demo catalogue.
pub fn demo_catalogue() -> Result<Vec<PriceRecord>, StorageError> {
	serde_json::from_str(DEMO_CATALOGUE).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Configuration accepted by the memory store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryStorageConfig {
	/// Load the demo catalogue before the inline records.
	#[serde(default)]
	pub seed_demo: bool,
	/// Inline records, `[[storage.implementations.memory.prices]]`.
	#[serde(default)]
	pub prices: Vec<PriceRecord>,
}

/// Read-only in-memory store.
pub struct MemoryStorage {
	records: Vec<PriceRecord>,
}

impl MemoryStorage {
	/// Creates a store over the given records.
	pub fn new(records: Vec<PriceRecord>) -> Self {
		Self { records }
	}

	/// Creates a store from its configuration.
	pub fn from_config(config: MemoryStorageConfig) -> Result<Self, StorageError> {
		let mut records = if config.seed_demo {
			demo_catalogue()?
		} else {
			Vec::new()
		};
		records.extend(config.prices);
		Ok(Self::new(records))
	}

	/// Number of records held.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

#[async_trait]
impl CandidateSource for MemoryStorage {
	async fn find_candidates(
		&self,
		instant: NaiveDateTime,
		product_id: i64,
		brand_id: i64,
	) -> Result<Vec<PriceRecord>, StorageError> {
		let candidates = select_candidates(&self.records, instant, product_id, brand_id);
		tracing::debug!(
			product_id,
			brand_id,
			%instant,
			found = candidates.len(),
			"Memory store lookup"
		);
		Ok(candidates)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(memory_schema())
	}
}

fn positive_id(name: &str) -> Field {
	Field::new(
		name,
		FieldType::Integer {
			min: Some(1),
			max: None,
		},
	)
}

fn timestamp(name: &str) -> Field {
	Field::new(name, FieldType::String).with_validator(|v| {
		let s = v.as_str().unwrap_or_default();
		NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
			.map(|_| ())
			.map_err(|e| format!("'{}' is not a timestamp like 2020-06-14T00:00:00: {}", s, e))
	})
}

/// Schema of one inline price record.
fn price_record_schema() -> Schema {
	let unbounded = || FieldType::Integer {
		min: None,
		max: None,
	};
	Schema::new(
		vec![
			positive_id("product_id"),
			positive_id("brand_id"),
			timestamp("valid_from"),
			timestamp("valid_to"),
			Field::new("price_list", unbounded()),
			Field::new("priority", unbounded()),
			// Strings only, floats would lose the scale
			Field::new("amount", FieldType::String).with_validator(|v| {
				let s = v.as_str().unwrap_or_default();
				s.parse::<rust_decimal::Decimal>()
					.map(|_| ())
					.map_err(|e| format!("'{}' is not a decimal amount: {}", s, e))
			}),
			Field::new("currency", FieldType::String),
		],
		vec![],
	)
}

fn memory_schema() -> Schema {
	Schema::new(
		vec![],
		vec![
			Field::new("seed_demo", FieldType::Boolean),
			Field::new(
				"prices",
				FieldType::Array(Box::new(FieldType::Table(price_record_schema()))),
			),
		],
	)
}

/// Factory function to create a memory store from configuration.
///
/// Configuration parameters:
/// - `seed_demo` (optional): load the demo catalogue
/// - `prices` (optional): array of inline price records
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn CandidateSource>, StorageError> {
	memory_schema()
		.validate(config)
		.map_err(|e| StorageError::Configuration(format!("Invalid memory storage config: {}", e)))?;

	let memory_config: MemoryStorageConfig = config
		.clone()
		.try_into()
		.map_err(|e| StorageError::Configuration(format!("Invalid memory storage config: {}", e)))?;

	let storage = MemoryStorage::from_config(memory_config)?;
	tracing::info!(records = storage.len(), "Memory store ready");
	Ok(Box::new(storage))
}

/// Registry for the memory store implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
