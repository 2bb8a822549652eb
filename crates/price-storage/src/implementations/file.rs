//! File-backed candidate store.
//!
//! Reads a JSON array of price records from disk on every lookup, so edits
//! to the file are visible to the next request without a restart. A missing
//! or malformed file is reported as a store failure, never as "no price".

use crate::{
	select_candidates, CandidateSource, StorageError, StorageFactory, StorageRegistry,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use price_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, PriceRecord, Schema, ValidationError,
};
use std::path::PathBuf;
use tokio::fs;

const DEFAULT_PATH: &str = "./data/prices.json";

/// Store reading price records from a JSON file.
pub struct FileStorage {
	path: PathBuf,
}

impl FileStorage {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	async fn load(&self) -> Result<Vec<PriceRecord>, StorageError> {
		let bytes = fs::read(&self.path).await.map_err(|e| {
			StorageError::Backend(format!("Failed to read {}: {}", self.path.display(), e))
		})?;
		serde_json::from_slice(&bytes).map_err(|e| {
			StorageError::Serialization(format!("Malformed price file {}: {}", self.path.display(), e))
		})
	}
}

#[async_trait]
impl CandidateSource for FileStorage {
	async fn find_candidates(
		&self,
		instant: NaiveDateTime,
		product_id: i64,
		brand_id: i64,
	) -> Result<Vec<PriceRecord>, StorageError> {
		let records = self.load().await?;
		let candidates = select_candidates(&records, instant, product_id, brand_id);
		tracing::debug!(
			path = %self.path.display(),
			scanned = records.len(),
			found = candidates.len(),
			"File store lookup"
		);
		Ok(candidates)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new("path", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some(p) if !p.trim().is_empty() => Ok(()),
					_ => Err("path cannot be empty".to_string()),
				}
			})],
		);
		schema.validate(config)
	}
}

/// Factory function to create a file store from configuration.
///
/// Configuration parameters:
/// - `path`: JSON file holding an array of price records (default: "./data/prices.json")
///
/// The file is not opened here; a missing file surfaces on the first lookup.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn CandidateSource>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(format!("Invalid file storage config: {}", e)))?;

	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_PATH);

	tracing::info!(path = %path, "File store ready");
	Ok(Box::new(FileStorage::new(PathBuf::from(path))))
}

/// Registry for the file store implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use std::io::Write;
	use tempfile::NamedTempFile;

	const PRICES: &str = r#"[
		{"product_id": 35455, "brand_id": 1, "valid_from": "2020-06-14T00:00:00", "valid_to": "2020-12-31T23:59:59",
		 "price_list": 1, "priority": 0, "amount": "35.50", "currency": "EUR"},
		{"product_id": 35455, "brand_id": 1, "valid_from": "2020-06-14T15:00:00", "valid_to": "2020-06-14T18:30:00",
		 "price_list": 2, "priority": 1, "amount": "25.45", "currency": "EUR"}
	]"#;

	fn write_file(content: &str) -> NamedTempFile {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	fn at(hour: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2020, 6, 14)
			.unwrap()
			.and_hms_opt(hour, 0, 0)
			.unwrap()
	}

	#[tokio::test]
	async fn test_reads_candidates_from_file() {
		let file = write_file(PRICES);
		let storage = FileStorage::new(file.path().to_path_buf());

		let found = storage.find_candidates(at(16), 35455, 1).await.unwrap();
		let lists: Vec<i32> = found.iter().map(|r| r.price_list).collect();
		assert_eq!(lists, vec![2, 1]);

		let found = storage.find_candidates(at(10), 35455, 1).await.unwrap();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].amount.to_string(), "35.50");
	}

	#[tokio::test]
	async fn test_missing_file_is_backend_error() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path().join("absent.json"));

		let err = storage.find_candidates(at(16), 35455, 1).await.unwrap_err();
		assert!(matches!(err, StorageError::Backend(_)));
	}

	#[tokio::test]
	async fn test_malformed_file_is_serialization_error() {
		let file = write_file("{ not json");
		let storage = FileStorage::new(file.path().to_path_buf());

		let err = storage.find_candidates(at(16), 35455, 1).await.unwrap_err();
		assert!(matches!(err, StorageError::Serialization(_)));
	}

	#[tokio::test]
	async fn test_factory_uses_configured_path() {
		let file = write_file(PRICES);
		let mut table = toml::map::Map::new();
		table.insert(
			"path".to_string(),
			toml::Value::String(file.path().to_string_lossy().into_owned()),
		);

		let storage = create_storage(&toml::Value::Table(table)).unwrap();
		let found = storage.find_candidates(at(16), 35455, 1).await.unwrap();
		assert_eq!(found.len(), 2);
	}

	#[test]
	fn test_factory_rejects_empty_path() {
		let mut table = toml::map::Map::new();
		table.insert("path".to_string(), toml::Value::String("  ".to_string()));

		let err = create_storage(&toml::Value::Table(table)).err().unwrap();
		assert!(matches!(err, StorageError::Configuration(_)));
	}
}
