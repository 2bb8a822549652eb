//! Builder for constructing a [`PriceService`] from configuration.
//!
//! Every store listed under `[storage.implementations]` that has a registered
//! factory is created (so a broken table is reported at startup), then the
//! primary one is handed to the service.

use crate::PriceService;
use price_config::Config;
use price_storage::{CandidateSource, StorageError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during service construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for constructing a PriceService with a pluggable candidate source.
pub struct PriceServiceBuilder {
	config: Config,
}

impl PriceServiceBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the service using the given store factories, keyed by name.
	pub fn build<SF>(self, storage_factories: HashMap<String, SF>) -> Result<PriceService, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn CandidateSource>, StorageError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			let Some(factory) = storage_factories.get(name) else {
				tracing::warn!(component = "storage", implementation = %name, "No factory registered, skipping");
				continue;
			};
			match factory(config) {
				Ok(implementation) => {
					let is_primary = &self.config.storage.primary == name;
					tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
					storage_impls.insert(name.clone(), implementation);
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %name,
						error = %e,
						"Failed to create storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let primary = &self.config.storage.primary;
		let source = storage_impls.remove(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"Primary storage '{}' has no registered implementation",
				primary
			))
		})?;

		Ok(PriceService::new(Arc::from(source)))
	}
}
