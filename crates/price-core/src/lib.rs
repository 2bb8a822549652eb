//! Core price lookup for the price service.
//!
//! [`PriceService`] validates a [`PriceQuery`], asks the configured
//! [`CandidateSource`] for candidates and lets [`PriceResolver`] pick the
//! applicable one. The service keeps no state between calls and can be
//! shared freely across concurrent requests.

use price_storage::{CandidateSource, StorageError};
use price_types::PriceQuery;
use std::sync::Arc;
use thiserror::Error;

pub mod builder;
pub mod resolver;
pub mod validator;

pub use builder::{BuilderError, PriceServiceBuilder};
pub use resolver::{PriceResolver, Resolution};
pub use validator::QueryValidator;

/// Errors that can occur while looking up a price.
///
/// "No applicable price" is not an error; it is [`Resolution::NotFound`].
#[derive(Debug, Error)]
pub enum PriceError {
	/// The query was rejected before any lookup.
	#[error("Invalid price query - {field}: {value} ({message})")]
	InvalidQuery {
		field: String,
		value: String,
		message: String,
	},
	/// The candidate source failed.
	#[error("Candidate source error: {0}")]
	Source(#[from] StorageError),
}

impl PriceError {
	pub fn invalid_query(
		field: impl Into<String>,
		value: impl ToString,
		message: impl Into<String>,
	) -> Self {
		PriceError::InvalidQuery {
			field: field.into(),
			value: value.to_string(),
			message: message.into(),
		}
	}
}

/// Price lookup use case over an injected candidate source.
#[derive(Clone)]
pub struct PriceService {
	source: Arc<dyn CandidateSource>,
}

impl PriceService {
	pub fn new(source: Arc<dyn CandidateSource>) -> Self {
		Self { source }
	}

	/// Finds the price applicable to `query`.
	///
	/// Invalid queries fail before the candidate source is consulted.
	pub async fn find_applicable_price(&self, query: &PriceQuery) -> Result<Resolution, PriceError> {
		tracing::info!(
			product_id = query.product_id,
			brand_id = query.brand_id,
			instant = %query.instant,
			"Executing price lookup"
		);

		QueryValidator::validate(query)?;

		let candidates = self
			.source
			.find_candidates(query.instant, query.product_id, query.brand_id)
			.await
			.inspect_err(|e| tracing::error!(error = %e, "Candidate lookup failed"))?;
		tracing::debug!(candidates = candidates.len(), "Candidates fetched");

		let resolution = PriceResolver::resolve(&candidates, query.instant);
		match &resolution {
			Resolution::Found(record) => tracing::info!(
				price = %record.amount,
				price_list = record.price_list,
				"Price lookup successful"
			),
			Resolution::NotFound => tracing::warn!(
				product_id = query.product_id,
				brand_id = query.brand_id,
				"No applicable price found"
			),
		}

		Ok(resolution)
	}
}
