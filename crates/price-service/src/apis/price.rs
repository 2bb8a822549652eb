//! Price API Implementation
//!
//! Implements `GET /api/prices`: turns raw query parameters into a
//! [`PriceQuery`], runs the price lookup and maps the outcome to a response
//! body or an [`APIError`].

pub mod date;
pub mod validation;

use price_core::{PriceError, PriceService, Resolution};
use price_types::{APIError, PriceQuery, PriceQueryParams, PriceResponse, PriceResult};
use thiserror::Error;
use tracing::{error, info, warn};

use self::date::parse_application_date;
use self::validation::PriceRequestValidator;

/// Errors that can occur while handling a price request.
#[derive(Debug, Error)]
pub enum PriceRequestError {
	#[error("Required parameter '{0}' is missing")]
	MissingParameter(&'static str),
	#[error("Parameter '{name}' has invalid value: {value}")]
	InvalidType { name: &'static str, value: String },
	#[error("Malformed query string: {0}")]
	MalformedQuery(String),
	#[error(transparent)]
	Price(#[from] PriceError),
}

impl From<PriceRequestError> for APIError {
	fn from(err: PriceRequestError) -> Self {
		match err {
			PriceRequestError::MissingParameter(name) => APIError::BadRequest {
				error_type: "Missing request parameter".to_string(),
				message: err.to_string(),
				field: Some(name.to_string()),
				value: None,
			},
			PriceRequestError::InvalidType { name, ref value } => APIError::BadRequest {
				error_type: "Invalid parameter type".to_string(),
				message: err.to_string(),
				field: Some(name.to_string()),
				value: Some(serde_json::Value::String(value.clone())),
			},
			PriceRequestError::MalformedQuery(_) => APIError::BadRequest {
				error_type: "Invalid parameter type".to_string(),
				message: err.to_string(),
				field: None,
				value: None,
			},
			PriceRequestError::Price(PriceError::InvalidQuery {
				ref field,
				ref value,
				..
			}) => APIError::BadRequest {
				error_type: "Invalid Request".to_string(),
				message: err.to_string(),
				field: Some(field.clone()),
				value: Some(json_value(value)),
			},
			PriceRequestError::Price(PriceError::Source(_)) => APIError::InternalServerError {
				error_type: "Internal Server Error".to_string(),
				message: "An unexpected error occurred".to_string(),
			},
		}
	}
}

/// Numbers stay numbers in error bodies, everything else is a string.
fn json_value(value: &str) -> serde_json::Value {
	value
		.parse::<i64>()
		.map(serde_json::Value::from)
		.unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

fn required<'a>(
	value: &'a Option<String>,
	name: &'static str,
) -> Result<&'a str, PriceRequestError> {
	value
		.as_deref()
		.ok_or(PriceRequestError::MissingParameter(name))
}

fn parse_id(value: &str, name: &'static str) -> Result<i64, PriceRequestError> {
	value
		.trim()
		.parse()
		.map_err(|_| PriceRequestError::InvalidType {
			name,
			value: value.to_string(),
		})
}

/// Handles a price request.
///
/// Returns `Ok(None)` when no price applies.
pub async fn get_price(
	params: PriceQueryParams,
	service: &PriceService,
) -> Result<Option<PriceResponse>, PriceRequestError> {
	info!(
		date = ?params.application_date,
		product_id = ?params.product_id,
		brand_id = ?params.brand_id,
		"Received price request"
	);

	match process_price_request(&params, service).await {
		Ok(Some(response)) => {
			info!(price = %response.price, price_list = response.price_list, "Price request successful");
			Ok(Some(response))
		},
		Ok(None) => {
			info!("Price request completed - no price found for given criteria");
			Ok(None)
		},
		Err(e) => {
			match &e {
				PriceRequestError::Price(PriceError::Source(source)) => {
					error!(error = %source, "Error processing price request")
				},
				_ => warn!(error = %e, "Rejected price request"),
			}
			Err(e)
		},
	}
}

async fn process_price_request(
	params: &PriceQueryParams,
	service: &PriceService,
) -> Result<Option<PriceResponse>, PriceRequestError> {
	let application_date = required(&params.application_date, "applicationDate")?;
	let product_id = parse_id(required(&params.product_id, "productId")?, "productId")?;
	let brand_id = parse_id(required(&params.brand_id, "brandId")?, "brandId")?;

	PriceRequestValidator::validate_application_date(application_date)?;
	let instant = parse_application_date(application_date)?;

	let query = PriceQuery::new(instant, product_id, brand_id);
	let response = match service.find_applicable_price(&query).await? {
		Resolution::Found(record) => Some(PriceResponse::from(PriceResult::from(record))),
		Resolution::NotFound => None,
	};
	Ok(response)
}
