//! API types for the price service HTTP API.
//!
//! This module defines the response body of `GET /api/prices`, the JSON error
//! body shared by every failing request, and the structured [`APIError`] that
//! maps onto HTTP status codes.

use crate::PriceResult;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Date format accepted in the `applicationDate` query parameter, as documented to clients.
pub const API_DATE_TIME_FORMAT: &str = "yyyy-MM-dd-HH:mm:ss";
/// chrono pattern equivalent of [`API_DATE_TIME_FORMAT`].
pub const API_DATE_TIME_PATTERN: &str = "%Y-%m-%d-%H:%M:%S";
/// chrono pattern used for `startDate` and `endDate` in responses.
pub const RESPONSE_DATE_TIME_PATTERN: &str = "%Y-%m-%d-%H.%M.%S";

/// Raw query parameters of `GET /api/prices`.
///
/// Every parameter is kept as text so that missing and mistyped values can
/// be reported individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceQueryParams {
	#[serde(rename = "applicationDate")]
	pub application_date: Option<String>,
	#[serde(rename = "productId")]
	pub product_id: Option<String>,
	#[serde(rename = "brandId")]
	pub brand_id: Option<String>,
}

/// Applicable price returned on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceResponse {
	#[serde(rename = "productId")]
	#[schema(example = 35455)]
	pub product_id: i64,
	#[serde(rename = "brandId")]
	#[schema(example = 1)]
	pub brand_id: i64,
	#[serde(rename = "priceList")]
	#[schema(example = 2)]
	pub price_list: i32,
	/// Start of the validity window
	#[serde(rename = "startDate", with = "response_date_format")]
	#[schema(value_type = String, example = "2020-06-14-15.00.00")]
	pub start_date: NaiveDateTime,
	/// End of the validity window
	#[serde(rename = "endDate", with = "response_date_format")]
	#[schema(value_type = String, example = "2020-06-14-18.30.00")]
	pub end_date: NaiveDateTime,
	/// Final price, written as a JSON number with its scale intact
	#[serde(with = "rust_decimal::serde::arbitrary_precision")]
	#[schema(value_type = f64, example = 25.45)]
	pub price: Decimal,
}

impl From<PriceResult> for PriceResponse {
	fn from(result: PriceResult) -> Self {
		Self {
			product_id: result.product_id,
			brand_id: result.brand_id,
			price_list: result.price_list,
			start_date: result.valid_from,
			end_date: result.valid_to,
			price: result.amount,
		}
	}
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
	/// Local time at which the error was produced
	pub timestamp: String,
	/// HTTP status code, repeated in the body
	pub status: u16,
	/// Short error label
	pub error: String,
	/// Human-readable description
	pub message: String,
	/// Offending field, for query validation failures
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<String>,
	/// Offending value, for query validation failures
	#[serde(skip_serializing_if = "Option::is_none")]
	#[schema(value_type = Option<Object>)]
	pub value: Option<serde_json::Value>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed or invalid request (400)
	BadRequest {
		error_type: String,
		message: String,
		field: Option<String>,
		value: Option<serde_json::Value>,
	},
	/// Unexpected failure (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let timestamp = chrono::Local::now()
			.naive_local()
			.format("%Y-%m-%dT%H:%M:%S%.3f")
			.to_string();
		let status = self.status_code();

		match self {
			APIError::BadRequest {
				error_type,
				message,
				field,
				value,
			} => ErrorResponse {
				timestamp,
				status,
				error: error_type.clone(),
				message: message.clone(),
				field: field.clone(),
				value: value.clone(),
			},
			APIError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				timestamp,
				status,
				error: error_type.clone(),
				message: message.clone(),
				field: None,
				value: None,
			},
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self.to_error_response())).into_response()
	}
}

/// Serde module for `yyyy-MM-dd-HH.mm.ss` timestamps.
pub mod response_date_format {
	use super::RESPONSE_DATE_TIME_PATTERN;
	use chrono::NaiveDateTime;
	use serde::{de::Error, Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(&value.format(RESPONSE_DATE_TIME_PATTERN))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		NaiveDateTime::parse_from_str(&s, RESPONSE_DATE_TIME_PATTERN).map_err(D::Error::custom)
	}
}
