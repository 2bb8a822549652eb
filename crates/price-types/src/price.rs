//! Price model types.
//!
//! A [`PriceRecord`] is one price tier for a product of a brand, valid over a
//! closed time window. Queries and results are plain values built per request.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single time-bounded, prioritised price tier.
///
/// `valid_from <= valid_to` is expected to hold; it is the responsibility of
/// whoever supplies the record and is not re-checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
	/// Product identifier.
	pub product_id: i64,
	/// Brand identifier.
	pub brand_id: i64,
	/// First instant (inclusive) at which this price applies.
	pub valid_from: NaiveDateTime,
	/// Last instant (inclusive) at which this price applies.
	pub valid_to: NaiveDateTime,
	/// Opaque price list (tariff) identifier.
	pub price_list: i32,
	/// Higher priority wins when several windows contain the same instant.
	pub priority: i32,
	/// Exact amount, scale preserved as supplied.
	pub amount: Decimal,
	/// ISO currency code.
	pub currency: String,
}

impl PriceRecord {
	/// Returns true when `instant` lies inside `[valid_from, valid_to]`.
	pub fn is_applicable_at(&self, instant: NaiveDateTime) -> bool {
		self.valid_from <= instant && instant <= self.valid_to
	}
}

/// A request for the price of a product of a brand at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuery {
	pub instant: NaiveDateTime,
	pub product_id: i64,
	pub brand_id: i64,
}

impl PriceQuery {
	pub fn new(instant: NaiveDateTime, product_id: i64, brand_id: i64) -> Self {
		Self {
			instant,
			product_id,
			brand_id,
		}
	}
}

/// Projection of a matched [`PriceRecord`] returned to callers.
///
/// The currency of the record is not carried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceResult {
	pub product_id: i64,
	pub brand_id: i64,
	pub price_list: i32,
	pub valid_from: NaiveDateTime,
	pub valid_to: NaiveDateTime,
	pub amount: Decimal,
}

impl From<&PriceRecord> for PriceResult {
	fn from(record: &PriceRecord) -> Self {
		Self {
			product_id: record.product_id,
			brand_id: record.brand_id,
			price_list: record.price_list,
			valid_from: record.valid_from,
			valid_to: record.valid_to,
			amount: record.amount,
		}
	}
}

impl From<PriceRecord> for PriceResult {
	fn from(record: PriceRecord) -> Self {
		Self::from(&record)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use std::str::FromStr;

	fn at(day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2020, 6, day)
			.unwrap()
			.and_hms_opt(hour, min, sec)
			.unwrap()
	}

	fn record() -> PriceRecord {
		PriceRecord {
			product_id: 35455,
			brand_id: 1,
			valid_from: at(14, 15, 0, 0),
			valid_to: at(14, 18, 30, 0),
			price_list: 2,
			priority: 1,
			amount: Decimal::from_str("25.45").unwrap(),
			currency: "EUR".to_string(),
		}
	}

	#[test]
	fn test_window_bounds_are_inclusive() {
		let record = record();
		assert!(record.is_applicable_at(at(14, 15, 0, 0)));
		assert!(record.is_applicable_at(at(14, 18, 30, 0)));
		assert!(record.is_applicable_at(at(14, 16, 0, 0)));
		assert!(!record.is_applicable_at(at(14, 14, 59, 59)));
		assert!(!record.is_applicable_at(at(14, 18, 30, 1)));
	}

	#[test]
	fn test_result_projection_drops_currency() {
		let record = record();
		let result = PriceResult::from(&record);
		assert_eq!(result.product_id, 35455);
		assert_eq!(result.brand_id, 1);
		assert_eq!(result.price_list, 2);
		assert_eq!(result.valid_from, record.valid_from);
		assert_eq!(result.valid_to, record.valid_to);
		assert_eq!(result.amount.to_string(), "25.45");
	}

	#[test]
	fn test_record_deserializes_with_exact_amount() {
		let json = r#"{
			"product_id": 35455,
			"brand_id": 1,
			"valid_from": "2020-06-14T00:00:00",
			"valid_to": "2020-12-31T23:59:59",
			"price_list": 1,
			"priority": 0,
			"amount": "123.456789",
			"currency": "EUR"
		}"#;
		let record: PriceRecord = serde_json::from_str(json).unwrap();
		assert_eq!(record.amount.to_string(), "123.456789");
		assert_eq!(record.amount.scale(), 6);
	}
}
