//! Query validation performed before any candidate lookup.

use crate::PriceError;
use price_types::PriceQuery;

pub const PRODUCT_ID_POSITIVE: &str = "Product ID must be positive";
pub const BRAND_ID_POSITIVE: &str = "Brand ID must be positive";

/// Checks the domain rules of a [`PriceQuery`].
pub struct QueryValidator;

impl QueryValidator {
	/// Rejects non-positive product or brand identifiers.
	pub fn validate(query: &PriceQuery) -> Result<(), PriceError> {
		if query.product_id <= 0 {
			return Err(PriceError::invalid_query(
				"productId",
				query.product_id,
				PRODUCT_ID_POSITIVE,
			));
		}
		if query.brand_id <= 0 {
			return Err(PriceError::invalid_query(
				"brandId",
				query.brand_id,
				BRAND_ID_POSITIVE,
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	fn query(product_id: i64, brand_id: i64) -> PriceQuery {
		let instant = NaiveDate::from_ymd_opt(2020, 6, 14)
			.unwrap()
			.and_hms_opt(16, 0, 0)
			.unwrap();
		PriceQuery::new(instant, product_id, brand_id)
	}

	#[test]
	fn test_accepts_positive_ids() {
		assert!(QueryValidator::validate(&query(35455, 1)).is_ok());
		assert!(QueryValidator::validate(&query(1, i64::MAX)).is_ok());
	}

	#[test]
	fn test_rejects_non_positive_product() {
		for product_id in [0, -1, -999] {
			match QueryValidator::validate(&query(product_id, 1)) {
				Err(PriceError::InvalidQuery {
					field,
					value,
					message,
				}) => {
					assert_eq!(field, "productId");
					assert_eq!(value, product_id.to_string());
					assert_eq!(message, PRODUCT_ID_POSITIVE);
				},
				other => panic!("unexpected outcome: {:?}", other),
			}
		}
	}

	#[test]
	fn test_rejects_non_positive_brand() {
		let err = QueryValidator::validate(&query(35455, 0)).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Invalid price query - brandId: 0 (Brand ID must be positive)"
		);
	}

	#[test]
	fn test_product_checked_before_brand() {
		let err = QueryValidator::validate(&query(0, 0)).unwrap_err();
		assert!(matches!(err, PriceError::InvalidQuery { field, .. } if field == "productId"));
	}
}
