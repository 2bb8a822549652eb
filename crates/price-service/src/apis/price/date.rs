//! Application date parsing.

use chrono::NaiveDateTime;
use price_core::PriceError;
use price_types::{API_DATE_TIME_FORMAT, API_DATE_TIME_PATTERN};

/// Parses a `yyyy-MM-dd-HH:mm:ss` date into a timestamp.
///
/// Calendar-impossible dates such as `2020-02-31-10:00:00` fail here.
pub fn parse_application_date(date: &str) -> Result<NaiveDateTime, PriceError> {
	tracing::debug!(date = %date, "Parsing application date");

	NaiveDateTime::parse_from_str(date.trim(), API_DATE_TIME_PATTERN).map_err(|e| {
		tracing::warn!(date = %date, error = %e, "Invalid application date");
		PriceError::invalid_query(
			"applicationDate",
			date,
			format!(
				"Invalid date format: {}. Expected format: {}",
				date, API_DATE_TIME_FORMAT
			),
		)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	#[test]
	fn test_parses_api_format() {
		let parsed = parse_application_date("2020-06-14-16:00:00").unwrap();
		let expected = NaiveDate::from_ymd_opt(2020, 6, 14)
			.unwrap()
			.and_hms_opt(16, 0, 0)
			.unwrap();
		assert_eq!(parsed, expected);
	}

	#[test]
	fn test_parses_edges_of_day() {
		assert!(parse_application_date("2020-01-01-00:00:00").is_ok());
		assert!(parse_application_date("2020-12-31-23:59:59").is_ok());
	}

	#[test]
	fn test_rejects_impossible_calendar_date() {
		let err = parse_application_date("2020-02-31-10:00:00").unwrap_err();
		assert!(err
			.to_string()
			.contains("Invalid date format: 2020-02-31-10:00:00. Expected format: yyyy-MM-dd-HH:mm:ss"));
	}

	#[test]
	fn test_leap_day() {
		assert!(parse_application_date("2020-02-29-12:00:00").is_ok());
		assert!(parse_application_date("2021-02-29-12:00:00").is_err());
	}

	#[test]
	fn test_rejects_iso_format() {
		assert!(parse_application_date("2020-06-14T16:00:00").is_err());
	}
}
