//! Price Request Validation
//!
//! Checks the raw `applicationDate` value before a query is built. The check
//! is textual plus a per-component range check; it does not know month
//! lengths, so `2020-02-31-10:00:00` passes here and is rejected later when
//! the date is parsed. Identifier rules belong to the core query validator.

use once_cell::sync::Lazy;
use price_core::PriceError;
use price_types::API_DATE_TIME_FORMAT;
use regex::Regex;

const APPLICATION_DATE: &str = "applicationDate";

pub const APPLICATION_DATE_REQUIRED: &str = "Application date is required";
pub const INVALID_DATE_FORMAT_VALUES: &str = "Invalid date format or values";

static APPLICATION_DATE_REGEX: Lazy<Result<Regex, regex::Error>> =
	Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-[0-9]{2}:[0-9]{2}:[0-9]{2}$"));

/// Handles validation of price requests
pub struct PriceRequestValidator;

impl PriceRequestValidator {
	/// Validates presence, shape and component ranges of the date.
	pub fn validate_application_date(application_date: &str) -> Result<(), PriceError> {
		if application_date.trim().is_empty() {
			return Err(PriceError::invalid_query(
				APPLICATION_DATE,
				application_date,
				APPLICATION_DATE_REQUIRED,
			));
		}

		let matches = match APPLICATION_DATE_REGEX.as_ref() {
			Ok(re) => re.is_match(application_date),
			Err(e) => {
				tracing::error!(error = %e, "Application date pattern failed to compile");
				false
			},
		};
		if !matches {
			return Err(PriceError::invalid_query(
				APPLICATION_DATE,
				application_date,
				format!("Application date must be in format {}", API_DATE_TIME_FORMAT),
			));
		}

		Self::validate_date_values(application_date)
	}

	fn validate_date_values(application_date: &str) -> Result<(), PriceError> {
		let invalid = |message: String| {
			PriceError::invalid_query(APPLICATION_DATE, application_date, message)
		};

		// yyyy-MM-dd-HH:mm:ss, shape already checked
		let components: Vec<u32> = application_date
			.split(['-', ':'])
			.map(str::parse)
			.collect::<Result<_, _>>()
			.map_err(|_| invalid(INVALID_DATE_FORMAT_VALUES.to_string()))?;
		let [_, month, day, hour, minute, second] = components[..] else {
			return Err(invalid(INVALID_DATE_FORMAT_VALUES.to_string()));
		};

		let checks = [
			("month", month, 1, 12),
			("day", day, 1, 31),
			("hour", hour, 0, 23),
			("minute", minute, 0, 59),
			("second", second, 0, 59),
		];
		for (name, value, min, max) in checks {
			if value < min || value > max {
				return Err(invalid(format!("Invalid {} value: {}", name, value)));
			}
		}

		Ok(())
	}
}
