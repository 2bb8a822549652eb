//! Applicable price selection.
//!
//! Given candidate records and an instant, keep the records whose closed
//! validity window contains the instant and pick the one with the highest
//! priority. Among equal top priorities the earliest candidate in input
//! order wins, which matches stores that already return rows ordered by
//! priority.

use chrono::NaiveDateTime;
use price_types::PriceRecord;

/// Outcome of resolving a price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// The applicable record.
	Found(PriceRecord),
	/// No candidate window contains the instant.
	NotFound,
}

impl Resolution {
	pub fn is_found(&self) -> bool {
		matches!(self, Resolution::Found(_))
	}

	pub fn into_option(self) -> Option<PriceRecord> {
		match self {
			Resolution::Found(record) => Some(record),
			Resolution::NotFound => None,
		}
	}
}

impl From<Option<PriceRecord>> for Resolution {
	fn from(record: Option<PriceRecord>) -> Self {
		record.map_or(Resolution::NotFound, Resolution::Found)
	}
}

/// Stateless price resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceResolver;

impl PriceResolver {
	/// Selects the applicable record among `candidates` at `instant`.
	///
	/// Candidates need not be filtered or ordered beforehand.
	pub fn resolve(candidates: &[PriceRecord], instant: NaiveDateTime) -> Resolution {
		let mut best: Option<&PriceRecord> = None;
		for candidate in candidates.iter().filter(|c| c.is_applicable_at(instant)) {
			// strict comparison keeps the first of equal priorities
			if best.is_none_or(|b| candidate.priority > b.priority) {
				best = Some(candidate);
			}
		}
		best.cloned().into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use rust_decimal::Decimal;
	use std::str::FromStr;

	fn at(month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2020, month, day)
			.unwrap()
			.and_hms_opt(hour, min, 0)
			.unwrap()
	}

	fn record(
		from: NaiveDateTime,
		to: NaiveDateTime,
		priority: i32,
		price_list: i32,
		amount: &str,
	) -> PriceRecord {
		PriceRecord {
			product_id: 35455,
			brand_id: 1,
			valid_from: from,
			valid_to: to,
			price_list,
			priority,
			amount: Decimal::from_str(amount).unwrap(),
			currency: "EUR".to_string(),
		}
	}

	fn base_tariff() -> PriceRecord {
		record(at(6, 14, 0, 0), at(12, 31, 23, 59), 0, 1, "35.50")
	}

	fn found(resolution: Resolution) -> PriceRecord {
		resolution.into_option().expect("expected a price")
	}

	#[test]
	fn test_scenario_single_long_window() {
		let result = found(PriceResolver::resolve(&[base_tariff()], at(6, 14, 16, 0)));
		assert_eq!(result.price_list, 1);
		assert_eq!(result.amount.to_string(), "35.50");
	}

	#[test]
	fn test_scenario_short_promotion() {
		let promo = record(at(6, 14, 15, 0), at(6, 14, 18, 30), 1, 2, "25.45");
		let result = found(PriceResolver::resolve(&[promo], at(6, 14, 16, 0)));
		assert_eq!(result.price_list, 2);
		assert_eq!(result.amount.to_string(), "25.45");
	}

	#[test]
	fn test_scenario_higher_priority_wins_overlap() {
		let morning = record(at(6, 15, 0, 0), at(6, 15, 11, 0), 1, 3, "30.50");
		let result = found(PriceResolver::resolve(
			&[base_tariff(), morning],
			at(6, 15, 10, 0),
		));
		assert_eq!(result.price_list, 3);
		assert_eq!(result.amount.to_string(), "30.50");
	}

	#[test]
	fn test_scenario_before_window() {
		let resolution = PriceResolver::resolve(&[base_tariff()], at(6, 13, 16, 0));
		assert_eq!(resolution, Resolution::NotFound);
	}

	#[test]
	fn test_empty_candidates() {
		assert_eq!(
			PriceResolver::resolve(&[], at(6, 14, 16, 0)),
			Resolution::NotFound
		);
	}

	#[test]
	fn test_boundaries_are_applicable() {
		let promo = record(at(6, 14, 15, 0), at(6, 14, 18, 30), 1, 2, "25.45");
		assert!(PriceResolver::resolve(&[promo.clone()], at(6, 14, 15, 0)).is_found());
		assert!(PriceResolver::resolve(&[promo.clone()], at(6, 14, 18, 30)).is_found());
		assert!(!PriceResolver::resolve(&[promo], at(6, 14, 18, 31)).is_found());
	}

	#[test]
	fn test_does_not_assume_priority_order() {
		let low = base_tariff();
		let high = record(at(6, 14, 15, 0), at(6, 14, 18, 30), 1, 2, "25.45");
		let instant = at(6, 14, 16, 0);

		let forward = found(PriceResolver::resolve(&[low.clone(), high.clone()], instant));
		let backward = found(PriceResolver::resolve(&[high, low], instant));
		assert_eq!(forward.price_list, 2);
		assert_eq!(backward.price_list, 2);
	}

	#[test]
	fn test_inapplicable_high_priority_is_ignored() {
		let expired = record(at(6, 1, 0, 0), at(6, 2, 0, 0), 9, 5, "1.00");
		let result = found(PriceResolver::resolve(
			&[expired, base_tariff()],
			at(6, 14, 16, 0),
		));
		assert_eq!(result.price_list, 1);
	}

	#[test]
	fn test_equal_priority_keeps_input_order() {
		let first = record(at(6, 14, 0, 0), at(6, 30, 0, 0), 1, 7, "10.00");
		let second = record(at(6, 14, 0, 0), at(6, 30, 0, 0), 1, 8, "20.00");
		let instant = at(6, 20, 0, 0);

		let result = found(PriceResolver::resolve(&[first.clone(), second.clone()], instant));
		assert_eq!(result.price_list, 7);
		let result = found(PriceResolver::resolve(&[second, first], instant));
		assert_eq!(result.price_list, 8);
	}

	#[test]
	fn test_negative_priorities_compare_normally() {
		let a = record(at(6, 14, 0, 0), at(6, 30, 0, 0), -5, 1, "1.00");
		let b = record(at(6, 14, 0, 0), at(6, 30, 0, 0), -1, 2, "2.00");
		let result = found(PriceResolver::resolve(&[a, b], at(6, 20, 0, 0)));
		assert_eq!(result.price_list, 2);
	}

	#[test]
	fn test_resolution_is_repeatable() {
		let candidates = vec![
			base_tariff(),
			record(at(6, 14, 15, 0), at(6, 14, 18, 30), 1, 2, "25.45"),
		];
		let instant = at(6, 14, 16, 0);
		assert_eq!(
			PriceResolver::resolve(&candidates, instant),
			PriceResolver::resolve(&candidates, instant)
		);
	}

	#[test]
	fn test_amount_scale_is_preserved() {
		let precise = record(at(6, 14, 0, 0), at(6, 30, 0, 0), 0, 1, "123.456789");
		let result = found(PriceResolver::resolve(&[precise], at(6, 20, 0, 0)));
		assert_eq!(result.amount.to_string(), "123.456789");
		assert_eq!(result.amount.scale(), 6);
	}
}
