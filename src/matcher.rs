//! Stateless predicates deciding whether a recorded value satisfies a candidate, and the display order of choices.

use crate::value::{CharacterValue, LengthRange};
use core::cmp::Ordering;

#[must_use]
pub fn matches_choice(value: &CharacterValue, candidate: &str) -> bool {
	value.choice == candidate
}

/// Inclusive at both ends. `NaN` never matches.
#[must_use]
pub fn matches_length(range: &LengthRange, candidate: f64) -> bool {
	range.min <= candidate && candidate <= range.max
}

fn parse_number(text: &str) -> Option<f64> {
	text.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

fn is_not_applicable(value: &CharacterValue) -> bool {
	value.choice.eq_ignore_ascii_case("NA")
}

/// Display order for the choices of a text filter.
///
/// Tried in turn, first decisive rule wins:
/// 1. both `friendly_text`s numeric: numeric order,
/// 2. both `choice`s numeric: numeric order,
/// 3. a `choice` of `"NA"` (any case) goes last,
/// 4. `friendly_text`, case-insensitively,
/// 5. `choice`, case-insensitively.
///
/// Use with a stable sort; full ties keep their input order.
#[must_use]
pub fn compare_filter_choices(a: &CharacterValue, b: &CharacterValue) -> Ordering {
	if let (Some(x), Some(y)) = (parse_number(&a.friendly_text), parse_number(&b.friendly_text)) {
		return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
	}
	if let (Some(x), Some(y)) = (parse_number(&a.choice), parse_number(&b.choice)) {
		return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
	}
	match (is_not_applicable(a), is_not_applicable(b)) {
		(true, false) => return Ordering::Greater,
		(false, true) => return Ordering::Less,
		(true, true) => return Ordering::Equal,
		(false, false) => (),
	}
	a.friendly_text
		.to_lowercase()
		.cmp(&b.friendly_text.to_lowercase())
		.then_with(|| a.choice.to_lowercase().cmp(&b.choice.to_lowercase()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::taxon::TaxonSet;

	fn value(choice: &str, friendly_text: &str) -> CharacterValue {
		CharacterValue::new(choice, friendly_text, TaxonSet::new())
	}

	#[test]
	fn non_finite_words_are_not_numbers() {
		assert_eq!(parse_number("nan"), None);
		assert_eq!(parse_number("inf"), None);
		assert_eq!(parse_number(" 2.5 "), Some(2.5));
	}

	#[test]
	fn numeric_friendly_text_wins_over_choice() {
		let a = value("b", "10");
		let b = value("a", "9");
		assert_eq!(compare_filter_choices(&a, &b), Ordering::Greater);
	}

	#[test]
	fn not_applicable_sorts_last() {
		let na = value("na", "Not applicable");
		let zebra = value("zebra", "Zebra");
		assert_eq!(compare_filter_choices(&na, &zebra), Ordering::Greater);
		assert_eq!(compare_filter_choices(&zebra, &na), Ordering::Less);
	}
}
