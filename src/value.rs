use crate::taxon::TaxonSet;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};

/// How a character's values are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
	/// Discrete, enumerated choices.
	Text,
	/// Numeric ranges in millimetres (or in a plain count for unit-less characters).
	Length,
}

impl Display for ValueType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Text => "TEXT",
			Self::Length => "LENGTH",
		})
	}
}

/// One legal value of a [`ValueType::Text`] filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterValue {
	pub choice: String,
	pub friendly_text: String,
	pub taxa: TaxonSet,
}

impl CharacterValue {
	pub fn new(choice: impl Into<String>, friendly_text: impl Into<String>, taxa: TaxonSet) -> Self {
		Self {
			choice: choice.into(),
			friendly_text: friendly_text.into(),
			taxa,
		}
	}
}

/// A closed range contributed by the taxa in `taxa`, in the base unit.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthRange {
	pub min: f64,
	pub max: f64,
	pub taxa: TaxonSet,
}

impl LengthRange {
	#[must_use]
	pub fn new(min: f64, max: f64, taxa: TaxonSet) -> Self {
		Self { min, max, taxa }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValues {
	Text(Vec<CharacterValue>),
	Length(Vec<LengthRange>),
}

impl FilterValues {
	#[must_use]
	pub fn empty(value_type: ValueType) -> Self {
		match value_type {
			ValueType::Text => Self::Text(Vec::new()),
			ValueType::Length => Self::Length(Vec::new()),
		}
	}

	#[must_use]
	pub fn value_type(&self) -> ValueType {
		match self {
			Self::Text(_) => ValueType::Text,
			Self::Length(_) => ValueType::Length,
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		match self {
			Self::Text(values) => values.len(),
			Self::Length(ranges) => ranges.len(),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The taxa of each value, in value order.
	pub fn taxa(&self) -> Box<dyn Iterator<Item = &TaxonSet> + '_> {
		match self {
			Self::Text(values) => Box::new(values.iter().map(|v| &v.taxa)),
			Self::Length(ranges) => Box::new(ranges.iter().map(|r| &r.taxa)),
		}
	}
}

/// The value a user committed for a filter. Absence (`None` wherever this is optional) means "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChosenValue {
	Number(f64),
	Choice(String),
}

impl ChosenValue {
	pub(crate) fn cache_key(&self) -> ValueKey {
		match self {
			Self::Choice(choice) => ValueKey::Choice(choice.clone()),
			Self::Number(number) => ValueKey::Number(number.to_bits()),
		}
	}
}

impl From<&str> for ChosenValue {
	fn from(choice: &str) -> Self {
		Self::Choice(choice.to_owned())
	}
}

impl From<String> for ChosenValue {
	fn from(choice: String) -> Self {
		Self::Choice(choice)
	}
}

impl From<f64> for ChosenValue {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}

impl Display for ChosenValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Choice(choice) => f.write_str(choice),
			Self::Number(number) => write!(f, "{}", number),
		}
	}
}

/// Hashable stand-in for a [`ChosenValue`]; numbers are keyed by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
	Choice(String),
	Number(u64),
}
