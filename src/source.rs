//! The data the engine consumes from the pile, taxon and character endpoints.
//!
//! Fetching is someone else's job. By the time anything here runs, the responses are a completed,
//! read-only snapshot behind [`PileData`].

use crate::{
	error::{Error, Result},
	taxon::{character_records, Taxon, TaxonId, TaxonSet},
	units::LengthUnit,
	value::{CharacterValue, FilterValues, LengthRange, ValueType},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// The pile-info record's filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileInfo {
	#[serde(default)]
	pub slug: String,
	pub default_filters: Vec<FilterDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
	pub character_short_name: String,
	pub character_friendly_name: String,
	#[serde(default)]
	pub order: i32,
	pub value_type: ValueType,
	#[serde(default)]
	pub unit: Option<String>,
	#[serde(default)]
	pub question: Option<String>,
	#[serde(default)]
	pub hint: Option<String>,
}

impl FilterDescriptor {
	pub fn new(short_name: impl Into<String>, friendly_name: impl Into<String>, value_type: ValueType) -> Self {
		Self {
			character_short_name: short_name.into(),
			character_friendly_name: friendly_name.into(),
			order: 0,
			value_type,
			unit: None,
			question: None,
			hint: None,
		}
	}

	#[must_use]
	pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
		self.unit = Some(unit.into());
		self
	}

	#[must_use]
	pub fn with_order(mut self, order: i32) -> Self {
		self.order = order;
		self
	}

	/// The unit of a numeric character, if it is a length.
	#[must_use]
	pub fn length_unit(&self) -> Option<LengthUnit> {
		match (self.value_type, &self.unit) {
			(ValueType::Length, Some(unit)) => unit.parse().ok(),
			_ => None,
		}
	}

	#[must_use]
	pub fn is_length(&self) -> bool {
		self.length_unit().is_some()
	}
}

/// One entry of a character-value record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterValueRecord {
	#[serde(default)]
	pub value_str: Option<String>,
	#[serde(default)]
	pub friendly_text: Option<String>,
	#[serde(default)]
	pub value_min: Option<f64>,
	#[serde(default)]
	pub value_max: Option<f64>,
	#[serde(default)]
	pub taxa: Vec<TaxonId>,
}

impl CharacterValueRecord {
	pub fn text(value_str: impl Into<String>, taxa: &[TaxonId]) -> Self {
		Self {
			value_str: Some(value_str.into()),
			friendly_text: None,
			value_min: None,
			value_max: None,
			taxa: taxa.to_vec(),
		}
	}

	#[must_use]
	pub fn range(min: f64, max: f64, taxa: &[TaxonId]) -> Self {
		Self {
			value_str: None,
			friendly_text: None,
			value_min: Some(min),
			value_max: Some(max),
			taxa: taxa.to_vec(),
		}
	}

	#[must_use]
	pub fn with_friendly_text(mut self, friendly_text: impl Into<String>) -> Self {
		self.friendly_text = Some(friendly_text.into());
		self
	}

	fn taxon_set(&self) -> TaxonSet {
		self.taxa.iter().copied().collect()
	}

	fn to_character_value(&self, slug: &str) -> Result<CharacterValue> {
		let choice = self.value_str.as_ref().ok_or_else(|| Error::InvalidRecord {
			slug: slug.to_owned(),
			reason: "text record without value_str".to_owned(),
		})?;
		let friendly_text = self.friendly_text.as_ref().unwrap_or(choice);
		Ok(CharacterValue::new(choice.as_str(), friendly_text.as_str(), self.taxon_set()))
	}

	/// A single bound makes a degenerate range; reversed bounds are swapped.
	fn to_length_range(&self, slug: &str) -> Result<LengthRange> {
		let (min, max) = match (self.value_min, self.value_max) {
			(Some(min), Some(max)) => (min, max),
			(Some(bound), None) | (None, Some(bound)) => (bound, bound),
			(None, None) => {
				return Err(Error::InvalidRecord {
					slug: slug.to_owned(),
					reason: "numeric record without value_min or value_max".to_owned(),
				})
			}
		};
		if min.is_nan() || max.is_nan() {
			return Err(Error::InvalidRecord {
				slug: slug.to_owned(),
				reason: "numeric record with NaN bound".to_owned(),
			});
		}
		Ok(if min <= max {
			LengthRange::new(min, max, self.taxon_set())
		} else {
			LengthRange::new(max, min, self.taxon_set())
		})
	}
}

/// Maps raw records to filter values of `value_type`, logging and skipping the ones that don't fit.
pub fn values_from_records(slug: &str, value_type: ValueType, records: &[CharacterValueRecord]) -> FilterValues {
	fn keep<T>(result: Result<T>) -> Option<T> {
		result.map_err(|error| warn!(%error, "Skipping value record.")).ok()
	}

	match value_type {
		ValueType::Text => FilterValues::Text(records.iter().filter_map(|record| keep(record.to_character_value(slug))).collect()),
		ValueType::Length => FilterValues::Length(records.iter().filter_map(|record| keep(record.to_length_range(slug))).collect()),
	}
}

/// Read access to the already-fetched data of each pile.
pub trait PileData {
	fn pile_info(&self, pile_slug: &str) -> Option<PileInfo>;
	fn pile_taxa(&self, pile_slug: &str) -> Option<Vec<TaxonId>>;
	fn character_values(&self, pile_slug: &str, character: &str) -> Option<Vec<CharacterValueRecord>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PileRecord {
	pub default_filters: Vec<FilterDescriptor>,
	pub taxa: Vec<TaxonId>,
	#[serde(default)]
	pub characters: BTreeMap<String, Vec<CharacterValueRecord>>,
}

/// In-memory [`PileData`], keyed by pile slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PileSnapshot {
	piles: BTreeMap<String, PileRecord>,
}

impl PileSnapshot {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn insert(&mut self, pile_slug: impl Into<String>, record: PileRecord) {
		self.piles.insert(pile_slug.into(), record);
	}

	/// Adds a pile whose character values are derived from each taxon's recorded attributes.
	pub fn insert_taxa(&mut self, pile_slug: impl Into<String>, default_filters: Vec<FilterDescriptor>, taxa: &[Taxon]) {
		let mut characters = BTreeMap::new();
		for taxon in taxa {
			for character in taxon.attributes.keys() {
				if !characters.contains_key(character) {
					characters.insert(character.clone(), character_records(taxa, character));
				}
			}
		}
		self.insert(
			pile_slug,
			PileRecord {
				default_filters,
				taxa: taxa.iter().map(|taxon| taxon.id).collect(),
				characters,
			},
		);
	}

	pub fn pile_slugs(&self) -> impl Iterator<Item = &str> {
		self.piles.keys().map(String::as_str)
	}
}

impl PileData for PileSnapshot {
	fn pile_info(&self, pile_slug: &str) -> Option<PileInfo> {
		self.piles.get(pile_slug).map(|record| PileInfo {
			slug: pile_slug.to_owned(),
			default_filters: record.default_filters.clone(),
		})
	}

	fn pile_taxa(&self, pile_slug: &str) -> Option<Vec<TaxonId>> {
		self.piles.get(pile_slug).map(|record| record.taxa.clone())
	}

	fn character_values(&self, pile_slug: &str, character: &str) -> Option<Vec<CharacterValueRecord>> {
		self.piles.get(pile_slug)?.characters.get(character).cloned()
	}
}
