//! Taxon identifiers and the per-taxon attribute data the filters are built from.

use crate::source::CharacterValueRecord;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type TaxonId = u32;

/// Unordered set of taxa. Every survivor set, pile universe and per-value match set is one of these.
pub type TaxonSet = HashSet<TaxonId>;

/// Collects `ids` into a [`TaxonSet`].
pub fn taxon_set<'a>(ids: impl IntoIterator<Item = &'a TaxonId>) -> TaxonSet {
	ids.into_iter().copied().collect()
}

/// Returns the members of `set` in ascending order, which is how they are reported across the JS boundary.
#[must_use]
pub fn sorted_ids(set: &TaxonSet) -> Vec<TaxonId> {
	let mut ids: Vec<_> = set.iter().copied().collect();
	ids.sort_unstable();
	ids
}

/// A value recorded for one character of one taxon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxonValue {
	Text(String),
	Range { min: f64, max: f64 },
}

/// One species of the identification key, as delivered by the taxon data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxon {
	pub id: TaxonId,
	#[serde(default)]
	pub scientific_name: String,
	/// Character short name to the values recorded for it.
	#[serde(default)]
	pub attributes: BTreeMap<String, Vec<TaxonValue>>,
}

impl Taxon {
	#[must_use]
	pub fn new(id: TaxonId, scientific_name: impl Into<String>) -> Self {
		Self {
			id,
			scientific_name: scientific_name.into(),
			attributes: Default::default(),
		}
	}

	#[must_use]
	pub fn with_value(mut self, character: impl Into<String>, value: TaxonValue) -> Self {
		self.attributes.entry(character.into()).or_default().push(value);
		self
	}
}

/// Inverts taxon attributes into one record per distinct value of `character`, listing the taxa that show it.
///
/// Records come out in order of first appearance so that the result is stable for a given taxon list.
#[must_use]
pub fn character_records(taxa: &[Taxon], character: &str) -> Vec<CharacterValueRecord> {
	let mut records: Vec<CharacterValueRecord> = Vec::new();
	let mut text_index: HashMap<String, usize> = HashMap::new();
	let mut range_index: HashMap<(u64, u64), usize> = HashMap::new();

	for taxon in taxa {
		for value in taxon.attributes.get(character).into_iter().flatten() {
			let slot = match value {
				TaxonValue::Text(text) => *text_index.entry(text.clone()).or_insert_with(|| {
					records.push(CharacterValueRecord::text(text.clone(), &[]));
					records.len() - 1
				}),
				&TaxonValue::Range { min, max } => *range_index.entry((min.to_bits(), max.to_bits())).or_insert_with(|| {
					records.push(CharacterValueRecord::range(min, max, &[]));
					records.len() - 1
				}),
			};
			let record = &mut records[slot];
			if !record.taxa.contains(&taxon.id) {
				record.taxa.push(taxon.id);
			}
		}
	}
	records
}
