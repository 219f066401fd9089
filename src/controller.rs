use crate::{
	error::{Error, Result},
	filter::Filter,
	taxon::TaxonSet,
	value::{ChosenValue, FilterValues, ValueKey},
};
use core::{cell::RefCell, cmp::Ordering};
use hashbrown::HashMap;
use serde::Serialize;
use std::rc::Rc;
use tracing::{instrument, trace};

/// How many taxa a candidate value would leave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
	pub value: ChosenValue,
	pub friendly_text: String,
	pub count: usize,
}

/// Per-value preview counts of one filter, computed against every other filter's chosen value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCounts {
	pub slug: String,
	/// Taxa left by the other filters.
	pub base: usize,
	pub values: Vec<ValueCount>,
	/// Taxa of `base` without any value for this character.
	pub dont_know: usize,
}

/// The live filters of one pile, in display order.
#[derive(Debug)]
pub struct FilterController {
	universe: Rc<TaxonSet>,
	filters: Vec<Filter>,
	index: HashMap<String, usize>,
	memoize: bool,
	matches: RefCell<HashMap<(String, ValueKey), Rc<TaxonSet>>>,
}

impl FilterController {
	#[must_use]
	pub fn new(universe: Rc<TaxonSet>) -> Self {
		Self {
			universe,
			filters: Vec::new(),
			index: HashMap::new(),
			memoize: true,
			matches: RefCell::default(),
		}
	}

	#[must_use]
	pub fn with_memoization(mut self, memoize: bool) -> Self {
		self.memoize = memoize;
		self
	}

	#[must_use]
	pub fn universe(&self) -> &Rc<TaxonSet> {
		&self.universe
	}

	/// Appends `filter`, or replaces the filter with the same slug in place.
	///
	/// # Errors
	///
	/// [`Error::ForeignUniverse`] if `filter` was installed against a different set of taxa.
	pub fn add_filter(&mut self, filter: Filter) -> Result<()> {
		if !Rc::ptr_eq(filter.pile_taxa(), &self.universe) && **filter.pile_taxa() != *self.universe {
			return Err(Error::ForeignUniverse(filter.slug().to_owned()));
		}
		self.forget_matches(filter.slug());
		match self.index.get(filter.slug()) {
			Some(&i) => self.filters[i] = filter,
			None => {
				self.index.insert(filter.slug().to_owned(), self.filters.len());
				self.filters.push(filter);
			}
		}
		Ok(())
	}

	pub fn remove_filter(&mut self, slug: &str) -> Option<Filter> {
		let i = self.index.remove(slug)?;
		let removed = self.filters.remove(i);
		for position in self.index.values_mut() {
			if *position > i {
				*position -= 1;
			}
		}
		self.forget_matches(slug);
		Some(removed)
	}

	fn forget_matches(&mut self, slug: &str) {
		self.matches.get_mut().retain(|(cached, _), _| cached != slug);
	}

	#[must_use]
	pub fn get(&self, slug: &str) -> Option<&Filter> {
		self.index.get(slug).map(|&i| &self.filters[i])
	}

	pub fn filters(&self) -> &[Filter] {
		&self.filters
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.filters.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.filters.is_empty()
	}

	/// Returns whether the value changed.
	///
	/// # Errors
	///
	/// [`Error::UnknownFilter`] if no filter has this slug.
	pub fn set_chosen_value(&mut self, slug: &str, value: Option<ChosenValue>) -> Result<bool> {
		let &i = self.index.get(slug).ok_or_else(|| Error::UnknownFilter(slug.to_owned()))?;
		let changed = self.filters[i].set_chosen_value(value);
		if changed {
			self.forget_matches(slug);
		}
		Ok(changed)
	}

	/// [`Filter::taxa_matching`]. When memoization is enabled, only each filter's chosen value is cached,
	/// so the cache holds at most one entry per filter.
	#[must_use]
	pub fn taxa_matching(&self, filter: &Filter, value: &ChosenValue) -> Rc<TaxonSet> {
		if !self.memoize || filter.chosen_value() != Some(value) {
			return Rc::new(filter.taxa_matching(value));
		}
		let key = (filter.slug().to_owned(), value.cache_key());
		if let Some(hit) = self.matches.borrow().get(&key) {
			return Rc::clone(hit);
		}
		let computed = Rc::new(filter.taxa_matching(value));
		self.matches.borrow_mut().insert(key, Rc::clone(&computed));
		computed
	}

	/// The taxa satisfying every chosen value except that of the filter named `excluding`.
	///
	/// Reads state only, so previews of a filter's values never disturb any chosen value.
	#[must_use]
	#[instrument(skip(self))]
	pub fn compute(&self, excluding: Option<&str>) -> TaxonSet {
		let mut survivors = (*self.universe).clone();
		for filter in &self.filters {
			if survivors.is_empty() {
				break;
			}
			if Some(filter.slug()) == excluding {
				continue;
			}
			if let Some(value) = filter.chosen_value() {
				let matching = self.taxa_matching(filter, value);
				survivors.retain(|taxon| matching.contains(taxon));
			}
		}
		trace!(survivors = survivors.len(), "Computed survivors.");
		survivors
	}

	#[must_use]
	pub fn compute_all(&self) -> TaxonSet {
		self.compute(None)
	}

	/// Whether choosing `candidate` for `slug` would leave no taxa. Unknown filters match nothing.
	#[must_use]
	pub fn would_be_empty(&self, slug: &str, candidate: &ChosenValue) -> bool {
		match self.get(slug) {
			Some(filter) => self.taxa_matching(filter, candidate).is_disjoint(&self.compute(Some(slug))),
			None => true,
		}
	}

	/// Preview counts for each installed value of `slug`.
	///
	/// Numeric filters offer each distinct range minimum as a candidate, in ascending order.
	#[must_use]
	pub fn choice_counts(&self, slug: &str) -> Option<FilterCounts> {
		let filter = self.get(slug)?;
		let base = self.compute(Some(slug));
		let values = match filter.values() {
			FilterValues::Text(_) => filter
				.sorted_values()
				.into_iter()
				.map(|value| {
					let candidate = ChosenValue::Choice(value.choice.clone());
					ValueCount {
						count: self.taxa_matching(filter, &candidate).intersection(&base).count(),
						value: candidate,
						friendly_text: value.friendly_text.clone(),
					}
				})
				.collect(),
			FilterValues::Length(ranges) => {
				let mut minima: Vec<f64> = ranges.iter().map(|range| range.min).collect();
				minima.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
				minima.dedup();
				minima
					.into_iter()
					.map(|min| {
						let candidate = ChosenValue::Number(min);
						ValueCount {
							count: self.taxa_matching(filter, &candidate).intersection(&base).count(),
							friendly_text: candidate.to_string(),
							value: candidate,
						}
					})
					.collect()
			}
		};
		Some(FilterCounts {
			slug: slug.to_owned(),
			base: base.len(),
			dont_know: filter.valueless_taxa().intersection(&base).count(),
			values,
		})
	}

	/// Unsets every chosen value and returns the slugs whose value changed.
	pub fn clear_selections(&mut self) -> Vec<String> {
		self.matches.get_mut().clear();
		self.filters
			.iter_mut()
			.filter_map(|filter| if filter.set_chosen_value(None) { Some(filter.slug().to_owned()) } else { None })
			.collect()
	}
}
