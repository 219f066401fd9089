use crate::{
	error::{Error, Result},
	matcher::{compare_filter_choices, matches_choice, matches_length},
	range::{self, Interval},
	source::FilterDescriptor,
	taxon::TaxonSet,
	units::LengthUnit,
	value::{CharacterValue, ChosenValue, FilterValues, LengthRange, ValueType},
	working_area::{select_widget, WidgetKind},
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// One character restricted to one pile.
///
/// Values are installed once per pile via [`Filter::install_values`]. Afterwards only the chosen value changes.
#[derive(Debug, Clone)]
pub struct Filter {
	slug: String,
	friendly_name: String,
	value_type: ValueType,
	unit: Option<LengthUnit>,
	order: i32,
	question: Option<String>,
	hint: Option<String>,
	values: FilterValues,
	choicemap: HashMap<String, usize>,
	valueless_taxa: TaxonSet,
	pile_taxa: Rc<TaxonSet>,
	chosen_value: Option<ChosenValue>,
}

impl Filter {
	pub fn new(slug: impl Into<String>, friendly_name: impl Into<String>, value_type: ValueType) -> Self {
		Self {
			slug: slug.into(),
			friendly_name: friendly_name.into(),
			value_type,
			unit: None,
			order: 0,
			question: None,
			hint: None,
			values: FilterValues::empty(value_type),
			choicemap: HashMap::new(),
			valueless_taxa: TaxonSet::new(),
			pile_taxa: Rc::default(),
			chosen_value: None,
		}
	}

	#[must_use]
	pub fn from_descriptor(descriptor: &FilterDescriptor) -> Self {
		let mut filter = Self::new(&*descriptor.character_short_name, &*descriptor.character_friendly_name, descriptor.value_type);
		filter.unit = descriptor.length_unit();
		filter.order = descriptor.order;
		filter.question = descriptor.question.clone();
		filter.hint = descriptor.hint.clone();
		filter
	}

	/// Marks a numeric filter as a length recorded in millimetres.
	#[must_use]
	pub fn with_unit(mut self, unit: LengthUnit) -> Self {
		if self.value_type == ValueType::Length {
			self.unit = Some(unit);
		}
		self
	}

	/// Replaces the filter's values with those of `raw_values` that have at least one taxon in `pile_taxa`,
	/// and clears the chosen value.
	///
	/// Text values sharing a `choice` are merged into the first one.
	///
	/// # Errors
	///
	/// [`Error::ValueTypeMismatch`] if `raw_values` is not of this filter's [`ValueType`]. The filter is left untouched.
	#[instrument(skip(self, pile_taxa, raw_values), fields(slug = %self.slug, raw = raw_values.len()))]
	pub fn install_values(&mut self, pile_taxa: Rc<TaxonSet>, raw_values: FilterValues) -> Result<()> {
		if raw_values.value_type() != self.value_type {
			return Err(Error::ValueTypeMismatch {
				slug: self.slug.clone(),
				expected: self.value_type,
			});
		}

		let in_pile = |taxa: &TaxonSet| !taxa.is_disjoint(&pile_taxa);
		self.choicemap.clear();
		self.values = match raw_values {
			FilterValues::Text(raw) => {
				let mut values: Vec<CharacterValue> = Vec::with_capacity(raw.len());
				for value in raw.into_iter().filter(|value| in_pile(&value.taxa)) {
					match values.iter_mut().find(|existing| matches_choice(existing, &value.choice)) {
						Some(existing) => {
							debug!(choice = %value.choice, "Merging duplicate choice.");
							existing.taxa.extend(value.taxa);
						}
						None => values.push(value),
					}
				}
				self.choicemap = values.iter().enumerate().map(|(i, value)| (value.choice.clone(), i)).collect();
				FilterValues::Text(values)
			}
			FilterValues::Length(raw) => FilterValues::Length(raw.into_iter().filter(|range| in_pile(&range.taxa)).collect()),
		};

		let mut valueless = (*pile_taxa).clone();
		for taxa in self.values.taxa() {
			valueless.retain(|taxon| !taxa.contains(taxon));
		}
		self.valueless_taxa = valueless;
		self.pile_taxa = pile_taxa;
		self.chosen_value = None;
		trace!(installed = self.values.len(), valueless = self.valueless_taxa.len(), "Installed values.");
		Ok(())
	}

	/// The in-pile taxa that `value` selects. Never contains taxa outside the pile.
	#[must_use]
	pub fn taxa_matching(&self, value: &ChosenValue) -> TaxonSet {
		match (&self.values, value) {
			(FilterValues::Text(values), ChosenValue::Choice(choice)) => match self.choicemap.get(choice) {
				Some(&i) => self.restrict_to_pile(&values[i].taxa),
				None => TaxonSet::new(),
			},
			(FilterValues::Length(ranges), &ChosenValue::Number(number)) => self.taxa_in_ranges(ranges, number),
			(FilterValues::Length(ranges), ChosenValue::Choice(text)) => match text.trim().parse::<f64>() {
				Ok(number) => self.taxa_in_ranges(ranges, number),
				Err(_) => TaxonSet::new(),
			},
			(FilterValues::Text(_), ChosenValue::Number(_)) => {
				debug!(slug = %self.slug, "Numeric value for a text filter matches nothing.");
				TaxonSet::new()
			}
		}
	}

	fn taxa_in_ranges(&self, ranges: &[LengthRange], number: f64) -> TaxonSet {
		ranges
			.iter()
			.filter(|range| matches_length(range, number))
			.flat_map(|range| range.taxa.iter().copied())
			.filter(|taxon| self.pile_taxa.contains(taxon))
			.collect()
	}

	fn restrict_to_pile(&self, taxa: &TaxonSet) -> TaxonSet {
		taxa.intersection(&self.pile_taxa).copied().collect()
	}

	/// The merged ranges contributed by the in-pile taxa of `candidate_taxa`. Empty for text filters.
	#[must_use]
	pub fn allowed_ranges(&self, candidate_taxa: &TaxonSet) -> Vec<Interval<f64>> {
		match &self.values {
			FilterValues::Text(_) => Vec::new(),
			FilterValues::Length(ranges) => range::merge(
				ranges
					.iter()
					.filter(|range| range.taxa.iter().any(|taxon| candidate_taxa.contains(taxon) && self.pile_taxa.contains(taxon)))
					.map(|range| Interval::new(range.min, range.max)),
			),
		}
	}

	/// Text values in display order.
	#[must_use]
	pub fn sorted_values(&self) -> Vec<&CharacterValue> {
		let mut sorted: Vec<_> = self.choices().iter().collect();
		sorted.sort_by(|a, b| compare_filter_choices(a, b));
		sorted
	}

	/// Returns whether the value changed.
	pub(crate) fn set_chosen_value(&mut self, value: Option<ChosenValue>) -> bool {
		if self.chosen_value == value {
			false
		} else {
			self.chosen_value = value;
			true
		}
	}

	#[must_use]
	pub fn slug(&self) -> &str {
		&self.slug
	}

	#[must_use]
	pub fn friendly_name(&self) -> &str {
		&self.friendly_name
	}

	#[must_use]
	pub fn value_type(&self) -> ValueType {
		self.value_type
	}

	#[must_use]
	pub fn unit(&self) -> Option<LengthUnit> {
		self.unit
	}

	#[must_use]
	pub fn is_length(&self) -> bool {
		self.unit.is_some()
	}

	#[must_use]
	pub fn widget_kind(&self) -> WidgetKind {
		select_widget(self.value_type, self.is_length())
	}

	#[must_use]
	pub fn order(&self) -> i32 {
		self.order
	}

	#[must_use]
	pub fn question(&self) -> Option<&str> {
		self.question.as_deref()
	}

	#[must_use]
	pub fn hint(&self) -> Option<&str> {
		self.hint.as_deref()
	}

	#[must_use]
	pub fn values(&self) -> &FilterValues {
		&self.values
	}

	/// Installed text values in installation order; empty for numeric filters.
	#[must_use]
	pub fn choices(&self) -> &[CharacterValue] {
		match &self.values {
			FilterValues::Text(values) => values,
			FilterValues::Length(_) => &[],
		}
	}

	/// Installed ranges; empty for text filters.
	#[must_use]
	pub fn ranges(&self) -> &[LengthRange] {
		match &self.values {
			FilterValues::Length(ranges) => ranges,
			FilterValues::Text(_) => &[],
		}
	}

	#[must_use]
	pub fn choice(&self, choice: &str) -> Option<&CharacterValue> {
		self.choicemap.get(choice).map(|&i| &self.choices()[i])
	}

	pub fn choicemap_keys(&self) -> impl Iterator<Item = &str> {
		self.choicemap.keys().map(String::as_str)
	}

	/// In-pile taxa with no value for this character, offered as "don't know".
	#[must_use]
	pub fn valueless_taxa(&self) -> &TaxonSet {
		&self.valueless_taxa
	}

	#[must_use]
	pub fn pile_taxa(&self) -> &Rc<TaxonSet> {
		&self.pile_taxa
	}

	#[must_use]
	pub fn chosen_value(&self) -> Option<&ChosenValue> {
		self.chosen_value.as_ref()
	}
}
