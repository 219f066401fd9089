use crate::{
	config::EngineConfig,
	controller::{FilterController, FilterCounts},
	error::{Error, Result},
	filter::Filter,
	notify::{FilterEvent, Observers, SubscriptionId},
	range::Interval,
	source::{values_from_records, FilterDescriptor, PileData},
	taxon::TaxonSet,
	units::LengthUnit,
	value::ChosenValue,
	working_area::{WidgetKind, WorkingArea, WorkingAreaState},
};
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// What became of an Apply in the working area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
	Applied,
	/// The candidate already was the chosen value.
	Unchanged,
	/// Rejected by the guard rule: no taxa would remain.
	WouldBeEmpty,
	/// The open widget doesn't take this kind of value.
	WrongWidget,
	NotOpen,
}

/// What the UI talks to: loads a pile's filters, tracks chosen values and drives the working area.
#[derive(Debug)]
pub struct FilterManager {
	config: EngineConfig,
	pile_slug: Option<String>,
	controller: FilterController,
	working_area: WorkingArea,
	observers: Observers,
}

impl Default for FilterManager {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

impl FilterManager {
	#[must_use]
	pub fn new(config: EngineConfig) -> Self {
		Self {
			controller: FilterController::new(Rc::default()).with_memoization(config.memoize_matches),
			config,
			pile_slug: None,
			working_area: WorkingArea::new(),
			observers: Observers::new(),
		}
	}

	#[must_use]
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	#[must_use]
	pub fn pile_slug(&self) -> Option<&str> {
		self.pile_slug.as_deref()
	}

	#[must_use]
	pub fn controller(&self) -> &FilterController {
		&self.controller
	}

	#[must_use]
	pub fn filters(&self) -> &[Filter] {
		self.controller.filters()
	}

	#[must_use]
	pub fn filter(&self, slug: &str) -> Option<&Filter> {
		self.controller.get(slug)
	}

	/// Replaces the current filters with `pile_slug`'s default filters, ordered by their `order`.
	///
	/// If the pile can't be loaded, this is logged and the current filters stay in place; the returned slice is then empty.
	#[instrument(skip(self, data))]
	pub fn load_default_filters(&mut self, pile_slug: &str, data: &dyn PileData) -> &[Filter] {
		match self.build_controller(pile_slug, data) {
			Ok(controller) => {
				self.working_area.dismiss();
				self.controller = controller;
				self.pile_slug = Some(pile_slug.to_owned());
				info!(filters = self.controller.len(), taxa = self.controller.universe().len(), "Loaded default filters.");
				self.observers.emit(&FilterEvent::FiltersLoaded { pile_slug: pile_slug.to_owned() });
				self.controller.filters()
			}
			Err(error) => {
				warn!(%error, "Could not load default filters.");
				&[]
			}
		}
	}

	fn build_controller(&self, pile_slug: &str, data: &dyn PileData) -> Result<FilterController> {
		let missing = || Error::MissingPile(pile_slug.to_owned());
		let info = data.pile_info(pile_slug).ok_or_else(missing)?;
		let universe: Rc<TaxonSet> = Rc::new(data.pile_taxa(pile_slug).ok_or_else(missing)?.into_iter().collect());

		let mut descriptors = info.default_filters;
		descriptors.sort_by_key(|descriptor| descriptor.order);

		let mut controller = FilterController::new(Rc::clone(&universe)).with_memoization(self.config.memoize_matches);
		for descriptor in &descriptors {
			match build_filter(pile_slug, descriptor, &universe, data).and_then(|filter| controller.add_filter(filter)) {
				Ok(()) => (),
				Err(error) => warn!(%error, slug = %descriptor.character_short_name, "Skipping filter."),
			}
		}
		Ok(controller)
	}

	/// Adds a filter beyond the pile's defaults, or returns the existing filter with that slug.
	///
	/// # Errors
	///
	/// [`Error::MissingPile`] if no pile is loaded.
	#[instrument(skip(self, descriptor, data), fields(slug = %descriptor.character_short_name))]
	pub fn add_filter(&mut self, descriptor: &FilterDescriptor, data: &dyn PileData) -> Result<&Filter> {
		let pile_slug = self.pile_slug.clone().ok_or_else(|| Error::MissingPile(String::new()))?;
		let slug = &descriptor.character_short_name;
		if self.controller.get(slug).is_none() {
			let filter = build_filter(&pile_slug, descriptor, self.controller.universe(), data)?;
			self.controller.add_filter(filter)?;
		} else {
			debug!("Filter already present.");
		}
		self.controller.get(slug).ok_or_else(|| Error::UnknownFilter(slug.clone()))
	}

	/// Returns whether a filter was removed. Removing a filter that had a value counts as a change.
	pub fn remove_filter(&mut self, slug: &str) -> bool {
		let removed = match self.controller.remove_filter(slug) {
			Some(removed) => removed,
			None => return false,
		};
		if self.working_area.open_slug() == Some(slug) {
			self.working_area.dismiss();
		}
		if removed.chosen_value().is_some() {
			self.observers.emit(&FilterEvent::ValueChanged { slug: slug.to_owned(), value: None });
		}
		true
	}

	/// Commits `value` for `slug`. Unknown slugs are logged and ignored.
	#[instrument(skip(self))]
	pub fn set_selected_value(&mut self, slug: &str, value: Option<ChosenValue>) {
		match self.controller.set_chosen_value(slug, value.clone()) {
			Ok(true) => self.observers.emit(&FilterEvent::ValueChanged { slug: slug.to_owned(), value }),
			Ok(false) => debug!("Value unchanged."),
			Err(error) => warn!(%error, "Ignoring selection."),
		}
	}

	#[must_use]
	pub fn get_selected_value(&self, slug: &str) -> Option<&ChosenValue> {
		self.controller.get(slug)?.chosen_value()
	}

	pub fn clear_selections(&mut self) {
		for slug in self.controller.clear_selections() {
			self.observers.emit(&FilterEvent::ValueChanged { slug, value: None });
		}
	}

	/// The taxa matching every chosen value.
	#[must_use]
	pub fn results(&self) -> TaxonSet {
		self.controller.compute_all()
	}

	#[must_use]
	pub fn compute(&self, excluding: Option<&str>) -> TaxonSet {
		self.controller.compute(excluding)
	}

	#[must_use]
	pub fn taxa_matching(&self, slug: &str, value: &ChosenValue) -> TaxonSet {
		self.controller.get(slug).map(|filter| filter.taxa_matching(value)).unwrap_or_default()
	}

	#[must_use]
	pub fn allowed_ranges(&self, slug: &str, taxa: &TaxonSet) -> Vec<Interval<f64>> {
		self.controller.get(slug).map(|filter| filter.allowed_ranges(taxa)).unwrap_or_default()
	}

	#[must_use]
	pub fn would_be_empty(&self, slug: &str, candidate: &ChosenValue) -> bool {
		self.controller.would_be_empty(slug, candidate)
	}

	#[must_use]
	pub fn filter_counts(&self, slug: &str) -> Option<FilterCounts> {
		self.controller.choice_counts(slug)
	}

	/// Preview counts for every filter, in display order.
	#[must_use]
	pub fn match_counts(&self) -> Vec<FilterCounts> {
		self.controller.filters().iter().filter_map(|filter| self.controller.choice_counts(filter.slug())).collect()
	}

	pub fn subscribe(&mut self, observer: impl FnMut(&FilterEvent) + 'static) -> SubscriptionId {
		self.observers.subscribe(observer)
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		self.observers.unsubscribe(id)
	}

	#[must_use]
	pub fn working_area(&self) -> &WorkingAreaState {
		self.working_area.state()
	}

	/// Opens the working area on `slug`, dismissing whatever was open. Unknown slugs are logged and leave it untouched.
	pub fn open_filter(&mut self, slug: &str) -> Option<WidgetKind> {
		let widget = match self.controller.get(slug) {
			Some(filter) => filter.widget_kind(),
			None => {
				warn!(%slug, "Cannot open unknown filter.");
				return None;
			}
		};
		self.working_area.open(slug, widget);
		Some(widget)
	}

	pub fn dismiss(&mut self) -> Option<String> {
		self.working_area.dismiss()
	}

	/// Commits `candidate` for the open filter unless no taxa would remain. Clearing the value is always allowed.
	#[instrument(skip(self))]
	pub fn apply(&mut self, candidate: Option<ChosenValue>) -> ApplyOutcome {
		let slug = match self.working_area.open_slug() {
			Some(slug) => slug.to_owned(),
			None => return ApplyOutcome::NotOpen,
		};
		if let Some(candidate) = &candidate {
			if self.controller.would_be_empty(&slug, candidate) {
				debug!("Guard rejected candidate.");
				return ApplyOutcome::WouldBeEmpty;
			}
		}
		if self.get_selected_value(&slug) == candidate.as_ref() {
			return ApplyOutcome::Unchanged;
		}
		self.set_selected_value(&slug, candidate);
		ApplyOutcome::Applied
	}

	/// Applies a length typed in `unit` to the open length filter.
	pub fn apply_length(&mut self, value: f64, unit: LengthUnit) -> ApplyOutcome {
		let widget = match self.working_area.state() {
			WorkingAreaState::Closed => return ApplyOutcome::NotOpen,
			&WorkingAreaState::Open { widget, .. } => widget,
		};
		if widget == WidgetKind::Length {
			self.apply(Some(ChosenValue::Number(unit.to_mm(value))))
		} else {
			ApplyOutcome::WrongWidget
		}
	}
}

fn build_filter(pile_slug: &str, descriptor: &FilterDescriptor, universe: &Rc<TaxonSet>, data: &dyn PileData) -> Result<Filter> {
	let slug = &descriptor.character_short_name;
	let records = data.character_values(pile_slug, slug).unwrap_or_else(|| {
		warn!(%slug, "No values for character; the filter will be empty.");
		Vec::new()
	});
	let mut filter = Filter::from_descriptor(descriptor);
	filter.install_values(Rc::clone(universe), values_from_records(slug, descriptor.value_type, &records))?;
	Ok(filter)
}
