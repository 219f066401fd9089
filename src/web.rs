//! The JavaScript face of the engine, as used by the Simple Key results page.
//!
//! Values cross the boundary through `serde-wasm-bindgen`. Taxon sets come out as ascending `Uint32Array`s.
//! Errors are thrown as strings.
//!
//! Every method borrows the manager immutably, and filter events are delivered only after the change that caused
//! them has released its state. Listeners may therefore query or change the manager from inside their handler.

use crate::{
	config::EngineConfig,
	filter::Filter,
	manager::FilterManager,
	notify::FilterEvent,
	range::Interval,
	source::PileSnapshot,
	taxon::{sorted_ids, TaxonId, TaxonSet},
	units::LengthUnit,
	value::{ChosenValue, ValueType},
	working_area::WidgetKind,
};
use core::{
	cell::{Cell, RefCell},
	fmt::Display,
};
use js_sys::Function;
use serde::{de::DeserializeOwned, Serialize};
use serde_wasm_bindgen::Serializer;
use std::{collections::VecDeque, rc::Rc};
use tracing::{error, trace};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use web_sys::{CustomEvent, CustomEventInit, EventTarget};

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
	value.serialize(&Serializer::json_compatible()).map_err(Into::into)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
	serde_wasm_bindgen::from_value(value).map_err(Into::into)
}

fn js_error(error: impl Display) -> JsValue {
	JsValue::from_str(&error.to_string())
}

fn optional_value(value: JsValue) -> Result<Option<ChosenValue>, JsValue> {
	if value.is_null() || value.is_undefined() {
		Ok(None)
	} else {
		from_js(value).map(Some)
	}
}

#[derive(Serialize)]
struct FilterSummary<'a> {
	slug: &'a str,
	friendly_name: &'a str,
	value_type: ValueType,
	widget: WidgetKind,
	unit: Option<LengthUnit>,
	question: Option<&'a str>,
	hint: Option<&'a str>,
	value_count: usize,
	valueless_count: usize,
}

impl<'a> From<&'a Filter> for FilterSummary<'a> {
	fn from(filter: &'a Filter) -> Self {
		Self {
			slug: filter.slug(),
			friendly_name: filter.friendly_name(),
			value_type: filter.value_type(),
			widget: filter.widget_kind(),
			unit: filter.unit(),
			question: filter.question(),
			hint: filter.hint(),
			value_count: filter.values().len(),
			valueless_count: filter.valueless_taxa().len(),
		}
	}
}

fn dispatch(target: &EventTarget, event_type: &str, detail: &JsValue) {
	let init = CustomEventInit::new();
	init.set_detail(detail);
	match CustomEvent::new_with_event_init_dict(event_type, &init) {
		Ok(custom_event) => {
			if let Err(error) = target.dispatch_event(&custom_event) {
				error!(?error, "Dispatching filter event failed.");
			}
		}
		Err(error) => error!(?error, "Could not create filter event."),
	}
}

/// Owns the fetched pile data and the filter state of one results page.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WebFilterManager {
	manager: RefCell<FilterManager>,
	data: RefCell<PileSnapshot>,
	event_type: String,
	event_target: RefCell<Option<EventTarget>>,
	outbox: Rc<RefCell<VecDeque<FilterEvent>>>,
	subscribers: RefCell<Vec<(u32, Function)>>,
	next_subscriber: Cell<u32>,
}

impl WebFilterManager {
	/// Runs `change` against the manager, then hands the events it queued to the DOM and to subscribers.
	fn mutate<T>(&self, change: impl FnOnce(&mut FilterManager) -> T) -> T {
		let result = change(&mut *self.manager.borrow_mut());
		self.deliver();
		result
	}

	fn deliver(&self) {
		loop {
			let event = self.outbox.borrow_mut().pop_front();
			let event = match event {
				Some(event) => event,
				None => break,
			};
			let detail = match to_js(&event) {
				Ok(detail) => detail,
				Err(error) => {
					error!(?error, "Could not serialise filter event.");
					continue;
				}
			};

			let target = self.event_target.borrow().clone();
			if let Some(target) = target {
				dispatch(&target, &self.event_type, &detail);
			}
			let subscribers: Vec<Function> = self.subscribers.borrow().iter().map(|(_, callback)| callback.clone()).collect();
			for callback in subscribers {
				if let Err(error) = callback.call1(&JsValue::NULL, &detail) {
					error!(?error, "Filter event subscriber threw.");
				}
			}
		}
	}
}

#[wasm_bindgen]
impl WebFilterManager {
	/// `config` may be `undefined` for the defaults.
	#[wasm_bindgen(constructor)]
	pub fn new(config: JsValue) -> Result<WebFilterManager, JsValue> {
		let config: EngineConfig = if config.is_undefined() || config.is_null() { EngineConfig::default() } else { from_js(config)? };
		config.validate().map_err(js_error)?;

		let outbox = Rc::new(RefCell::new(VecDeque::new()));
		let event_type = config.change_event.clone();
		let mut manager = FilterManager::new(config);
		manager.subscribe({
			let outbox = Rc::clone(&outbox);
			move |event: &FilterEvent| outbox.borrow_mut().push_back(event.clone())
		});

		Ok(Self {
			manager: RefCell::new(manager),
			data: RefCell::new(PileSnapshot::new()),
			event_type,
			event_target: RefCell::new(None),
			outbox,
			subscribers: RefCell::new(Vec::new()),
			next_subscriber: Cell::new(0),
		})
	}

	/// DOM node that receives a `CustomEvent` per filter event, or `None` to stop dispatching.
	#[wasm_bindgen(js_name = setEventTarget)]
	pub fn set_event_target(&self, target: Option<EventTarget>) {
		*self.event_target.borrow_mut() = target;
	}

	#[wasm_bindgen(js_name = loadSnapshot)]
	pub fn load_snapshot(&self, snapshot: JsValue) -> Result<(), JsValue> {
		let snapshot: PileSnapshot = from_js(snapshot)?;
		trace!(piles = snapshot.pile_slugs().count(), "Loaded pile snapshot.");
		*self.data.borrow_mut() = snapshot;
		Ok(())
	}

	#[wasm_bindgen(js_name = loadSnapshotJson)]
	pub fn load_snapshot_json(&self, json: &str) -> Result<(), JsValue> {
		*self.data.borrow_mut() = PileSnapshot::from_json(json).map_err(js_error)?;
		Ok(())
	}

	/// Returns summaries of the loaded filters.
	#[wasm_bindgen(js_name = loadDefaultFilters)]
	pub fn load_default_filters(&self, pile_slug: &str) -> Result<JsValue, JsValue> {
		let summaries = {
			let data = self.data.borrow();
			let mut manager = self.manager.borrow_mut();
			let filters = manager.load_default_filters(pile_slug, &*data);
			to_js(&filters.iter().map(FilterSummary::from).collect::<Vec<_>>())
		};
		self.deliver();
		summaries
	}

	pub fn filters(&self) -> Result<JsValue, JsValue> {
		to_js(&self.manager.borrow().filters().iter().map(FilterSummary::from).collect::<Vec<_>>())
	}

	/// `value` is a choice string, a number in millimetres, or `null` to unset.
	#[wasm_bindgen(js_name = setSelectedValue)]
	pub fn set_selected_value(&self, slug: &str, value: JsValue) -> Result<(), JsValue> {
		let value = optional_value(value)?;
		self.mutate(|manager| manager.set_selected_value(slug, value));
		Ok(())
	}

	#[wasm_bindgen(js_name = selectedValue)]
	pub fn selected_value(&self, slug: &str) -> Result<JsValue, JsValue> {
		to_js(&self.manager.borrow().get_selected_value(slug))
	}

	#[wasm_bindgen(js_name = clearSelections)]
	pub fn clear_selections(&self) {
		self.mutate(FilterManager::clear_selections);
	}

	pub fn results(&self) -> Vec<TaxonId> {
		sorted_ids(&self.manager.borrow().results())
	}

	/// Survivors of every chosen value except that of `excluding`.
	pub fn compute(&self, excluding: Option<String>) -> Vec<TaxonId> {
		sorted_ids(&self.manager.borrow().compute(excluding.as_deref()))
	}

	#[wasm_bindgen(js_name = taxaMatching)]
	pub fn taxa_matching(&self, slug: &str, value: JsValue) -> Result<Vec<TaxonId>, JsValue> {
		let value: ChosenValue = from_js(value)?;
		Ok(sorted_ids(&self.manager.borrow().taxa_matching(slug, &value)))
	}

	/// Merged ranges for `taxa`, in the configured display unit.
	#[wasm_bindgen(js_name = allowedRanges)]
	pub fn allowed_ranges(&self, slug: &str, taxa: Vec<TaxonId>) -> Result<JsValue, JsValue> {
		let taxa: TaxonSet = taxa.into_iter().collect();
		let manager = self.manager.borrow();
		let unit = manager.config().display_unit;
		let is_length = manager.filter(slug).map_or(false, Filter::is_length);
		let ranges: Vec<_> = manager
			.allowed_ranges(slug, &taxa)
			.into_iter()
			.map(|range| if is_length { Interval::new(unit.from_mm(range.min), unit.from_mm(range.max)) } else { range })
			.collect();
		to_js(&ranges)
	}

	#[wasm_bindgen(js_name = wouldBeEmpty)]
	pub fn would_be_empty(&self, slug: &str, candidate: JsValue) -> Result<bool, JsValue> {
		let candidate: ChosenValue = from_js(candidate)?;
		Ok(self.manager.borrow().would_be_empty(slug, &candidate))
	}

	#[wasm_bindgen(js_name = matchCounts)]
	pub fn match_counts(&self) -> Result<JsValue, JsValue> {
		to_js(&self.manager.borrow().match_counts())
	}

	/// Returns the widget kind (`"choice"`, `"length"` or `"slider"`), or `undefined` for unknown filters.
	#[wasm_bindgen(js_name = openFilter)]
	pub fn open_filter(&self, slug: &str) -> Result<JsValue, JsValue> {
		match self.manager.borrow_mut().open_filter(slug) {
			Some(widget) => to_js(&widget),
			None => Ok(JsValue::UNDEFINED),
		}
	}

	/// Returns the slug of the dismissed filter.
	pub fn dismiss(&self) -> Option<String> {
		self.manager.borrow_mut().dismiss()
	}

	/// Returns the outcome name, e.g. `"applied"` or `"would_be_empty"`.
	pub fn apply(&self, candidate: JsValue) -> Result<JsValue, JsValue> {
		let candidate = optional_value(candidate)?;
		let outcome = self.mutate(|manager| manager.apply(candidate));
		to_js(&outcome)
	}

	#[wasm_bindgen(js_name = applyLength)]
	pub fn apply_length(&self, value: f64, unit: &str) -> Result<JsValue, JsValue> {
		let unit: LengthUnit = unit.parse().map_err(js_error)?;
		let outcome = self.mutate(|manager| manager.apply_length(value, unit));
		to_js(&outcome)
	}

	/// Calls `callback` with each filter event. Returns an id for `unsubscribe`.
	pub fn subscribe(&self, callback: Function) -> u32 {
		let id = self.next_subscriber.get();
		self.next_subscriber.set(id.wrapping_add(1));
		self.subscribers.borrow_mut().push((id, callback));
		id
	}

	pub fn unsubscribe(&self, id: u32) -> bool {
		let mut subscribers = self.subscribers.borrow_mut();
		let len = subscribers.len();
		subscribers.retain(|(other, _)| *other != id);
		subscribers.len() != len
	}
}
