//! Typed observer registry for filter changes.

use crate::value::ChosenValue;
use serde::Serialize;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterEvent {
	/// Sent exactly once per committed change of a filter's value. Previews never send it.
	ValueChanged { slug: String, value: Option<ChosenValue> },
	/// A pile's filters replaced the previous set. All values start out unset.
	FiltersLoaded { pile_slug: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubscriptionId(u32);

impl SubscriptionId {
	#[must_use]
	pub fn get(self) -> u32 {
		self.0
	}
}

impl From<u32> for SubscriptionId {
	fn from(id: u32) -> Self {
		Self(id)
	}
}

type Observer = Box<dyn FnMut(&FilterEvent)>;

#[derive(Default)]
pub struct Observers {
	next_id: u32,
	observers: Vec<(SubscriptionId, Observer)>,
}

impl core::fmt::Debug for Observers {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Observers").field("len", &self.observers.len()).finish()
	}
}

impl Observers {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe(&mut self, observer: impl FnMut(&FilterEvent) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_id);
		self.next_id = self.next_id.wrapping_add(1);
		self.observers.push((id, Box::new(observer)));
		id
	}

	/// Returns whether `id` was subscribed.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let len = self.observers.len();
		self.observers.retain(|(other, _)| *other != id);
		self.observers.len() != len
	}

	/// Calls each observer in subscription order.
	pub fn emit(&mut self, event: &FilterEvent) {
		trace!(?event, observers = self.observers.len(), "Emitting filter event.");
		for (_, observer) in &mut self.observers {
			observer(event);
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.observers.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.observers.is_empty()
	}
}
