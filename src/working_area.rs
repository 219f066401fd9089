//! Which widget edits a filter, and the open/closed state of the single working area.

use crate::value::ValueType;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
	Choice,
	Length,
	Slider,
}

#[must_use]
pub fn select_widget(value_type: ValueType, is_length: bool) -> WidgetKind {
	match (value_type, is_length) {
		(ValueType::Text, _) => WidgetKind::Choice,
		(_, true) => WidgetKind::Length,
		_ => WidgetKind::Slider,
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingAreaState {
	Closed,
	Open { slug: String, widget: WidgetKind },
}

impl Default for WorkingAreaState {
	fn default() -> Self {
		Self::Closed
	}
}

/// At most one filter is open at a time. Opening another one dismisses the current one first.
#[derive(Debug, Default)]
pub struct WorkingArea {
	state: WorkingAreaState,
}

impl WorkingArea {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn state(&self) -> &WorkingAreaState {
		&self.state
	}

	#[must_use]
	pub fn open_slug(&self) -> Option<&str> {
		match &self.state {
			WorkingAreaState::Open { slug, .. } => Some(slug),
			WorkingAreaState::Closed => None,
		}
	}

	/// Returns the slug of the filter that was dismissed to make room, if any.
	pub fn open(&mut self, slug: &str, widget: WidgetKind) -> Option<String> {
		let dismissed = self.dismiss();
		trace!(slug, ?widget, "Opening working area.");
		self.state = WorkingAreaState::Open { slug: slug.to_owned(), widget };
		dismissed
	}

	/// Returns the slug of the filter that was open.
	pub fn dismiss(&mut self) -> Option<String> {
		match std::mem::take(&mut self.state) {
			WorkingAreaState::Open { slug, .. } => {
				trace!(%slug, "Dismissed working area.");
				Some(slug)
			}
			WorkingAreaState::Closed => None,
		}
	}
}
