//! Merging of closed numeric intervals into the minimal disjoint set covering them.

use core::cmp::Ordering;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval<T> {
	pub min: T,
	pub max: T,
}

impl<T: Float> Interval<T> {
	#[must_use]
	pub fn new(min: T, max: T) -> Self {
		Self { min, max }
	}

	#[must_use]
	pub fn contains(&self, value: T) -> bool {
		self.min <= value && value <= self.max
	}

	/// Swaps reversed bounds. `None` if either bound is `NaN`.
	fn normalized(self) -> Option<Self> {
		if self.min.is_nan() || self.max.is_nan() {
			None
		} else if self.min > self.max {
			Some(Self::new(self.max, self.min))
		} else {
			Some(self)
		}
	}
}

/// Merges `ranges` into ascending, pairwise disjoint intervals with the same union.
///
/// Intervals that overlap or touch (`next.min <= current.max`) are joined.
/// Reversed bounds are swapped and intervals with a `NaN` bound are dropped.
pub fn merge<T: Float>(ranges: impl IntoIterator<Item = Interval<T>>) -> Vec<Interval<T>> {
	let mut sorted: Vec<_> = ranges.into_iter().filter_map(Interval::normalized).collect();
	sorted.sort_by(|a, b| a.min.partial_cmp(&b.min).unwrap_or(Ordering::Equal));

	let mut merged: Vec<Interval<T>> = Vec::with_capacity(sorted.len());
	for next in sorted {
		match merged.last_mut() {
			Some(current) if next.min <= current.max => current.max = current.max.max(next.max),
			_ => merged.push(next),
		}
	}
	trace!(merged = merged.len(), "Merged ranges.");
	merged
}

/// Whether `value` lies in any of `ranges`.
#[must_use]
pub fn permits<T: Float>(ranges: &[Interval<T>], value: T) -> bool {
	ranges.iter().any(|range| range.contains(value))
}

/// The smallest interval enclosing all of `ranges`, for slider limits.
#[must_use]
pub fn bounds<T: Float>(ranges: &[Interval<T>]) -> Option<Interval<T>> {
	ranges.iter().filter_map(|range| range.normalized()).fold(None, |acc, range| {
		Some(match acc {
			None => range,
			Some(acc) => Interval::new(acc.min.min(range.min), acc.max.max(range.max)),
		})
	})
}
