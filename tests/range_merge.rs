use simplekey_filters::{
	range::{bounds, merge, permits},
	Interval,
};

fn iv(min: f64, max: f64) -> Interval<f64> {
	Interval::new(min, max)
}

#[test]
fn empty_input() {
	assert!(merge(Vec::<Interval<f64>>::new()).is_empty());
	assert_eq!(bounds::<f64>(&[]), None);
}

#[test]
fn overlapping_and_touching_ranges_join() {
	assert_eq!(merge(vec![iv(3.0, 6.0), iv(1.0, 8.0), iv(2.0, 5.0)]), [iv(1.0, 8.0)]);
	assert_eq!(merge(vec![iv(5.0, 7.0), iv(1.0, 5.0)]), [iv(1.0, 7.0)]);
}

#[test]
fn disjoint_ranges_stay_apart_in_ascending_order() {
	assert_eq!(merge(vec![iv(9.0, 10.0), iv(2.0, 5.0), iv(3.0, 6.0)]), [iv(2.0, 6.0), iv(9.0, 10.0)]);
}

#[test]
fn contained_range_does_not_shrink_the_outer_one() {
	assert_eq!(merge(vec![iv(0.0, 10.0), iv(2.0, 3.0)]), [iv(0.0, 10.0)]);
}

#[test]
fn reversed_bounds_are_swapped_and_nan_dropped() {
	assert_eq!(merge(vec![iv(4.0, 2.0), iv(f64::NAN, 1.0)]), [iv(2.0, 4.0)]);
}

#[test]
fn works_for_f32() {
	assert_eq!(merge(vec![Interval::new(1.0_f32, 2.0), Interval::new(1.5, 3.0)]), [Interval::new(1.0_f32, 3.0)]);
}

#[test]
fn permits_and_bounds() {
	let merged = merge(vec![iv(2.0, 6.0), iv(9.0, 10.0)]);
	assert!(permits(&merged, 2.0));
	assert!(permits(&merged, 10.0));
	assert!(!permits(&merged, 7.5));
	assert_eq!(bounds(&merged), Some(iv(2.0, 10.0)));
}

/// Point membership through the merged ranges equals membership through the raw ones,
/// and the merged ranges are sorted and pairwise disjoint.
#[test]
fn merging_preserves_the_union() {
	let grids: &[&[(f64, f64)]] = &[
		&[(0.0, 1.0), (1.0, 2.0), (4.0, 4.0)],
		&[(5.0, 9.0), (0.0, 3.0), (2.5, 4.5), (10.0, 12.0), (11.0, 11.5)],
		&[(3.0, 3.0), (3.0, 3.0), (1.0, 2.0)],
		&[(0.5, 7.5), (1.0, 2.0), (6.0, 9.0), (9.5, 9.75)],
	];

	for raw in grids {
		let raw: Vec<_> = raw.iter().map(|&(min, max)| iv(min, max)).collect();
		let merged = merge(raw.clone());

		for pair in merged.windows(2) {
			assert!(pair[0].max < pair[1].min, "{:?} not disjoint and ascending", merged);
		}

		for step in -4..=56 {
			let point = f64::from(step) * 0.25;
			assert_eq!(permits(&raw, point), permits(&merged, point), "membership of {} in {:?}", point, raw);
		}
	}
}
