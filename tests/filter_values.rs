use simplekey_filters::{
	taxon::sorted_ids, taxon_set, CharacterValue, ChosenValue, Error, Filter, FilterValues, Interval, LengthRange, LengthUnit, TaxonSet, ValueType, WidgetKind,
};
use std::rc::Rc;

fn pile() -> Rc<TaxonSet> {
	Rc::new(taxon_set(&[2, 3, 4, 5, 6, 7]))
}

fn sample_choice_filter() -> Filter {
	let mut filter = Filter::new("flower_color", "Flower color", ValueType::Text);
	filter
		.install_values(
			pile(),
			FilterValues::Text(vec![
				CharacterValue::new("red", "Red", taxon_set(&[2, 3, 4])),
				CharacterValue::new("orange", "Orange", taxon_set(&[2, 9, 10])),
				CharacterValue::new("yellow", "Yellow", taxon_set(&[4, 7])),
				CharacterValue::new("blue", "Blue", taxon_set(&[8])),
			]),
		)
		.unwrap();
	filter
}

fn sample_length_filter() -> Filter {
	let mut filter = Filter::new("stem_length", "Stem length", ValueType::Length).with_unit(LengthUnit::Mm);
	filter
		.install_values(
			pile(),
			FilterValues::Length(vec![
				LengthRange::new(0.0, 2.0, taxon_set(&[1])),
				LengthRange::new(1.0, 8.0, taxon_set(&[2])),
				LengthRange::new(2.0, 5.0, taxon_set(&[3, 4])),
				LengthRange::new(3.0, 6.0, taxon_set(&[5])),
				LengthRange::new(9.0, 10.0, taxon_set(&[6, 9, 10])),
			]),
		)
		.unwrap();
	filter
}

fn ids(set: &TaxonSet) -> Vec<u32> {
	sorted_ids(set)
}

#[test]
fn choice_filter_drops_values_without_pile_taxa() {
	let filter = sample_choice_filter();
	assert_eq!(filter.values().len(), 3);
	let mut keys: Vec<_> = filter.choicemap_keys().collect();
	keys.sort_unstable();
	assert_eq!(keys, ["orange", "red", "yellow"]);
	assert!(filter.choice("blue").is_none());
	assert_eq!(ids(filter.valueless_taxa()), [5, 6]);
}

#[test]
fn choice_matching_excludes_taxa_outside_the_pile() {
	let filter = sample_choice_filter();
	assert_eq!(ids(&filter.taxa_matching(&"orange".into())), [2]);
	assert_eq!(ids(&filter.taxa_matching(&"red".into())), [2, 3, 4]);
	assert!(filter.taxa_matching(&"blue".into()).is_empty());
	assert!(filter.taxa_matching(&"Red".into()).is_empty());
	assert!(filter.taxa_matching(&ChosenValue::Number(1.0)).is_empty());
}

#[test]
fn length_filter_installation() {
	let filter = sample_length_filter();
	assert_eq!(filter.values().len(), 4);
	assert_eq!(ids(filter.valueless_taxa()), [7]);
	assert!(filter.is_length());
	assert_eq!(filter.widget_kind(), WidgetKind::Length);
}

#[test]
fn length_matching_is_inclusive() {
	let filter = sample_length_filter();
	assert_eq!(ids(&filter.taxa_matching(&3.0.into())), [2, 3, 4, 5]);
	assert_eq!(ids(&filter.taxa_matching(&10.0.into())), [6]);
	assert_eq!(ids(&filter.taxa_matching(&8.0.into())), [2]);
	assert!(filter.taxa_matching(&8.5.into()).is_empty());
	assert!(filter.taxa_matching(&f64::NAN.into()).is_empty());
	assert_eq!(ids(&filter.taxa_matching(&"6".into())), [2, 5]);
}

#[test]
fn allowed_ranges_merge_overlaps() {
	let filter = sample_length_filter();
	assert_eq!(filter.allowed_ranges(&taxon_set(&[2, 3, 5])), [Interval::new(1.0, 8.0)]);
	assert_eq!(filter.allowed_ranges(&taxon_set(&[3, 5, 6])), [Interval::new(2.0, 6.0), Interval::new(9.0, 10.0)]);
	assert!(filter.allowed_ranges(&TaxonSet::new()).is_empty());
	// Taxon 1 only contributes outside the pile.
	assert!(filter.allowed_ranges(&taxon_set(&[1, 7])).is_empty());
}

#[test]
fn allowed_ranges_of_text_filter_are_empty() {
	assert!(sample_choice_filter().allowed_ranges(&pile()).is_empty());
}

#[test]
fn every_installed_value_intersects_the_pile() {
	for filter in &[sample_choice_filter(), sample_length_filter()] {
		let pile = filter.pile_taxa();
		assert!(filter.values().taxa().all(|taxa| !taxa.is_disjoint(pile)));
	}
}

#[test]
fn values_and_valueless_account_for_the_whole_pile() {
	for filter in &[sample_choice_filter(), sample_length_filter()] {
		let mut covered: TaxonSet = filter.values().taxa().flat_map(|taxa| taxa.iter().copied()).collect();
		covered.extend(filter.valueless_taxa().iter().copied());
		assert!(filter.pile_taxa().is_subset(&covered));
		assert!(filter.values().taxa().all(|taxa| taxa.is_disjoint(filter.valueless_taxa())));
	}
}

#[test]
fn matching_is_idempotent() {
	let filter = sample_length_filter();
	let value = ChosenValue::Number(4.0);
	assert_eq!(filter.taxa_matching(&value), filter.taxa_matching(&value));
}

#[test]
fn empty_pile_gives_a_degenerate_filter() {
	let mut filter = Filter::new("flower_color", "Flower color", ValueType::Text);
	filter.install_values(Rc::default(), FilterValues::Text(vec![CharacterValue::new("red", "Red", taxon_set(&[1]))])).unwrap();
	assert!(filter.values().is_empty());
	assert!(filter.valueless_taxa().is_empty());
	assert!(filter.taxa_matching(&"red".into()).is_empty());
}

#[test]
fn duplicate_choices_are_merged() {
	let mut filter = Filter::new("leaf_shape", "Leaf shape", ValueType::Text);
	filter
		.install_values(
			pile(),
			FilterValues::Text(vec![
				CharacterValue::new("ovate", "Ovate", taxon_set(&[2])),
				CharacterValue::new("lobed", "Lobed", taxon_set(&[3])),
				CharacterValue::new("ovate", "Ovate", taxon_set(&[4])),
			]),
		)
		.unwrap();
	assert_eq!(filter.values().len(), 2);
	assert_eq!(ids(&filter.taxa_matching(&"ovate".into())), [2, 4]);
}

#[test]
fn installing_the_wrong_value_type_is_rejected() {
	let mut filter = sample_choice_filter();
	let result = filter.install_values(pile(), FilterValues::Length(vec![LengthRange::new(1.0, 2.0, taxon_set(&[2]))]));
	assert!(matches!(result, Err(Error::ValueTypeMismatch { expected: ValueType::Text, .. })));
	assert_eq!(filter.values().len(), 3);
}

#[test]
fn sorted_values_follow_display_order() {
	let mut filter = Filter::new("petal_count", "Petal count", ValueType::Text);
	filter
		.install_values(
			pile(),
			FilterValues::Text(vec![
				CharacterValue::new("na", "NA", taxon_set(&[2])),
				CharacterValue::new("10", "10", taxon_set(&[3])),
				CharacterValue::new("4", "4", taxon_set(&[4])),
				CharacterValue::new("5", "5", taxon_set(&[5])),
			]),
		)
		.unwrap();
	let order: Vec<_> = filter.sorted_values().into_iter().map(|value| value.choice.as_str()).collect();
	assert_eq!(order, ["4", "5", "10", "na"]);
}

#[test]
fn sorting_falls_back_to_case_insensitive_text() {
	let mut filter = Filter::new("habitat", "Habitat", ValueType::Text);
	filter
		.install_values(
			pile(),
			FilterValues::Text(vec![
				CharacterValue::new("wet", "wetlands", taxon_set(&[2])),
				CharacterValue::new("NA", "Doesn't apply", taxon_set(&[3])),
				CharacterValue::new("forest", "Forest", taxon_set(&[4])),
				CharacterValue::new("b", "Alpine", taxon_set(&[5])),
				CharacterValue::new("a", "alpine", taxon_set(&[6])),
			]),
		)
		.unwrap();
	let order: Vec<_> = filter.sorted_values().into_iter().map(|value| value.choice.as_str()).collect();
	assert_eq!(order, ["a", "b", "forest", "wet", "NA"]);
}

#[test]
fn numeric_filter_without_length_unit_uses_a_slider() {
	let filter = Filter::new("petal_number", "Number of petals", ValueType::Length);
	assert!(!filter.is_length());
	assert_eq!(filter.widget_kind(), WidgetKind::Slider);
	assert_eq!(sample_choice_filter().widget_kind(), WidgetKind::Choice);
}
