use simplekey_filters::{
	source::values_from_records, taxon::character_records, CharacterValueRecord, FilterDescriptor, FilterValues, PileData, PileSnapshot, Taxon, TaxonValue,
	ValueType,
};

#[test]
fn records_map_to_values_of_the_filter_type() {
	let records = [
		CharacterValueRecord::text("red", &[1, 2]).with_friendly_text("Red"),
		CharacterValueRecord::range(3.0, 1.0, &[3]),
		CharacterValueRecord { value_max: Some(4.0), ..CharacterValueRecord::range(0.0, 0.0, &[4]) },
	];

	match values_from_records("flower_color", ValueType::Text, &records) {
		FilterValues::Text(values) => {
			assert_eq!(values.len(), 1);
			assert_eq!(values[0].choice, "red");
			assert_eq!(values[0].friendly_text, "Red");
		}
		other => panic!("unexpected {:?}", other),
	}

	match values_from_records("stem_length", ValueType::Length, &records) {
		FilterValues::Length(ranges) => {
			let bounds: Vec<_> = ranges.iter().map(|range| (range.min, range.max)).collect();
			assert_eq!(bounds, [(1.0, 3.0), (0.0, 4.0)]);
		}
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn nan_and_boundless_numeric_records_are_skipped() {
	let records = [
		CharacterValueRecord { value_min: None, value_max: None, ..CharacterValueRecord::text("5", &[1]) },
		CharacterValueRecord::range(f64::NAN, 2.0, &[2]),
	];
	assert!(values_from_records("petal_number", ValueType::Length, &records).is_empty());
}

#[test]
fn descriptors_know_their_length_unit() {
	assert!(FilterDescriptor::new("stem_length", "Stem length", ValueType::Length).with_unit("CM").is_length());
	assert!(!FilterDescriptor::new("petal_number", "Petals", ValueType::Length).with_unit("petals").is_length());
	assert!(!FilterDescriptor::new("flower_color", "Flower color", ValueType::Text).with_unit("mm").is_length());
}

#[test]
fn taxon_attributes_invert_into_records() {
	let taxa = [
		Taxon::new(1, "Aster novae-angliae")
			.with_value("flower_color", TaxonValue::Text("purple".to_owned()))
			.with_value("flower_color", TaxonValue::Text("pink".to_owned())),
		Taxon::new(2, "Solidago canadensis").with_value("flower_color", TaxonValue::Text("yellow".to_owned())),
		Taxon::new(3, "Aster laevis").with_value("flower_color", TaxonValue::Text("purple".to_owned())),
	];
	let records = character_records(&taxa, "flower_color");
	let summary: Vec<_> = records.iter().map(|record| (record.value_str.as_deref().unwrap(), record.taxa.clone())).collect();
	assert_eq!(summary, [("purple", vec![1, 3]), ("pink", vec![1]), ("yellow", vec![2])]);
	assert!(character_records(&taxa, "stem_length").is_empty());
}

#[test]
fn snapshot_serves_pile_data() {
	let snapshot = PileSnapshot::from_json(
		r#"{ "asters": { "default_filters": [{ "character_short_name": "flower_color", "character_friendly_name": "Flower color", "value_type": "TEXT" }], "taxa": [1, 2] } }"#,
	)
	.unwrap();
	assert_eq!(snapshot.pile_slugs().collect::<Vec<_>>(), ["asters"]);
	let info = snapshot.pile_info("asters").unwrap();
	assert_eq!(info.slug, "asters");
	assert_eq!(info.default_filters[0].order, 0);
	assert_eq!(snapshot.pile_taxa("asters"), Some(vec![1, 2]));
	assert_eq!(snapshot.character_values("asters", "flower_color"), None);
	assert!(snapshot.pile_info("lupines").is_none());
	assert!(PileSnapshot::from_json("[]").is_err());
}
