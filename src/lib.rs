#![doc(html_root_url = "https://docs.rs/simplekey-filters/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod manager;
pub mod matcher;
pub mod notify;
pub mod range;
pub mod source;
pub mod taxon;
pub mod units;
pub mod value;
pub mod web;
pub mod working_area;

pub use config::EngineConfig;
pub use controller::{FilterController, FilterCounts, ValueCount};
pub use error::{Error, Result};
pub use filter::Filter;
pub use manager::{ApplyOutcome, FilterManager};
pub use notify::{FilterEvent, SubscriptionId};
pub use range::Interval;
pub use source::{CharacterValueRecord, FilterDescriptor, PileData, PileInfo, PileRecord, PileSnapshot};
pub use taxon::{taxon_set, Taxon, TaxonId, TaxonSet, TaxonValue};
pub use units::LengthUnit;
pub use value::{CharacterValue, ChosenValue, FilterValues, LengthRange, ValueType};
pub use web::WebFilterManager;
pub use working_area::{WidgetKind, WorkingAreaState};
