use crate::{
	error::{Error, Result},
	units::LengthUnit,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHANGE_EVENT: &str = "simplekey:filter-changed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Cache `taxa_matching` per filter and value. Installed values never change, so entries stay valid until the filter is replaced.
	pub memoize_matches: bool,
	/// DOM event type dispatched by the web surface on each committed value change.
	pub change_event: String,
	/// Unit the web surface reports length ranges in.
	pub display_unit: LengthUnit,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			memoize_matches: true,
			change_event: DEFAULT_CHANGE_EVENT.to_owned(),
			display_unit: LengthUnit::default(),
		}
	}
}

impl EngineConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		if self.change_event.trim().is_empty() {
			return Err(Error::Config("change_event must not be empty".to_owned()));
		}
		Ok(())
	}
}
