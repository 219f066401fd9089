use crate::error::Error;
use core::{
	fmt::{self, Display, Formatter},
	str::FromStr,
};
use serde::{Deserialize, Serialize};

/// Units a length can be typed in. Values are stored in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
	Mm,
	Cm,
	M,
	In,
	Ft,
}

impl Default for LengthUnit {
	fn default() -> Self {
		Self::Mm
	}
}

impl LengthUnit {
	#[must_use]
	pub fn millimetres_per_unit(self) -> f64 {
		match self {
			Self::Mm => 1.0,
			Self::Cm => 10.0,
			Self::M => 1000.0,
			Self::In => 25.4,
			Self::Ft => 304.8,
		}
	}

	#[must_use]
	pub fn to_mm(self, value: f64) -> f64 {
		value * self.millimetres_per_unit()
	}

	#[must_use]
	pub fn from_mm(self, millimetres: f64) -> f64 {
		millimetres / self.millimetres_per_unit()
	}

	#[must_use]
	pub fn is_metric(self) -> bool {
		matches!(self, Self::Mm | Self::Cm | Self::M)
	}
}

impl FromStr for LengthUnit {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"mm" => Ok(Self::Mm),
			"cm" => Ok(Self::Cm),
			"m" => Ok(Self::M),
			"in" => Ok(Self::In),
			"ft" => Ok(Self::Ft),
			_ => Err(Error::UnknownUnit(s.to_owned())),
		}
	}
}

impl Display for LengthUnit {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Mm => "mm",
			Self::Cm => "cm",
			Self::M => "m",
			Self::In => "in",
			Self::Ft => "ft",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::LengthUnit;

	#[test]
	fn round_trips_through_millimetres() {
		assert_eq!(LengthUnit::Cm.to_mm(2.5), 25.0);
		assert_eq!(LengthUnit::In.to_mm(1.0), 25.4);
		assert!((LengthUnit::Ft.from_mm(304.8) - 1.0).abs() < 1e-12);
	}

	#[test]
	fn parses_case_insensitively() {
		assert_eq!("CM".parse::<LengthUnit>().unwrap(), LengthUnit::Cm);
		assert!("furlong".parse::<LengthUnit>().is_err());
	}
}
