use crate::value::ValueType;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("unknown filter: {0}")]
	UnknownFilter(String),

	#[error("no data for pile: {0}")]
	MissingPile(String),

	#[error("filter {slug} expects {expected} values")]
	ValueTypeMismatch { slug: String, expected: ValueType },

	#[error("invalid value record for {slug}: {reason}")]
	InvalidRecord { slug: String, reason: String },

	#[error("filter {0} was installed against a different taxon universe")]
	ForeignUniverse(String),

	#[error("unknown length unit: {0}")]
	UnknownUnit(String),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
