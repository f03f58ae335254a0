use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Optional start/end bounds picked in the date range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end: Option<DateTime<Utc>>,
}

impl DateRange {
	/// Creates a range from optional bounds.
	pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
		Self { start, end }
	}

	/// Returns true when neither bound is set.
	pub const fn is_empty(&self) -> bool {
		self.start.is_none() && self.end.is_none()
	}

	/// Formats the range as a STAC style time parameter.
	///
	/// Both bounds produce `start/end`; a single bound is returned alone.
	pub fn to_time_range(&self) -> Option<String> {
		let format = |date: DateTime<Utc>| date.to_rfc3339_opts(SecondsFormat::Millis, true);
		match (self.start.map(format), self.end.map(format)) {
			(Some(start), Some(end)) => Some(format!("{start}/{end}")),
			(start, end) => start.or(end),
		}
	}
}
