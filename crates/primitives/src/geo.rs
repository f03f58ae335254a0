//! Coordinate and GeoJSON types.
//!
//! Geocoders report locations as `x`/`y` ([`GeoPoint`]) while the map works in
//! `lat`/`lng` ([`LatLng`]). GeoJSON stays an untyped [`serde_json::Value`]
//! because search backends consume it verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A map position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
	pub lat: f64,
	pub lng: f64,
}

impl LatLng {
	/// Creates a new position.
	pub const fn new(lat: f64, lng: f64) -> Self {
		Self { lat, lng }
	}

	/// Returns true when both components are finite and within WGS84 bounds.
	pub fn is_valid(&self) -> bool {
		self.lat.is_finite() && self.lng.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
	}
}

impl From<GeoPoint> for LatLng {
	fn from(point: GeoPoint) -> Self {
		Self { lat: point.y, lng: point.x }
	}
}

/// A location as reported by a geocoding provider (`x` = longitude, `y` = latitude).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
	pub x: f64,
	pub y: f64,
}

impl GeoPoint {
	/// Creates a new provider point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl From<LatLng> for GeoPoint {
	fn from(position: LatLng) -> Self {
		Self {
			x: position.lng,
			y: position.lat,
		}
	}
}

impl fmt::Display for GeoPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}, {}", self.x, self.y)
	}
}

/// An opaque GeoJSON document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoJson(Value);

impl GeoJson {
	/// Wraps an arbitrary GeoJSON value.
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	/// Returns the geometry of the first feature, or the document's own
	/// geometry when it is a bare `Feature`.
	pub fn first_geometry(&self) -> Option<&Value> {
		match self.0.get("type").and_then(Value::as_str) {
			Some("FeatureCollection") => self.0.get("features")?.as_array()?.first()?.get("geometry"),
			Some("Feature") => self.0.get("geometry"),
			_ => None,
		}
	}
}

/// Builds a single-point `FeatureCollection` for `position`.
///
/// Coordinates follow GeoJSON order: `[lng, lat]`.
pub fn geo_json_from_point(position: LatLng) -> GeoJson {
	GeoJson(json!({
		"type": "FeatureCollection",
		"features": [{
			"type": "Feature",
			"properties": {},
			"geometry": {
				"type": "Point",
				"coordinates": [position.lng, position.lat],
			},
		}],
	}))
}
