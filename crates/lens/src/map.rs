use lens_primitives::{GeoJson, LatLng};

/// Which layers a clear affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearLayers {
	/// Every drawn layer and marker.
	#[default]
	All,
	/// Markers only; drawn shapes stay.
	Markers,
	/// Everything except the area layer added for the current search and the
	/// selected-point marker.
	ExceptSearchArea,
}

/// Where a marker layer is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerTarget {
	/// The editable feature group used by drawing tools.
	#[default]
	FeatureGroup,
	/// Directly on the map.
	Map,
}

/// Imperative map-layer operations the coordinators trigger as side effects.
///
/// Nothing returned by the map feeds back into coordinator state.
pub trait MapLayers: Send + Sync {
	/// Removes layers from the map.
	fn clear_layers(&self, options: ClearLayers);

	/// Adds a marker at `position`.
	fn add_marker_layer(&self, position: LatLng, target: LayerTarget);

	/// Draws `geo_json` as the searched area.
	fn add_geo_json_layer(&self, geo_json: &GeoJson, target: LayerTarget);

	/// Pans the view onto `geo_json`.
	fn center_on(&self, geo_json: &GeoJson);
}

/// Map stand-in for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMap;

impl MapLayers for NoopMap {
	fn clear_layers(&self, _options: ClearLayers) {}

	fn add_marker_layer(&self, _position: LatLng, _target: LayerTarget) {}

	fn add_geo_json_layer(&self, _geo_json: &GeoJson, _target: LayerTarget) {}

	fn center_on(&self, _geo_json: &GeoJson) {}
}
