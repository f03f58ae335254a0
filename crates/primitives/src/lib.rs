//! Core value types for map search: coordinates, GeoJSON, date ranges and filters.

/// Date range input and provider time-range formatting.
pub mod date;
/// Search filter descriptors, active values and panel helpers.
pub mod filter;
/// Async future aliases.
pub mod future;
/// Coordinates, geocoder points and GeoJSON helpers.
pub mod geo;

pub use date::DateRange;
pub use filter::{ALL_VALUES_ITEM, FilterDescriptor, FilterKind, FilterValue, FilterValueKind, PanelFilter};
pub use future::BoxFutureStatic;
pub use geo::{GeoJson, GeoPoint, LatLng, geo_json_from_point};
