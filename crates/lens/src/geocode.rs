use lens_primitives::GeoPoint;
use lens_worker::CancellableOperation;
use serde::{Deserialize, Serialize};

/// Placename lookup provider.
///
/// Implementations start the lookup eagerly or lazily inside the returned
/// operation; the coordinator may cancel it at any point before it settles.
pub trait Geocoder: Send + Sync {
	/// Looks up candidates for a free-text placename.
	fn geocode_placename(&self, query: &str) -> CancellableOperation<GeocodeResponse>;
}

/// Raw provider response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeocodeResponse {
	#[serde(default)]
	pub candidates: Vec<GeocodeCandidate>,
}

/// One raw provider match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
	pub address: String,
	pub location: GeoPoint,
}

/// A display-ready autocomplete entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
	pub label: String,
	pub sublabel: String,
	pub value: GeoPoint,
}

/// Maps a provider candidate to an autocomplete entry.
pub fn map_geocode_candidate(candidate: GeocodeCandidate) -> SearchResultItem {
	SearchResultItem {
		sublabel: format!("Location: {}", candidate.location),
		label: candidate.address,
		value: candidate.location,
	}
}
