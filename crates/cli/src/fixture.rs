//! JSON fixture standing in for a geocoding provider and a STAC search API.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use lens::{GeocodeCandidate, GeocodeResponse, Geocoder, SearchBackend, SearchMeta, SearchQuery, SearchResponse};
use lens_config::SearchSettings;
use lens_primitives::FilterDescriptor;
use lens_primitives::filter::query_from_filters;
use lens_worker::{BoxError, CancellableOperation};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Namespace of filter ids matched against feature properties.
const PROPERTIES_NAMESPACE: &str = "properties";

/// Fixture file contents.
///
/// ```json
/// {
///   "filters": [{ "id": "properties/collection", "label": "Collection", "type": "radiolist", "list": ["sentinel-2-l1c"] }],
///   "places": { "Paris": [{ "address": "Paris, France", "location": { "x": 2.3522, "y": 48.8566 } }] },
///   "features": [{ "id": "S2A_1", "properties": { "collection": "sentinel-2-l1c" } }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fixture {
	pub filters: Vec<FilterDescriptor>,
	pub places: BTreeMap<String, Vec<GeocodeCandidate>>,
	pub features: Vec<Value>,
}

impl Fixture {
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let content = std::fs::read_to_string(path).with_context(|| format!("reading fixture {}", path.display()))?;
		serde_json::from_str(&content).with_context(|| format!("parsing fixture {}", path.display()))
	}
}

/// Answers placename lookups from the fixture, ignoring case.
pub struct FixtureGeocoder {
	places: BTreeMap<String, Vec<GeocodeCandidate>>,
}

impl FixtureGeocoder {
	pub fn new(places: BTreeMap<String, Vec<GeocodeCandidate>>) -> Self {
		let places = places.into_iter().map(|(name, candidates)| (name.to_lowercase(), candidates)).collect();
		Self { places }
	}
}

impl Geocoder for FixtureGeocoder {
	fn geocode_placename(&self, query: &str) -> CancellableOperation<GeocodeResponse> {
		let candidates = self.places.get(&query.trim().to_lowercase()).cloned().unwrap_or_default();
		CancellableOperation::new(async move { Ok(GeocodeResponse { candidates }) })
	}
}

/// Pages fixture features that match every active `properties/*` filter.
pub struct FixtureBackend {
	features: Vec<Value>,
	page_limit: u32,
	separator: char,
}

impl FixtureBackend {
	pub fn new(features: Vec<Value>, settings: &SearchSettings) -> Self {
		Self {
			features,
			page_limit: settings.page_limit.max(1),
			separator: settings.filter_namespace_separator,
		}
	}
}

#[async_trait]
impl SearchBackend for FixtureBackend {
	type Feature = Value;

	async fn resolve_on_search(&self, query: SearchQuery) -> Result<SearchResponse<Value>, BoxError> {
		let conditions = query_from_filters(&query.filters, PROPERTIES_NAMESPACE, self.separator);
		let matching: Vec<&Value> = self.features.iter().filter(|feature| matches_conditions(feature, &conditions)).collect();

		let meta = SearchMeta {
			page: query.page,
			limit: self.page_limit,
			found: matching.len() as u64,
		};
		let skip = (query.page.saturating_sub(1) as usize).saturating_mul(self.page_limit as usize);
		let features: Vec<Value> = matching.into_iter().skip(skip).take(self.page_limit as usize).cloned().collect();

		tracing::debug!(
			page = meta.page,
			found = meta.found,
			returned = features.len(),
			geometry = query.geo_json.first_geometry().and_then(|geometry| geometry["type"].as_str()).unwrap_or("none"),
			datetime = query.date.to_time_range().as_deref().unwrap_or(".."),
			text = %query.text_input,
			"fixture.search"
		);
		Ok(SearchResponse::new(features, meta.has_more_results()))
	}
}

fn matches_conditions(feature: &Value, conditions: &Map<String, Value>) -> bool {
	conditions.iter().all(|(key, condition)| {
		let actual = &feature["properties"][key.as_str()];
		match &condition["eq"] {
			Value::Array(accepted) => accepted.contains(actual),
			expected => expected == actual,
		}
	})
}
