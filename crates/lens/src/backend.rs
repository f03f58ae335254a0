use async_trait::async_trait;
use lens_primitives::{DateRange, FilterValue, GeoJson};
use lens_worker::BoxError;
use serde::Serialize;

use crate::results::SearchResponse;

/// Parameters handed to the search function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
	pub geo_json: GeoJson,
	pub date: DateRange,
	pub text_input: String,
	pub page: u32,
	pub filters: Vec<FilterValue>,
}

/// Injected search execution.
#[async_trait]
pub trait SearchBackend: Send + Sync {
	/// Result feature type rendered by the host.
	type Feature: Clone + Send + Sync + 'static;

	/// Runs one page of a search.
	async fn resolve_on_search(&self, query: SearchQuery) -> Result<SearchResponse<Self::Feature>, BoxError>;
}
