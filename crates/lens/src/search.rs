use std::sync::Arc;

use lens_config::{LensConfig, SearchSettings};
use lens_primitives::{DateRange, FilterDescriptor, FilterValue, GeoJson, GeoPoint, LatLng, geo_json_from_point};
use lens_worker::{RequestFence, TaskClass};
use tokio::task::JoinHandle;

use crate::autocomplete::AutocompleteCoordinator;
use crate::backend::{SearchBackend, SearchQuery};
use crate::filters::FilterSet;
use crate::geocode::Geocoder;
use crate::map::{ClearLayers, LayerTarget, MapLayers};
use crate::query_params::parse_query_params;
use crate::results::ResultSet;
use crate::state::{SearchState, SearchStatePatch, SearchStateStore};
use crate::{LensError, Result};

/// A drawn or selected map area to search within.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchLayer {
	pub center: Option<LatLng>,
	pub geo_json: Option<GeoJson>,
}

/// Overrides for one search; unset fields fall back to the current state.
///
/// `page` defaults to 1, so any search that does not name a page starts a
/// new result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
	pub layer: Option<SearchLayer>,
	pub date: Option<DateRange>,
	pub text_input: Option<String>,
	pub page: Option<u32>,
	pub active_filters: Option<Vec<FilterValue>>,
}

/// A point picked in the UI whose coordinates may be incomplete.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectedPoint {
	pub x: Option<f64>,
	pub y: Option<f64>,
}

impl From<GeoPoint> for SelectedPoint {
	fn from(point: GeoPoint) -> Self {
		Self {
			x: Some(point.x),
			y: Some(point.y),
		}
	}
}

/// What [`PaginatedSearchCoordinator::handle_query_params`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParamsOutcome {
	/// No placename parameter was present.
	NoQuery,
	/// The lookup was overtaken by a newer autocomplete lookup.
	Discarded,
	/// The placename matched nothing.
	NoMatch,
	/// The placename matched more than one candidate; nothing was searched.
	Ambiguous(usize),
	/// Exactly one candidate matched and a search ran.
	Searched,
}

/// Drives the injected search function from the search state.
///
/// Inputs are committed to the store before the search function is awaited,
/// so the UI reflects the requested parameters while results are pending.
/// Every request is fenced: a response that arrives after a newer request was
/// issued is discarded instead of replacing or extending newer results.
pub struct PaginatedSearchCoordinator<B: SearchBackend, G, M> {
	backend: B,
	autocomplete: AutocompleteCoordinator<G>,
	map: M,
	store: SearchStateStore<B::Feature>,
	fence: RequestFence,
	settings: SearchSettings,
	default_center: LatLng,
}

impl<B, G, M> PaginatedSearchCoordinator<B, G, M>
where
	B: SearchBackend,
	G: Geocoder,
	M: MapLayers,
{
	/// Creates a coordinator centered on the configured default.
	pub fn new(backend: B, geocoder: G, map: M, config: &LensConfig, available_filters: Vec<FilterDescriptor>) -> Self {
		Self {
			backend,
			autocomplete: AutocompleteCoordinator::new(geocoder),
			map,
			store: SearchStateStore::new(SearchState::new(config.default_center, available_filters)),
			fence: RequestFence::new(),
			settings: config.search.clone(),
			default_center: config.default_center,
		}
	}

	/// Placename autocomplete sharing this coordinator's geocoder.
	pub fn autocomplete(&self) -> &AutocompleteCoordinator<G> {
		&self.autocomplete
	}

	/// Borrows the search function.
	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Snapshot of the current inputs.
	pub fn state(&self) -> SearchState {
		self.store.get()
	}

	/// Snapshot of the accumulated results; `None` before the first search.
	pub fn results(&self) -> Option<ResultSet<B::Feature>> {
		self.store.results()
	}

	/// Whether [`Self::load_more_results`] will fetch another page.
	pub fn has_more_results(&self) -> bool {
		self.store.has_more_results()
	}

	/// Runs a search and folds the response into the results.
	///
	/// The requested inputs are committed to the state before the search
	/// function runs and stay committed if it fails. The searched area is
	/// drawn and centered on the map, and every other layer is cleared.
	///
	/// Returns `Ok(None)` when a newer request was issued while this one was
	/// pending; its response (or failure) is dropped.
	pub async fn search(&self, params: SearchParams) -> Result<Option<ResultSet<B::Feature>>> {
		self.execute(params, true).await
	}

	async fn execute(&self, params: SearchParams, draw_area: bool) -> Result<Option<ResultSet<B::Feature>>> {
		let token = self.fence.issue();
		let current = self.store.get();
		let SearchParams {
			layer,
			date,
			text_input,
			page,
			active_filters,
		} = params;

		let (center, geo_json) = match layer {
			Some(SearchLayer { center, geo_json }) => {
				let center = center.unwrap_or(current.center);
				(center, geo_json.unwrap_or_else(|| geo_json_from_point(center)))
			}
			None => (current.center, current.geo_json.clone().unwrap_or_else(|| geo_json_from_point(current.center))),
		};
		let text_input = text_input.unwrap_or(current.text_input);
		let date = date.unwrap_or(current.date);
		let page = page.unwrap_or(1).max(1);
		let filters = active_filters.unwrap_or_else(|| current.filters.active().to_vec());

		self.store.update(SearchStatePatch {
			center: Some(center),
			geo_json: Some(geo_json.clone()),
			text_input: Some(text_input.clone()),
			date: Some(date),
			page: Some(page),
			filters: None,
		});

		if draw_area {
			self.map.add_geo_json_layer(&geo_json, LayerTarget::FeatureGroup);
			self.map.center_on(&geo_json_from_point(center));
			self.map.clear_layers(ClearLayers::ExceptSearchArea);
		}

		let query = SearchQuery {
			geo_json,
			date,
			text_input,
			page,
			filters,
		};
		tracing::debug!(%token, page, filters = query.filters.len(), "search.request");

		let response = self.backend.resolve_on_search(query).await;
		if !self.fence.is_current(token) {
			tracing::debug!(%token, page, failed = response.is_err(), "search.stale_discarded");
			return Ok(None);
		}
		let response = response.map_err(|source| {
			tracing::warn!(%token, page, error = %source, "search.failed");
			LensError::SearchExecutionFailed { source }
		})?;

		let results = self.store.apply_response(page, response);
		tracing::debug!(%token, page, features = results.len(), has_more_results = results.has_more_results, "search.resolved");
		Ok(Some(results))
	}

	/// Fetches the next page of the current search.
	///
	/// Returns `Ok(None)` without calling the search function unless the last
	/// response reported more results, and also when the page was overtaken by
	/// a newer request. The map is left as it is.
	pub async fn load_more_results(&self) -> Result<Option<ResultSet<B::Feature>>> {
		if !self.store.has_more_results() {
			tracing::debug!("search.load_more_unavailable");
			return Ok(None);
		}
		let page = self.store.get().page.saturating_add(1);
		self.execute(
			SearchParams {
				page: Some(page),
				..SearchParams::default()
			},
			false,
		)
		.await
	}

	/// Searches around a point picked from autocomplete or the map.
	///
	/// Does nothing unless both coordinates are present. Otherwise replaces
	/// the marker on the map and starts a new search at page 1.
	pub async fn handle_on_search(
		&self,
		point: SelectedPoint,
		date: Option<DateRange>,
		text_input: Option<String>,
		active_filters: Option<Vec<FilterValue>>,
	) -> Result<Option<ResultSet<B::Feature>>> {
		let (Some(x), Some(y)) = (point.x, point.y) else {
			tracing::debug!(?point, "search.incomplete_point");
			return Ok(None);
		};

		let center = LatLng::new(y, x);
		let geo_json = geo_json_from_point(center);
		self.map.clear_layers(ClearLayers::Markers);
		self.map.add_marker_layer(center, LayerTarget::FeatureGroup);

		self.search(SearchParams {
			layer: Some(SearchLayer {
				center: Some(center),
				geo_json: Some(geo_json),
			}),
			date,
			text_input,
			page: Some(1),
			active_filters,
		})
		.await
	}

	/// Rehydrates a search from page URL parameters.
	///
	/// The placename parameter is geocoded; only an unambiguous single match
	/// triggers a search, after which the parsed filters become active.
	pub async fn handle_query_params(&self, input: &str) -> Result<QueryParamsOutcome> {
		let available = self.store.get().filters.available().to_vec();
		let params = parse_query_params(input, &self.settings, &available);
		let Some(query) = params.query else {
			return Ok(QueryParamsOutcome::NoQuery);
		};

		let Some(items) = self.autocomplete.lookup_placename(&query).await? else {
			return Ok(QueryParamsOutcome::Discarded);
		};

		let item = match items.as_slice() {
			[item] => item,
			[] => {
				tracing::info!(%query, "search.query_params_no_match");
				return Ok(QueryParamsOutcome::NoMatch);
			}
			many => {
				tracing::info!(%query, candidates = many.len(), "search.query_params_ambiguous");
				return Ok(QueryParamsOutcome::Ambiguous(many.len()));
			}
		};

		let filters = params.filters;
		let searched = self
			.handle_on_search(SelectedPoint::from(item.value), None, Some(query), Some(filters.clone()))
			.await;
		self.store.update_filters(|set| set.set_active_filters(filters));
		searched?;
		Ok(QueryParamsOutcome::Searched)
	}

	/// Resets inputs and results, clears active filters and every map layer.
	pub fn clear_search(&self) -> SearchState {
		let state = self.store.reset(self.default_center);
		self.map.clear_layers(ClearLayers::All);
		state
	}

	/// Snapshot of the filter subsystem.
	pub fn filters(&self) -> FilterSet {
		self.store.get().filters
	}

	/// Starts editing filters.
	pub fn open_filters(&self) {
		self.store.update_filters(FilterSet::open_filters);
	}

	/// Clicks one entry of a filter list. Returns false for unknown ids.
	pub fn toggle_filter_value(&self, id: &str, entry: &str) -> bool {
		self.store.update_filters(|set| set.toggle_filter_value(id, entry))
	}

	/// Discards unsaved filter edits.
	pub fn cancel_filter_changes(&self) {
		self.store.update_filters(FilterSet::cancel_filter_changes);
	}

	/// Commits filter edits and refreshes results if a search has run.
	pub async fn save_filter_changes(&self) -> Result<Option<ResultSet<B::Feature>>> {
		let active = self.store.update_filters(FilterSet::save_filter_changes);
		self.refresh_with_filters(active).await
	}

	/// Clears active filters and refreshes results if a search has run.
	pub async fn clear_active_filters(&self) -> Result<Option<ResultSet<B::Feature>>> {
		let active = self.store.update_filters(|set| set.clear_active_filters().to_vec());
		self.refresh_with_filters(active).await
	}

	async fn refresh_with_filters(&self, active: Vec<FilterValue>) -> Result<Option<ResultSet<B::Feature>>> {
		if self.store.results().is_none() {
			return Ok(None);
		}
		self.execute(
			SearchParams {
				page: Some(1),
				active_filters: Some(active),
				..SearchParams::default()
			},
			false,
		)
		.await
	}
}

impl<B, G, M> PaginatedSearchCoordinator<B, G, M>
where
	B: SearchBackend + 'static,
	G: Geocoder + 'static,
	M: MapLayers + 'static,
{
	/// Runs [`Self::search`] as a background task, for sync event handlers.
	pub fn spawn_search(self: &Arc<Self>, params: SearchParams) -> JoinHandle<Result<Option<ResultSet<B::Feature>>>> {
		let this = Arc::clone(self);
		lens_worker::spawn(TaskClass::Background, async move { this.search(params).await })
	}
}

#[cfg(test)]
mod tests;
