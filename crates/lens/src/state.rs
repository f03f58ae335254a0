use lens_primitives::{DateRange, FilterDescriptor, GeoJson, LatLng};
use parking_lot::RwLock;

use crate::filters::FilterSet;
use crate::results::{ResultSet, SearchResponse, merge_results};

/// Inputs of the current search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
	pub center: LatLng,
	pub geo_json: Option<GeoJson>,
	pub text_input: String,
	pub date: DateRange,
	/// 1-based page of the most recent request.
	pub page: u32,
	pub filters: FilterSet,
}

impl Default for SearchState {
	fn default() -> Self {
		Self {
			center: LatLng::default(),
			geo_json: None,
			text_input: String::new(),
			date: DateRange::default(),
			page: 1,
			filters: FilterSet::default(),
		}
	}
}

impl SearchState {
	/// Initial state centered on `center` with `available` filters.
	pub fn new(center: LatLng, available: Vec<FilterDescriptor>) -> Self {
		Self {
			center,
			filters: FilterSet::new(available),
			..Self::default()
		}
	}
}

/// Shallow update for [`SearchState`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatePatch {
	pub center: Option<LatLng>,
	pub geo_json: Option<GeoJson>,
	pub text_input: Option<String>,
	pub date: Option<DateRange>,
	pub page: Option<u32>,
	pub filters: Option<FilterSet>,
}

impl SearchState {
	fn apply(&mut self, patch: SearchStatePatch) {
		let SearchStatePatch {
			center,
			geo_json,
			text_input,
			date,
			page,
			filters,
		} = patch;
		if let Some(center) = center {
			self.center = center;
		}
		if geo_json.is_some() {
			self.geo_json = geo_json;
		}
		if let Some(text_input) = text_input {
			self.text_input = text_input;
		}
		if let Some(date) = date {
			self.date = date;
		}
		if let Some(page) = page {
			self.page = page.max(1);
		}
		if let Some(filters) = filters {
			self.filters = filters;
		}
	}
}

#[derive(Debug)]
struct StoreInner<F> {
	state: SearchState,
	results: Option<ResultSet<F>>,
}

/// Synchronous container for search inputs and accumulated results.
///
/// Every mutation is immediately visible to the next read. Results are
/// `None` until the first search completes, distinguishing "not searched"
/// from "searched, nothing found".
#[derive(Debug)]
pub struct SearchStateStore<F> {
	inner: RwLock<StoreInner<F>>,
}

impl<F: Clone> SearchStateStore<F> {
	/// Creates a store holding `state` and no results.
	pub fn new(state: SearchState) -> Self {
		Self {
			inner: RwLock::new(StoreInner { state, results: None }),
		}
	}

	/// Snapshot of the current inputs.
	pub fn get(&self) -> SearchState {
		self.inner.read().state.clone()
	}

	/// Shallow-merges `patch` and returns the new state.
	pub fn update(&self, patch: SearchStatePatch) -> SearchState {
		let mut inner = self.inner.write();
		inner.state.apply(patch);
		inner.state.clone()
	}

	/// Mutates the filter set in place.
	pub fn update_filters<R>(&self, f: impl FnOnce(&mut FilterSet) -> R) -> R {
		f(&mut self.inner.write().state.filters)
	}

	/// Snapshot of the accumulated results.
	pub fn results(&self) -> Option<ResultSet<F>> {
		self.inner.read().results.clone()
	}

	/// Whether the last response reported more pages.
	pub fn has_more_results(&self) -> bool {
		self.inner.read().results.as_ref().is_some_and(|results| results.has_more_results)
	}

	/// Folds a response for `page` into the results and returns them.
	pub fn apply_response(&self, page: u32, response: SearchResponse<F>) -> ResultSet<F> {
		let mut inner = self.inner.write();
		let merged = merge_results(inner.results.take(), page, response);
		inner.results = Some(merged.clone());
		merged
	}

	/// Resets inputs to `center`, drops results and active filters.
	///
	/// Available filters are kept.
	pub fn reset(&self, center: LatLng) -> SearchState {
		let mut inner = self.inner.write();
		let available = inner.state.filters.available().to_vec();
		inner.state = SearchState::new(center, available);
		inner.results = None;
		inner.state.clone()
	}
}
