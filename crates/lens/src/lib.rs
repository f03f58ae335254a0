//! Search coordination for map-based search widgets.
//!
//! Two coordinators make up the core:
//!
//! - [`AutocompleteCoordinator`] turns keystrokes into placename lookups. Each
//!   lookup is fenced by a [`RequestFence`](lens_worker::RequestFence), so an
//!   older, slower lookup can never overwrite a newer one.
//! - [`PaginatedSearchCoordinator`] owns the [`SearchStateStore`] (viewport,
//!   text, date, filters, page, accumulated results) and drives an injected
//!   [`SearchBackend`], appending pages on "load more" and replacing results on
//!   any new search.
//!
//! Map drawing, geocoding providers and search execution are collaborators
//! reached through the [`MapLayers`], [`Geocoder`] and [`SearchBackend`] traits.

mod autocomplete;
mod backend;
mod error;
mod filters;
mod geocode;
mod map;
mod query_params;
mod results;
mod search;
mod state;

#[cfg(test)]
mod testing;

pub use autocomplete::AutocompleteCoordinator;
pub use backend::{SearchBackend, SearchQuery};
pub use error::{LensError, Result};
pub use filters::FilterSet;
pub use geocode::{GeocodeCandidate, GeocodeResponse, Geocoder, SearchResultItem, map_geocode_candidate};
pub use map::{ClearLayers, LayerTarget, MapLayers, NoopMap};
pub use query_params::{QueryParams, parse_query_params};
pub use results::{ResultSet, SearchMeta, SearchResponse, merge_results};
pub use search::{PaginatedSearchCoordinator, QueryParamsOutcome, SearchLayer, SearchParams, SelectedPoint};
pub use state::{SearchState, SearchStatePatch, SearchStateStore};
