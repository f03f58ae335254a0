use lens_worker::{CancelHandle, InFlightRequests, OperationError, RequestFence, RequestToken};
use parking_lot::Mutex;

use crate::geocode::{GeocodeResponse, Geocoder, SearchResultItem, map_geocode_candidate};
use crate::{LensError, Result};

const SUPERSEDED_REASON: &str = "superseded by a newer geocode placename request";
const STALE_REASON: &str = "canceling stale geocode placename request";

/// Keystroke-driven placename lookups where only the latest lookup counts.
///
/// Each coordinator owns its fence and in-flight set, so two mounted widgets
/// never discard each other's lookups.
#[derive(Debug)]
pub struct AutocompleteCoordinator<G> {
	geocoder: G,
	fence: RequestFence,
	in_flight: Mutex<InFlightRequests>,
}

impl<G: Geocoder> AutocompleteCoordinator<G> {
	/// Creates a coordinator around `geocoder`.
	pub fn new(geocoder: G) -> Self {
		Self {
			geocoder,
			fence: RequestFence::new(),
			in_flight: Mutex::new(InFlightRequests::new()),
		}
	}

	/// Borrows the geocoder.
	pub fn geocoder(&self) -> &G {
		&self.geocoder
	}

	/// Number of lookups started and not yet settled or superseded.
	pub fn in_flight(&self) -> usize {
		self.in_flight.lock().len()
	}

	/// Looks up `query` and maps its candidates to autocomplete entries.
	///
	/// Returns `Ok(None)` when this lookup was superseded by a later call,
	/// whether it was cancelled mid-flight or finished after being overtaken.
	/// Provider failures surface as [`LensError::GeocodeLookupFailed`].
	pub async fn lookup_placename(&self, query: &str) -> Result<Option<Vec<SearchResultItem>>> {
		let token = self.fence.issue();
		if !self.fence.is_current(token) {
			tracing::debug!(%token, query, "autocomplete.stale_before_start");
			return Ok(None);
		}

		let operation = self.geocoder.geocode_placename(query);
		let handle = operation.handle();
		{
			let mut in_flight = self.in_flight.lock();
			in_flight.push(token, handle.clone());
			let cancelled = in_flight.cancel_superseded(token, SUPERSEDED_REASON);
			if cancelled > 0 {
				tracing::trace!(%token, cancelled, "autocomplete.cancel_superseded");
			}
		}

		let settled = operation.settle().await;
		self.in_flight.lock().remove(token);

		let response = match settled {
			Ok(response) => response,
			Err(OperationError::Cancelled { reason }) => {
				tracing::debug!(%token, query, reason = %reason, "autocomplete.cancelled");
				return Ok(None);
			}
			Err(OperationError::Failed(source)) => {
				tracing::warn!(%token, query, error = %source, "autocomplete.geocode_failed");
				return Err(LensError::GeocodeLookupFailed {
					query: query.to_string(),
					source,
				});
			}
		};

		Ok(self.accept_settled(token, &handle, query, response))
	}

	/// Maps a settled response, or drops it if `token` was overtaken meanwhile.
	fn accept_settled(&self, token: RequestToken, handle: &CancelHandle, query: &str, response: GeocodeResponse) -> Option<Vec<SearchResultItem>> {
		if !self.fence.is_current(token) {
			handle.cancel(STALE_REASON);
			tracing::debug!(%token, query, "autocomplete.stale_after_settle");
			return None;
		}

		let items: Vec<_> = response.candidates.into_iter().map(map_geocode_candidate).collect();
		tracing::debug!(%token, query, candidates = items.len(), "autocomplete.resolved");
		Some(items)
	}
}
