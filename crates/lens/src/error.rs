use lens_worker::BoxError;
use thiserror::Error;

/// Failures surfaced by the lens coordinators.
///
/// Stale or cancelled autocomplete lookups are not errors; they resolve to
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum LensError {
	/// The placename provider failed for a reason other than cancellation.
	#[error("failed to geocode placename {query:?}: {source}")]
	GeocodeLookupFailed { query: String, source: BoxError },

	/// The injected search function rejected.
	#[error("failed to get search results: {source}")]
	SearchExecutionFailed { source: BoxError },
}

/// Result type for coordinator operations.
pub type Result<T> = std::result::Result<T, LensError>;
