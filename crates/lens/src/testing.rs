//! Scripted collaborators for coordinator tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use lens_primitives::{GeoJson, GeoPoint, LatLng};
use lens_worker::{BoxError, CancelHandle, CancellableOperation};
use parking_lot::Mutex;

use crate::{ClearLayers, GeocodeCandidate, GeocodeResponse, Geocoder, LayerTarget, MapLayers, SearchBackend, SearchQuery, SearchResponse};

pub(crate) fn candidate(address: &str, x: f64, y: f64) -> GeocodeCandidate {
	GeocodeCandidate {
		address: address.to_string(),
		location: GeoPoint::new(x, y),
	}
}

#[derive(Clone)]
struct Scripted {
	delay: Duration,
	result: Result<Vec<GeocodeCandidate>, String>,
}

/// Geocoder answering from a per-query script after a per-query delay.
#[derive(Default)]
pub(crate) struct ScriptedGeocoder {
	scripts: HashMap<String, Scripted>,
	started: Mutex<Vec<(String, CancelHandle)>>,
}

impl ScriptedGeocoder {
	pub(crate) fn respond(mut self, query: &str, delay_ms: u64, candidates: Vec<GeocodeCandidate>) -> Self {
		self.scripts.insert(
			query.to_string(),
			Scripted {
				delay: Duration::from_millis(delay_ms),
				result: Ok(candidates),
			},
		);
		self
	}

	pub(crate) fn fail(mut self, query: &str, delay_ms: u64, message: &str) -> Self {
		self.scripts.insert(
			query.to_string(),
			Scripted {
				delay: Duration::from_millis(delay_ms),
				result: Err(message.to_string()),
			},
		);
		self
	}

	/// Cancel handles of every lookup started, in start order.
	pub(crate) fn started(&self) -> Vec<(String, CancelHandle)> {
		self.started.lock().clone()
	}
}

impl Geocoder for ScriptedGeocoder {
	fn geocode_placename(&self, query: &str) -> CancellableOperation<GeocodeResponse> {
		let script = self.scripts.get(query).cloned().unwrap_or(Scripted {
			delay: Duration::ZERO,
			result: Ok(Vec::new()),
		});
		let operation = CancellableOperation::new(async move {
			tokio::time::sleep(script.delay).await;
			script
				.result
				.map(|candidates| GeocodeResponse { candidates })
				.map_err(BoxError::from)
		});
		self.started.lock().push((query.to_string(), operation.handle()));
		operation
	}
}

type ScriptedResponse = (Duration, Result<SearchResponse<&'static str>, String>);

/// Search function replaying queued responses and recording every query.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
	responses: Mutex<VecDeque<ScriptedResponse>>,
	queries: Mutex<Vec<SearchQuery>>,
}

impl ScriptedBackend {
	pub(crate) fn then(self, features: &[&'static str], has_more_results: bool) -> Self {
		self.then_after(0, features, has_more_results)
	}

	/// Queues a response delivered `delay_ms` after the request.
	pub(crate) fn then_after(self, delay_ms: u64, features: &[&'static str], has_more_results: bool) -> Self {
		let response = SearchResponse::new(features.to_vec(), has_more_results);
		self.responses.lock().push_back((Duration::from_millis(delay_ms), Ok(response)));
		self
	}

	pub(crate) fn then_fail(self, message: &str) -> Self {
		self.responses.lock().push_back((Duration::ZERO, Err(message.to_string())));
		self
	}

	pub(crate) fn queries(&self) -> Vec<SearchQuery> {
		self.queries.lock().clone()
	}
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
	type Feature = &'static str;

	async fn resolve_on_search(&self, query: SearchQuery) -> Result<SearchResponse<Self::Feature>, BoxError> {
		self.queries.lock().push(query);
		let next = self.responses.lock().pop_front();
		let Some((delay, result)) = next else {
			return Ok(SearchResponse::new(Vec::new(), false));
		};
		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}
		result.map_err(BoxError::from)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MapCall {
	Clear(ClearLayers),
	Marker(LatLng, LayerTarget),
	Area(GeoJson, LayerTarget),
	Center(GeoJson),
}

/// Map recording the side effects it was asked to perform.
#[derive(Default)]
pub(crate) struct RecordingMap {
	calls: Mutex<Vec<MapCall>>,
}

impl RecordingMap {
	pub(crate) fn calls(&self) -> Vec<MapCall> {
		self.calls.lock().clone()
	}
}

impl MapLayers for RecordingMap {
	fn clear_layers(&self, options: ClearLayers) {
		self.calls.lock().push(MapCall::Clear(options));
	}

	fn add_marker_layer(&self, position: LatLng, target: LayerTarget) {
		self.calls.lock().push(MapCall::Marker(position, target));
	}

	fn add_geo_json_layer(&self, geo_json: &GeoJson, target: LayerTarget) {
		self.calls.lock().push(MapCall::Area(geo_json.clone(), target));
	}

	fn center_on(&self, geo_json: &GeoJson) {
		self.calls.lock().push(MapCall::Center(geo_json.clone()));
	}
}
