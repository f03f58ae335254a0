use std::sync::Arc;

use lens_config::LensConfig;
use lens_primitives::{FilterKind, geo_json_from_point};
use pretty_assertions::assert_eq;

use super::*;
use crate::testing::{MapCall, RecordingMap, ScriptedBackend, ScriptedGeocoder, candidate};

type TestCoordinator = PaginatedSearchCoordinator<ScriptedBackend, ScriptedGeocoder, RecordingMap>;

fn available_filters() -> Vec<FilterDescriptor> {
	vec![
		FilterDescriptor::new("properties/collection", "Collection", FilterKind::Radiolist, ["sentinel-2-l1c"]),
		FilterDescriptor::new("properties/sentinel:grid_square", "Sentinel Grid Square", FilterKind::Radiolist, ["UH", "UJ"]),
	]
}

fn coordinator(backend: ScriptedBackend, geocoder: ScriptedGeocoder) -> TestCoordinator {
	PaginatedSearchCoordinator::new(backend, geocoder, RecordingMap::default(), &LensConfig::default(), available_filters())
}

fn at(lat: f64, lng: f64) -> SearchParams {
	SearchParams {
		layer: Some(SearchLayer {
			center: Some(LatLng::new(lat, lng)),
			geo_json: None,
		}),
		page: Some(1),
		..SearchParams::default()
	}
}

#[tokio::test]
async fn second_page_appends_after_first() {
	let search = coordinator(ScriptedBackend::default().then(&["f1", "f2"], true).then(&["f3"], false), ScriptedGeocoder::default());

	search.search(at(10.0, 20.0)).await.expect("page 1");
	let results = search
		.search(SearchParams {
			page: Some(2),
			..SearchParams::default()
		})
		.await
		.expect("page 2")
		.expect("current");

	assert_eq!(results.features, vec!["f1", "f2", "f3"]);
	assert!(!results.has_more_results);

	let queries = search.backend().queries();
	assert_eq!(queries[0].geo_json, geo_json_from_point(LatLng::new(10.0, 20.0)));
	assert_eq!(queries[1].page, 2);
	assert_eq!(queries[1].geo_json, queries[0].geo_json, "later pages keep the searched area");
}

#[tokio::test]
async fn page_one_replaces_previous_results() {
	let search = coordinator(ScriptedBackend::default().then(&["f1", "f2"], true).then(&["g1"], false), ScriptedGeocoder::default());

	search.search(at(10.0, 20.0)).await.expect("first search");
	let results = search.search(at(30.0, 40.0)).await.expect("second search").expect("current");

	assert_eq!(results.features, vec!["g1"]);
	assert_eq!(search.state().center, LatLng::new(30.0, 40.0));
	assert_eq!(search.state().page, 1);
}

#[tokio::test]
async fn load_more_requests_next_page_only_when_available() {
	let search = coordinator(ScriptedBackend::default().then(&["f1"], true).then(&["f2"], false), ScriptedGeocoder::default());

	assert_eq!(search.load_more_results().await.expect("nothing searched yet"), None);
	assert!(search.backend().queries().is_empty());

	search.search(at(0.0, 0.0)).await.expect("page 1");
	assert!(search.has_more_results());

	let results = search.load_more_results().await.expect("page 2").expect("more available");
	assert_eq!(results.features, vec!["f1", "f2"]);
	assert_eq!(search.state().page, 2);

	assert_eq!(search.load_more_results().await.expect("exhausted"), None);
	let pages: Vec<_> = search.backend().queries().iter().map(|query| query.page).collect();
	assert_eq!(pages, vec![1, 2]);
}

#[tokio::test]
async fn search_falls_back_to_current_inputs() {
	let search = coordinator(ScriptedBackend::default(), ScriptedGeocoder::default());
	search
		.search(SearchParams {
			text_input: Some("water".to_string()),
			active_filters: Some(vec![FilterValue::one("properties/collection", "sentinel-2-l1c")]),
			..at(1.0, 2.0)
		})
		.await
		.expect("search");

	search.search(SearchParams::default()).await.expect("bare search");
	let queries = search.backend().queries();
	assert_eq!(queries[1].text_input, "water");
	assert_eq!(queries[1].geo_json, geo_json_from_point(LatLng::new(1.0, 2.0)));
	// Explicit filters apply to one request only; the active set is unchanged.
	assert!(queries[1].filters.is_empty());
}

#[tokio::test]
async fn explicit_geo_json_is_sent_verbatim() {
	let search = coordinator(ScriptedBackend::default(), ScriptedGeocoder::default());
	let drawn = GeoJson::new(serde_json::json!({ "type": "Feature", "geometry": { "type": "Polygon", "coordinates": [] } }));

	search
		.search(SearchParams {
			layer: Some(SearchLayer {
				center: Some(LatLng::new(3.0, 4.0)),
				geo_json: Some(drawn.clone()),
			}),
			..SearchParams::default()
		})
		.await
		.expect("search");

	assert_eq!(search.backend().queries()[0].geo_json, drawn);
	assert_eq!(search.state().geo_json, Some(drawn));
}

#[tokio::test]
async fn area_search_draws_and_centers_before_querying() {
	let search = coordinator(ScriptedBackend::default().then(&["f1"], true).then(&["f2"], false), ScriptedGeocoder::default());
	let drawn = GeoJson::new(serde_json::json!({ "type": "Feature", "geometry": { "type": "Polygon", "coordinates": [] } }));

	search
		.search(SearchParams {
			layer: Some(SearchLayer {
				center: Some(LatLng::new(3.0, 4.0)),
				geo_json: Some(drawn.clone()),
			}),
			..SearchParams::default()
		})
		.await
		.expect("search");

	let expected = vec![
		MapCall::Area(drawn, LayerTarget::FeatureGroup),
		MapCall::Center(geo_json_from_point(LatLng::new(3.0, 4.0))),
		MapCall::Clear(ClearLayers::ExceptSearchArea),
	];
	assert_eq!(search.map.calls(), expected);

	search.load_more_results().await.expect("page 2");
	assert_eq!(search.map.calls(), expected, "loading more keeps the map as drawn");
}

#[tokio::test(start_paused = true)]
async fn slow_search_cannot_replace_newer_results() {
	let backend = ScriptedBackend::default().then_after(500, &["old"], true).then_after(50, &["new"], false);
	let search = coordinator(backend, ScriptedGeocoder::default());

	let (slow, fast) = tokio::join!(search.search(at(1.0, 1.0)), search.search(at(2.0, 2.0)));

	assert_eq!(slow.expect("slow search"), None);
	assert_eq!(fast.expect("fast search").map(|results| results.features), Some(vec!["new"]));
	assert_eq!(search.results().map(|results| results.features), Some(vec!["new"]));
	assert!(!search.has_more_results());
}

#[tokio::test(start_paused = true)]
async fn late_page_is_not_appended_to_newer_search() {
	let backend = ScriptedBackend::default()
		.then(&["a1"], true)
		.then_after(500, &["a2"], false)
		.then_after(50, &["b1"], false);
	let search = coordinator(backend, ScriptedGeocoder::default());
	search.search(at(0.0, 0.0)).await.expect("page 1");

	let (more, newer) = tokio::join!(search.load_more_results(), search.search(at(5.0, 5.0)));

	assert_eq!(more.expect("load more"), None);
	assert_eq!(newer.expect("newer search").map(|results| results.features), Some(vec!["b1"]));
	assert_eq!(search.results().map(|results| results.features), Some(vec!["b1"]));
}

#[tokio::test]
async fn failed_search_keeps_requested_inputs() {
	let search = coordinator(ScriptedBackend::default().then(&["f1"], true).then_fail("upstream 502"), ScriptedGeocoder::default());
	search.search(at(0.0, 0.0)).await.expect("page 1");

	let err = search
		.search(SearchParams {
			text_input: Some("forest".to_string()),
			..at(5.0, 6.0)
		})
		.await
		.expect_err("search function rejects");

	assert!(matches!(err, LensError::SearchExecutionFailed { .. }));
	assert_eq!(search.state().text_input, "forest");
	assert_eq!(search.state().center, LatLng::new(5.0, 6.0));
	assert_eq!(search.results().map(|results| results.features), Some(vec!["f1"]));
}

#[tokio::test]
async fn handle_on_search_ignores_incomplete_points() {
	let search = coordinator(ScriptedBackend::default(), ScriptedGeocoder::default());
	let point = SelectedPoint { x: Some(1.0), y: None };

	assert_eq!(search.handle_on_search(point, None, None, None).await.expect("no-op"), None);
	assert!(search.backend().queries().is_empty());
	assert!(search.map.calls().is_empty());
}

#[tokio::test]
async fn handle_on_search_places_marker_and_searches_point() {
	let search = coordinator(ScriptedBackend::default().then(&["f1"], false), ScriptedGeocoder::default());
	let point = SelectedPoint::from(GeoPoint::new(20.0, 10.0));

	let results = search.handle_on_search(point, None, Some("somewhere".into()), None).await.expect("search");

	assert_eq!(results.map(|results| results.features), Some(vec!["f1"]));
	let point_area = geo_json_from_point(LatLng::new(10.0, 20.0));
	assert_eq!(
		search.map.calls(),
		vec![
			MapCall::Clear(ClearLayers::Markers),
			MapCall::Marker(LatLng::new(10.0, 20.0), LayerTarget::FeatureGroup),
			MapCall::Area(point_area.clone(), LayerTarget::FeatureGroup),
			MapCall::Center(point_area),
			MapCall::Clear(ClearLayers::ExceptSearchArea),
		]
	);
	assert_eq!(search.state().center, LatLng::new(10.0, 20.0));
}

#[tokio::test(start_paused = true)]
async fn query_params_with_single_match_search_with_filters() {
	let geocoder = ScriptedGeocoder::default().respond("Paris", 20, vec![candidate("Paris, France", 2.3522, 48.8566)]);
	let search = coordinator(ScriptedBackend::default().then(&["scene"], false), geocoder);

	let outcome = search.handle_query_params("?q=Paris&collection=sentinel-2-l1c").await.expect("rehydrate");

	assert_eq!(outcome, QueryParamsOutcome::Searched);
	let queries = search.backend().queries();
	assert_eq!(queries.len(), 1);
	assert_eq!(queries[0].filters, vec![FilterValue::one("properties/collection", "sentinel-2-l1c")]);
	assert_eq!(queries[0].text_input, "Paris");
	assert_eq!(search.filters().active(), [FilterValue::one("properties/collection", "sentinel-2-l1c")]);
	assert_eq!(search.state().center, LatLng::new(48.8566, 2.3522));
}

#[tokio::test(start_paused = true)]
async fn query_params_without_unique_match_do_not_search() {
	let geocoder = ScriptedGeocoder::default()
		.respond("Springfield", 20, vec![candidate("Springfield, IL", -89.6, 39.8), candidate("Springfield, MO", -93.3, 37.2)])
		.respond("Nowhere", 20, vec![]);
	let search = coordinator(ScriptedBackend::default(), geocoder);

	assert_eq!(
		search.handle_query_params("?q=Springfield&collection=sentinel-2-l1c").await.expect("ambiguous"),
		QueryParamsOutcome::Ambiguous(2)
	);
	assert_eq!(search.handle_query_params("?q=Nowhere").await.expect("no match"), QueryParamsOutcome::NoMatch);
	assert_eq!(search.handle_query_params("?collection=sentinel-2-l1c").await.expect("no query"), QueryParamsOutcome::NoQuery);

	assert!(search.backend().queries().is_empty());
	assert!(search.filters().active().is_empty());
}

#[tokio::test(start_paused = true)]
async fn query_params_propagate_geocode_failures() {
	let geocoder = ScriptedGeocoder::default().fail("Paris", 5, "quota exceeded");
	let search = coordinator(ScriptedBackend::default(), geocoder);

	let err = search.handle_query_params("q=Paris").await.expect_err("geocode failure");
	assert!(matches!(err, LensError::GeocodeLookupFailed { .. }));
}

#[tokio::test]
async fn saving_filters_refreshes_existing_results() {
	let backend = ScriptedBackend::default().then(&["f1", "f2"], true).then(&["f3"], false).then(&["g1"], false);
	let search = coordinator(backend, ScriptedGeocoder::default());

	search.open_filters();
	assert!(search.toggle_filter_value("properties/collection", "sentinel-2-l1c"));
	assert_eq!(search.save_filter_changes().await.expect("no search yet"), None);
	assert!(search.backend().queries().is_empty());

	search.search(at(0.0, 0.0)).await.expect("page 1");
	search.load_more_results().await.expect("page 2");

	let refreshed = search.clear_active_filters().await.expect("refresh").expect("results existed");
	assert_eq!(refreshed.features, vec!["g1"]);

	let queries = search.backend().queries();
	let last = queries.last().expect("refresh query");
	assert_eq!(last.page, 1);
	assert!(last.filters.is_empty());
	assert_eq!(queries[0].filters, vec![FilterValue::one("properties/collection", "sentinel-2-l1c")]);
}

#[tokio::test]
async fn cancelled_filter_edits_never_reach_searches() {
	let search = coordinator(ScriptedBackend::default(), ScriptedGeocoder::default());
	search.open_filters();
	search.toggle_filter_value("properties/sentinel:grid_square", "UH");
	search.cancel_filter_changes();

	search.search(at(0.0, 0.0)).await.expect("search");
	assert!(search.backend().queries()[0].filters.is_empty());
}

#[tokio::test]
async fn clear_search_resets_state_and_layers() {
	let search = coordinator(ScriptedBackend::default().then(&["f1"], true), ScriptedGeocoder::default());
	search
		.handle_on_search(
			SelectedPoint::from(GeoPoint::new(1.0, 1.0)),
			None,
			None,
			Some(vec![FilterValue::one("properties/collection", "sentinel-2-l1c")]),
		)
		.await
		.expect("search");
	search.open_filters();

	let state = search.clear_search();

	assert_eq!(state.center, LensConfig::default().default_center);
	assert_eq!(state.page, 1);
	assert_eq!(search.results(), None);
	assert!(!search.has_more_results());
	assert_eq!(state.filters.available().len(), 2);
	assert!(!state.filters.is_open());
	assert_eq!(search.map.calls().last(), Some(&MapCall::Clear(ClearLayers::All)));
}

#[tokio::test]
async fn spawned_search_updates_shared_state() {
	let search = Arc::new(coordinator(ScriptedBackend::default().then(&["f1"], false), ScriptedGeocoder::default()));

	let results = search.spawn_search(at(7.0, 8.0)).await.expect("join").expect("search").expect("current");

	assert_eq!(results.features, vec!["f1"]);
	assert_eq!(search.results(), Some(results));
}
