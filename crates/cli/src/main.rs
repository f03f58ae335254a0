//! Lens demo binary.
//!
//! Drives the search coordinators against a JSON fixture:
//! - `--query` rehydrates a search from page URL parameters
//! - `--text` autocompletes a placename and searches around the first match
//! - otherwise searches around the configured default center
//!
//! Each result page is printed to stdout as JSON; logs go to stderr.

mod fixture;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use lens::{NoopMap, PaginatedSearchCoordinator, QueryParamsOutcome, ResultSet, SearchParams, SelectedPoint};
use lens_config::LensConfig;
use lens_worker::TaskClass;
use serde_json::{Value, json};
use tracing::info;

use crate::fixture::{Fixture, FixtureBackend, FixtureGeocoder};

type Coordinator = PaginatedSearchCoordinator<FixtureBackend, FixtureGeocoder, NoopMap>;

/// Lens command line arguments.
#[derive(Parser, Debug)]
#[command(name = "lens")]
#[command(about = "Run map searches against a JSON fixture")]
struct Args {
	/// Fixture with places, filters and features
	#[arg(short, long, value_name = "PATH")]
	fixture: PathBuf,

	/// TOML configuration file
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Page URL or query string to rehydrate, e.g. "?q=Paris&collection=sentinel-2-l1c"
	#[arg(short, long, conflicts_with = "text")]
	query: Option<String>,

	/// Placename to autocomplete and search around
	#[arg(short, long)]
	text: Option<String>,

	/// Additional pages to load after the first
	#[arg(short, long, default_value_t = 0)]
	pages: u32,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => LensConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
		None => LensConfig::default(),
	};
	setup_tracing(args.verbose, &config.log_filter);

	let Fixture { filters, places, features } = Fixture::load(&args.fixture)?;
	info!(features = features.len(), places = places.len(), filters = filters.len(), "fixture loaded");

	let coordinator = Arc::new(PaginatedSearchCoordinator::new(
		FixtureBackend::new(features, &config.search),
		FixtureGeocoder::new(places),
		NoopMap,
		&config,
		filters,
	));

	let Some(results) = first_page(&coordinator, &args).await? else {
		return Ok(());
	};
	print_page(1, &results)?;

	for _ in 0..args.pages {
		let Some(results) = coordinator.load_more_results().await? else {
			info!("no more results");
			break;
		};
		print_page(coordinator.state().page, &results)?;
	}

	Ok(())
}

async fn first_page(coordinator: &Arc<Coordinator>, args: &Args) -> anyhow::Result<Option<ResultSet<Value>>> {
	if let Some(query) = &args.query {
		let outcome = coordinator.handle_query_params(query).await?;
		info!(?outcome, "query parameters handled");
		if outcome != QueryParamsOutcome::Searched {
			return Ok(None);
		}
		return Ok(coordinator.results());
	}

	if let Some(text) = &args.text {
		let lookup = {
			let coordinator = Arc::clone(coordinator);
			let text = text.clone();
			lens_worker::spawn(TaskClass::Interactive, async move { coordinator.autocomplete().lookup_placename(&text).await })
		};
		let Some(items) = lookup.await?? else {
			bail!("lookup for {text:?} was superseded");
		};
		let Some(item) = items.first() else {
			bail!("no place matches {text:?}");
		};
		info!(label = %item.label, sublabel = %item.sublabel, candidates = items.len(), "placename resolved");
		let point = SelectedPoint::from(item.value);
		return Ok(coordinator.handle_on_search(point, None, Some(text.clone()), None).await?);
	}

	Ok(coordinator.search(SearchParams::default()).await?)
}

fn print_page(page: u32, results: &ResultSet<Value>) -> anyhow::Result<()> {
	let page = json!({
		"page": page,
		"features": results.features,
		"hasMoreResults": results.has_more_results,
	});
	println!("{}", serde_json::to_string_pretty(&page)?);
	Ok(())
}

fn setup_tracing(verbose: bool, log_filter: &str) {
	use tracing_subscriber::EnvFilter;

	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter))
	};

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
