//! Configuration for lens search widgets.
//!
//! Configuration is written in TOML. Every field has a default, so an empty
//! file is a valid configuration:
//!
//! ```toml
//! log_filter = "lens=debug,info"
//!
//! [default_center]
//! lat = 0.0
//! lng = 0.0
//!
//! [search]
//! page_limit = 5
//! query_param = "q"
//! filter_namespace_separator = "/"
//! ```

pub mod error;

use std::path::Path;

use lens_primitives::LatLng;
use serde::Deserialize;

pub use error::{ConfigError, Result};

/// Top-level widget configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LensConfig {
	/// Map center used on mount and after a search is cleared.
	pub default_center: LatLng,
	/// Search and URL rehydration settings.
	pub search: SearchSettings,
	/// `tracing` filter directive used when `RUST_LOG` is unset.
	pub log_filter: String,
}

impl Default for LensConfig {
	fn default() -> Self {
		Self {
			default_center: LatLng::default(),
			search: SearchSettings::default(),
			log_filter: "info".to_string(),
		}
	}
}

/// Settings consumed by the search coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
	/// Results requested per page.
	pub page_limit: u32,
	/// URL parameter holding the placename to rehydrate.
	pub query_param: String,
	/// Separator between a filter id's namespace and its URL parameter name.
	pub filter_namespace_separator: char,
}

impl Default for SearchSettings {
	fn default() -> Self {
		Self {
			page_limit: 5,
			query_param: "q".to_string(),
			filter_namespace_separator: '/',
		}
	}
}

impl LensConfig {
	/// Parse and validate a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Checks value ranges that serde cannot express.
	pub fn validate(&self) -> Result<()> {
		if !self.default_center.is_valid() {
			return Err(ConfigError::Invalid(format!(
				"default_center {}, {} is outside lat [-90, 90] / lng [-180, 180]",
				self.default_center.lat, self.default_center.lng
			)));
		}
		if self.search.page_limit == 0 {
			return Err(ConfigError::Invalid("search.page_limit must be greater than 0".to_string()));
		}
		if self.search.query_param.is_empty() {
			return Err(ConfigError::Invalid("search.query_param must not be empty".to_string()));
		}
		Ok(())
	}
}
