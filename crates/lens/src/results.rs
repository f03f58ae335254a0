use serde::{Deserialize, Serialize};

/// One page returned by the search function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<F> {
	#[serde(default = "Vec::new")]
	pub features: Vec<F>,
	#[serde(default)]
	pub has_more_results: bool,
}

impl<F> SearchResponse<F> {
	/// Creates a response page.
	pub fn new(features: Vec<F>, has_more_results: bool) -> Self {
		Self { features, has_more_results }
	}
}

/// Results accumulated across the pages of one logical query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet<F> {
	pub features: Vec<F>,
	pub has_more_results: bool,
}

impl<F> ResultSet<F> {
	/// Number of accumulated features.
	pub fn len(&self) -> usize {
		self.features.len()
	}

	/// Returns true when the query matched nothing.
	pub fn is_empty(&self) -> bool {
		self.features.is_empty()
	}
}

/// Folds a response page into the previous results.
///
/// Page 1 replaces everything. Later pages append in response order after the
/// existing features, or start fresh if there is nothing to append to.
/// `has_more_results` always comes from the newest response.
pub fn merge_results<F>(previous: Option<ResultSet<F>>, page: u32, response: SearchResponse<F>) -> ResultSet<F> {
	let features = match previous {
		Some(mut previous) if page > 1 => {
			previous.features.extend(response.features);
			previous.features
		}
		_ => response.features,
	};
	ResultSet {
		features,
		has_more_results: response.has_more_results,
	}
}

/// Paging metadata as reported by STAC style search APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchMeta {
	pub page: u32,
	pub limit: u32,
	pub found: u64,
}

impl SearchMeta {
	/// Returns true if pages beyond `page` hold more matches.
	pub fn has_more_results(&self) -> bool {
		u64::from(self.page) * u64::from(self.limit) < self.found
	}
}
