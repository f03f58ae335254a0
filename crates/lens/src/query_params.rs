use std::borrow::Cow;

use lens_config::SearchSettings;
use lens_primitives::{FilterDescriptor, FilterKind, FilterValue, FilterValueKind};
use url::Url;
use url::form_urlencoded;

/// Search inputs recovered from a page URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
	/// Placename to geocode, if the query parameter is present and non-empty.
	pub query: Option<String>,
	/// Filter values whose parameter name matched an available filter.
	pub filters: Vec<FilterValue>,
}

/// Parses the placename and filter parameters from `input`.
///
/// `input` may be a full URL, a `?`-prefixed query string or a bare one.
/// A filter matches the parameter named after its id with the namespace
/// stripped (`properties/collection` reads `collection`). Checklists collect
/// every repeated value, other kinds take the first.
pub fn parse_query_params(input: &str, settings: &SearchSettings, available: &[FilterDescriptor]) -> QueryParams {
	let pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> = match Url::parse(input) {
		Ok(url) if url.has_host() => url.query_pairs().map(|(k, v)| (Cow::Owned(k.into_owned()), Cow::Owned(v.into_owned()))).collect(),
		_ => form_urlencoded::parse(input.trim_start_matches('?').as_bytes()).collect(),
	};

	let values_of = |name: &str| -> Vec<String> {
		pairs
			.iter()
			.filter(|(key, value)| key == name && !value.is_empty())
			.map(|(_, value)| value.to_string())
			.collect()
	};

	let query = values_of(&settings.query_param).into_iter().next();
	let filters = available
		.iter()
		.filter_map(|descriptor| {
			let mut values = values_of(descriptor.local_id(settings.filter_namespace_separator));
			if values.is_empty() {
				return None;
			}
			let value = match descriptor.kind {
				FilterKind::Checklist => FilterValueKind::Many(values),
				FilterKind::Radiolist | FilterKind::Hidden => FilterValueKind::One(values.swap_remove(0)),
			};
			Some(FilterValue {
				id: descriptor.id.clone(),
				value,
			})
		})
		.collect();

	QueryParams { query, filters }
}
