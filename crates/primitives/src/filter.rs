//! Search filter model.
//!
//! [`FilterDescriptor`]s describe what a filter can hold and come from the
//! host application. [`FilterValue`]s are the user's current choices and only
//! carry an id and a value; anything else is looked up from the descriptor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Pseudo list entry meaning "no restriction" for a filter.
pub const ALL_VALUES_ITEM: &str = "All Values";

/// Input style of a filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
	/// Any number of values may be selected.
	#[default]
	Checklist,
	/// Exactly one value may be selected.
	Radiolist,
	/// Applied to searches but never shown in filter panels.
	Hidden,
}

/// Full description of a filter the host makes available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
	pub id: String,
	pub label: String,
	#[serde(rename = "type", default)]
	pub kind: FilterKind,
	#[serde(default)]
	pub list: Vec<String>,
	/// Friendly names keyed by entries of `list`.
	#[serde(rename = "displayList", default, skip_serializing_if = "BTreeMap::is_empty")]
	pub display_list: BTreeMap<String, String>,
}

impl FilterDescriptor {
	/// Creates a descriptor with no display names.
	pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FilterKind, list: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			kind,
			list: list.into_iter().map(Into::into).collect(),
			display_list: BTreeMap::new(),
		}
	}

	/// Returns the friendly name for `value`, falling back to the value itself.
	pub fn display_name<'a>(&'a self, value: &'a str) -> &'a str {
		self.display_list.get(value).map_or(value, String::as_str)
	}

	/// Returns the id without its namespace prefix.
	pub fn local_id(&self, separator: char) -> &str {
		split_namespace(&self.id, separator).1
	}
}

/// A selected value: a single entry for radio lists, many for checklists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValueKind {
	One(String),
	Many(Vec<String>),
}

impl FilterValueKind {
	/// Returns true when the value restricts nothing.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::One(value) => value.is_empty() || value == ALL_VALUES_ITEM,
			Self::Many(values) => values.iter().all(|v| v.is_empty() || v == ALL_VALUES_ITEM),
		}
	}

	/// Returns true if `candidate` is selected.
	pub fn contains(&self, candidate: &str) -> bool {
		match self {
			Self::One(value) => value == candidate,
			Self::Many(values) => values.iter().any(|v| v == candidate),
		}
	}

	/// Iterates the selected entries.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		let values: &[String] = match self {
			Self::One(value) => std::slice::from_ref(value),
			Self::Many(values) => values,
		};
		values.iter().map(String::as_str)
	}

	fn to_json(&self) -> Value {
		match self {
			Self::One(value) => json!(value),
			Self::Many(values) => json!(values),
		}
	}
}

/// An active (or pending) filter choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterValue {
	pub id: String,
	pub value: FilterValueKind,
}

impl FilterValue {
	/// Creates a single-entry value.
	pub fn one(id: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			value: FilterValueKind::One(value.into()),
		}
	}

	/// Creates a multi-entry value.
	pub fn many(id: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			id: id.into(),
			value: FilterValueKind::Many(values.into_iter().map(Into::into).collect()),
		}
	}

	/// Renders the value for display, joining lists with `", "`.
	pub fn display_value(&self) -> String {
		self.value.iter().collect::<Vec<_>>().join(", ")
	}
}

/// A filter row ready for a panel: active value merged over its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFilter {
	pub id: String,
	pub label: String,
	pub kind: FilterKind,
	pub value: FilterValueKind,
	/// Selected entries by their friendly names, joined with `", "`.
	pub display_value: String,
}

/// Splits `id` at the first `separator` into `(namespace, local id)`.
pub fn split_namespace(id: &str, separator: char) -> (Option<&str>, &str) {
	match id.split_once(separator) {
		Some((namespace, local)) => (Some(namespace), local),
		None => (None, id),
	}
}

/// Finds a filter value by id.
pub fn find_by_id<'a>(filters: &'a [FilterValue], id: &str) -> Option<&'a FilterValue> {
	filters.iter().find(|filter| filter.id == id)
}

/// Drops repeated ids, keeping the first occurrence and the original order.
pub fn dedup_by_id(filters: &[FilterValue]) -> Vec<FilterValue> {
	let mut deduped: Vec<FilterValue> = Vec::with_capacity(filters.len());
	for filter in filters {
		if filter.id.is_empty() || find_by_id(&deduped, &filter.id).is_some() {
			continue;
		}
		deduped.push(filter.clone());
	}
	deduped
}

/// Builds the rows a filter panel shows for `active`.
///
/// Ids are deduplicated first-write-wins, labels and kinds come from the
/// matching descriptor in `available` (which also supplies display names), entries without a value or of kind
/// [`FilterKind::Hidden`] are dropped, and rows are sorted by label.
pub fn panel_filters(active: &[FilterValue], available: &[FilterDescriptor]) -> Vec<PanelFilter> {
	let mut rows: Vec<PanelFilter> = dedup_by_id(active)
		.into_iter()
		.filter(|filter| !filter.value.is_empty())
		.map(|filter| {
			let descriptor = available.iter().find(|d| d.id == filter.id);
			let display_value = match descriptor {
				Some(descriptor) => filter.value.iter().map(|entry| descriptor.display_name(entry)).collect::<Vec<_>>().join(", "),
				None => filter.display_value(),
			};
			PanelFilter {
				label: descriptor.map_or_else(|| filter.id.clone(), |d| d.label.clone()),
				kind: descriptor.map_or(FilterKind::default(), |d| d.kind),
				id: filter.id,
				value: filter.value,
				display_value,
			}
		})
		.filter(|row| row.kind != FilterKind::Hidden)
		.collect();
	rows.sort_by(|a, b| a.label.cmp(&b.label));
	rows
}

/// Converts filters under `namespace` into an equality query object.
///
/// `properties/collection = sentinel-2-l1c` becomes
/// `{ "collection": { "eq": "sentinel-2-l1c" } }`. Filters in other
/// namespaces, or with none, are skipped.
pub fn query_from_filters(filters: &[FilterValue], namespace: &str, separator: char) -> Map<String, Value> {
	let mut query = Map::new();
	for filter in filters {
		if let (Some(parent), key) = split_namespace(&filter.id, separator)
			&& parent == namespace
		{
			query.insert(key.to_string(), json!({ "eq": filter.value.to_json() }));
		}
	}
	query
}
