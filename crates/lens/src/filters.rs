use lens_primitives::filter::{dedup_by_id, panel_filters};
use lens_primitives::{ALL_VALUES_ITEM, FilterDescriptor, FilterKind, FilterValue, FilterValueKind, PanelFilter};

/// Active, available and in-progress filter choices.
///
/// Edits made while the filter pane is open land in a pending copy and only
/// become active on [`FilterSet::save_filter_changes`]. Active entries always
/// reference an available descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
	available: Vec<FilterDescriptor>,
	active: Vec<FilterValue>,
	pending: Vec<FilterValue>,
	is_open: bool,
}

impl FilterSet {
	/// Creates a closed filter set with nothing active.
	pub fn new(available: Vec<FilterDescriptor>) -> Self {
		Self {
			available,
			..Self::default()
		}
	}

	/// Filters the host offers.
	pub fn available(&self) -> &[FilterDescriptor] {
		&self.available
	}

	/// Filters applied to searches.
	pub fn active(&self) -> &[FilterValue] {
		&self.active
	}

	/// Unsaved edits; empty while closed.
	pub fn pending(&self) -> &[FilterValue] {
		&self.pending
	}

	/// Whether the filter pane is being edited.
	pub fn is_open(&self) -> bool {
		self.is_open
	}

	/// Looks up an available descriptor.
	pub fn descriptor(&self, id: &str) -> Option<&FilterDescriptor> {
		self.available.iter().find(|descriptor| descriptor.id == id)
	}

	/// Starts editing from the current active filters.
	pub fn open_filters(&mut self) {
		self.pending = self.active.clone();
		self.is_open = true;
	}

	/// Sets a pending value, replacing any previous value for its id.
	///
	/// Empty values remove the id. Returns false for unknown ids.
	pub fn set_filter_value(&mut self, value: FilterValue) -> bool {
		if self.descriptor(&value.id).is_none() {
			tracing::debug!(id = %value.id, "filters.unknown_id");
			return false;
		}
		let position = self.pending.iter().position(|pending| pending.id == value.id);
		match (position, value.value.is_empty()) {
			(Some(index), true) => {
				self.pending.remove(index);
			}
			(Some(index), false) => self.pending[index] = value,
			(None, true) => {}
			(None, false) => self.pending.push(value),
		}
		true
	}

	/// Applies a click on one list entry to the pending value.
	///
	/// Radio lists select the entry, checklists toggle it, and
	/// [`ALL_VALUES_ITEM`] clears the filter. Returns false for unknown ids.
	pub fn toggle_filter_value(&mut self, id: &str, entry: &str) -> bool {
		let Some(kind) = self.descriptor(id).map(|descriptor| descriptor.kind) else {
			return false;
		};
		let value = if entry == ALL_VALUES_ITEM {
			FilterValueKind::Many(Vec::new())
		} else if kind == FilterKind::Checklist {
			let mut entries: Vec<String> = self
				.pending
				.iter()
				.find(|pending| pending.id == id)
				.map(|pending| pending.value.iter().map(str::to_string).collect())
				.unwrap_or_default();
			if let Some(index) = entries.iter().position(|existing| existing == entry) {
				entries.remove(index);
			} else {
				entries.push(entry.to_string());
			}
			FilterValueKind::Many(entries)
		} else {
			FilterValueKind::One(entry.to_string())
		};
		self.set_filter_value(FilterValue { id: id.to_string(), value })
	}

	/// Commits pending edits, closes the pane and returns the new active set.
	///
	/// Without an open pane there is nothing to commit and the active set is
	/// returned unchanged.
	pub fn save_filter_changes(&mut self) -> Vec<FilterValue> {
		if !self.is_open {
			tracing::debug!("filters.save_while_closed");
			return self.active.clone();
		}
		let pending = std::mem::take(&mut self.pending);
		self.set_active_filters(pending);
		self.is_open = false;
		self.active.clone()
	}

	/// Drops pending edits and closes the pane.
	pub fn cancel_filter_changes(&mut self) {
		self.pending.clear();
		self.is_open = false;
	}

	/// Removes every active (and pending) filter.
	pub fn clear_active_filters(&mut self) -> &[FilterValue] {
		self.active.clear();
		self.pending.clear();
		&self.active
	}

	/// Replaces the active filters.
	///
	/// Only the id and value of each entry are trusted: duplicates keep the
	/// first occurrence, and ids without an available descriptor or entries
	/// without a value are dropped.
	pub fn set_active_filters(&mut self, filters: Vec<FilterValue>) {
		self.active = dedup_by_id(&filters)
			.into_iter()
			.filter(|filter| {
				let known = self.descriptor(&filter.id).is_some();
				if !known {
					tracing::warn!(id = %filter.id, "filters.drop_unavailable");
				}
				known && !filter.value.is_empty()
			})
			.collect();
	}

	/// Rows for the filter panel: pending edits while open, active otherwise.
	pub fn panel_filters(&self) -> Vec<PanelFilter> {
		let shown = if self.is_open { &self.pending } else { &self.active };
		panel_filters(shown, &self.available)
	}
}
