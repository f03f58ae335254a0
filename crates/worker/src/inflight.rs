use crate::{CancelHandle, RequestToken};

/// One outstanding lookup tracked by its issuing token.
#[derive(Debug, Clone)]
pub struct InFlightRequest {
	pub token: RequestToken,
	pub handle: CancelHandle,
}

/// Ordered set of outstanding lookups.
///
/// Requests enter on start and leave when they settle or are superseded.
#[derive(Debug, Default)]
pub struct InFlightRequests {
	entries: Vec<InFlightRequest>,
}

impl InFlightRequests {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a newly started request.
	pub fn push(&mut self, token: RequestToken, handle: CancelHandle) {
		self.entries.push(InFlightRequest { token, handle });
	}

	/// Cancels and evicts every request issued before `current`.
	///
	/// Returns the number of requests this call cancelled; entries that were
	/// already cancelled are evicted without being counted.
	pub fn cancel_superseded(&mut self, current: RequestToken, reason: &str) -> usize {
		let mut cancelled = 0;
		self.entries.retain(|entry| {
			if entry.token >= current {
				return true;
			}
			if !entry.handle.is_cancelled() && entry.handle.cancel(reason) {
				cancelled += 1;
			}
			false
		});
		cancelled
	}

	/// Removes the request issued under `token`, if still tracked.
	pub fn remove(&mut self, token: RequestToken) -> Option<InFlightRequest> {
		let index = self.entries.iter().position(|entry| entry.token == token)?;
		Some(self.entries.remove(index))
	}

	/// Returns true if a request for `token` is tracked.
	pub fn contains(&self, token: RequestToken) -> bool {
		self.entries.iter().any(|entry| entry.token == token)
	}

	/// Number of tracked requests.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when nothing is outstanding.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
