//! Cooperatively cancellable async operations.
//!
//! A [`CancellableOperation`] pairs a provider future with a [`CancelHandle`].
//! The handle can be cloned out and stored (for instance in
//! [`InFlightRequests`](crate::InFlightRequests)) while the owner awaits
//! [`CancellableOperation::settle`]. Once cancelled, settling never yields the
//! provider's value, even if the provider finished in the same poll.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use lens_primitives::BoxFutureStatic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Boxed, thread-safe error produced by external providers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Reason recorded when cancel is requested without one.
const DEFAULT_CANCEL_REASON: &str = "cancelled";

/// Why an operation did not produce a value.
#[derive(Debug, Error)]
pub enum OperationError {
	/// The operation was cancelled before it settled.
	#[error("operation cancelled: {reason}")]
	Cancelled { reason: String },
	/// The provider future failed.
	#[error("operation failed: {0}")]
	Failed(#[source] BoxError),
}

impl OperationError {
	/// Returns true for cancellation.
	pub const fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled { .. })
	}
}

/// Shared cancel switch for one operation.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
	token: CancellationToken,
	reason: Arc<OnceLock<String>>,
}

impl CancelHandle {
	/// Creates an untriggered handle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests cancellation.
	///
	/// Idempotent: only the first call records its reason and returns `true`.
	pub fn cancel(&self, reason: impl Into<String>) -> bool {
		let first = self.reason.set(reason.into()).is_ok();
		self.token.cancel();
		first
	}

	/// Returns true once cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Returns the reason given to the first cancel call.
	pub fn reason(&self) -> Option<&str> {
		self.reason.get().map(String::as_str)
	}

	fn cancelled_error(&self) -> OperationError {
		OperationError::Cancelled {
			reason: self.reason().unwrap_or(DEFAULT_CANCEL_REASON).to_string(),
		}
	}
}

/// An async provider call that can be cancelled from elsewhere.
pub struct CancellableOperation<T> {
	future: BoxFutureStatic<Result<T, BoxError>>,
	handle: CancelHandle,
}

impl<T> fmt::Debug for CancellableOperation<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CancellableOperation").field("handle", &self.handle).finish_non_exhaustive()
	}
}

impl<T: Send + 'static> CancellableOperation<T> {
	/// Wraps a provider future.
	pub fn new<F>(future: F) -> Self
	where
		F: Future<Output = Result<T, BoxError>> + Send + 'static,
	{
		Self {
			future: Box::pin(future),
			handle: CancelHandle::new(),
		}
	}

	/// Returns a clone of the cancel switch.
	pub fn handle(&self) -> CancelHandle {
		self.handle.clone()
	}

	/// Requests cancellation. See [`CancelHandle::cancel`].
	pub fn cancel(&self, reason: impl Into<String>) -> bool {
		self.handle.cancel(reason)
	}

	/// Returns true once cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		self.handle.is_cancelled()
	}

	/// Drives the provider future to completion or cancellation.
	pub async fn settle(self) -> Result<T, OperationError> {
		let Self { future, handle } = self;
		if handle.is_cancelled() {
			return Err(handle.cancelled_error());
		}

		tokio::select! {
			biased;
			() = handle.token.cancelled() => Err(handle.cancelled_error()),
			result = future => {
				if handle.is_cancelled() {
					return Err(handle.cancelled_error());
				}
				result.map_err(OperationError::Failed)
			}
		}
	}
}
