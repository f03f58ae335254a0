//! Request fencing, cancellation and task spawning primitives.
//!
//! Coordinators combine a [`RequestFence`] with [`InFlightRequests`] so only
//! the most recently issued lookup can ever deliver a result.

mod class;
mod fence;
mod inflight;
mod operation;
mod spawn;

pub use class::TaskClass;
pub use fence::{RequestFence, RequestToken};
pub use inflight::{InFlightRequest, InFlightRequests};
pub use operation::{BoxError, CancelHandle, CancellableOperation, OperationError};
pub use spawn::spawn;
