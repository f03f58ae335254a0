use std::future::Future;
use std::pin::Pin;

/// A pinned, boxed future that is required to be Send and 'static.
///
/// Geocoder lookups hand these to the worker crate so cancellation can race
/// the provider future without borrowing the caller.
pub type BoxFutureStatic<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
