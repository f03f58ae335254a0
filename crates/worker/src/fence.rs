use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one issued request.
///
/// Tokens are issued in strictly increasing order and never reused by the
/// fence that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
	/// Returns the raw sequence number.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for RequestToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Latest-request fence.
///
/// Exactly one token is current at any time: the one most recently returned by
/// [`RequestFence::issue`]. Work started under an older token must discard its
/// result.
#[derive(Debug, Default)]
pub struct RequestFence {
	current: AtomicU64,
}

impl RequestFence {
	/// Creates a fence with no issued tokens.
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a new token and makes it current.
	pub fn issue(&self) -> RequestToken {
		RequestToken(self.current.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
	}

	/// Returns true if `token` is still the latest issued token.
	pub fn is_current(&self, token: RequestToken) -> bool {
		self.current.load(Ordering::Acquire) == token.0
	}

	/// Returns the current token, if any has been issued.
	pub fn current(&self) -> Option<RequestToken> {
		match self.current.load(Ordering::Acquire) {
			0 => None,
			n => Some(RequestToken(n)),
		}
	}
}
