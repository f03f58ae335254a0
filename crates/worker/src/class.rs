/// Execution classes used to tag spawned coordinator work in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Keystroke-driven work whose result is only useful while it is the latest.
	Interactive,
	/// Searches and follow-up work that may outlive the triggering event.
	Background,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
		}
	}
}
