/// Execution classes used for worker scheduling and log attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Async reads against a contact store. May be long-running on large stores.
	Fetch,
	/// CPU-bound index construction executed on the blocking pool.
	Merge,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Fetch => "fetch",
			Self::Merge => "merge",
		}
	}
}
