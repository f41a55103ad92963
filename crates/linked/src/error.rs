use std::fmt;
use std::time::Duration;

use contactsx_source::{HostErrorCode, SourceError};

/// Which of the two fetches a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchView {
	Unified,
	Raw,
}

impl FetchView {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Unified => "unified",
			Self::Raw => "raw",
		}
	}

	pub const fn unify(self) -> bool {
		matches!(self, Self::Unified)
	}
}

impl fmt::Display for FetchView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors from building or querying the linked index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
	#[error("contact access not granted")]
	PermissionDenied,

	#[error("{view} contact fetch failed: {source}")]
	SourceFetchFailed { view: FetchView, source: SourceError },

	#[error("{view} contact fetch timed out after {after:?}")]
	FetchTimedOut { view: FetchView, after: Duration },

	#[error("linked contact discovery already in progress")]
	BuildAlreadyInProgress,

	#[error("linked contact discovery cancelled")]
	Cancelled,

	#[error("linked contacts not discovered yet")]
	IndexNotReady,

	#[error("discovery worker failed: {message}")]
	Worker { message: String },
}

impl DiscoveryError {
	pub(crate) fn fetch(view: FetchView, source: SourceError) -> Self {
		match source {
			SourceError::PermissionDenied => Self::PermissionDenied,
			source => Self::SourceFetchFailed { view, source },
		}
	}

	/// Code reported to the host bridge.
	pub const fn code(&self) -> HostErrorCode {
		match self {
			Self::PermissionDenied => HostErrorCode::PermissionDenied,
			Self::SourceFetchFailed { source, .. } => source.code(),
			_ => HostErrorCode::UnknownError,
		}
	}
}
