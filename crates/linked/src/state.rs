use std::sync::Arc;

use crate::{DiscoveryError, LinkedIndex};

/// Observable discovery lifecycle.
///
/// `Failed` does not imply queries fail: the last successfully published index,
/// if any, keeps answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryState {
	NotStarted,
	InProgress,
	Ready(Arc<LinkedIndex>),
	Failed(DiscoveryError),
}

impl DiscoveryState {
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::NotStarted => "not_started",
			Self::InProgress => "in_progress",
			Self::Ready(_) => "ready",
			Self::Failed(_) => "failed",
		}
	}

	pub const fn is_ready(&self) -> bool {
		matches!(self, Self::Ready(_))
	}

	pub const fn is_in_progress(&self) -> bool {
		matches!(self, Self::InProgress)
	}

	pub fn error(&self) -> Option<&DiscoveryError> {
		match self {
			Self::Failed(e) => Some(e),
			_ => None,
		}
	}
}
