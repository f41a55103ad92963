use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for successive build attempts.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns a fresh token stamped with the next generation.
	pub fn issue(&self) -> GenerationToken {
		GenerationToken::new(self.next(), CancellationToken::new())
	}
}

/// Generation-scoped cancellation token for one build attempt.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Creates a new generation token.
	pub fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// Creates a child token in the same generation.
	///
	/// Cancelling the parent cancels the child; the reverse does not hold.
	pub fn child(&self) -> Self {
		Self {
			generation: self.generation,
			cancel: self.cancel.child_token(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generations_are_monotonic() {
		let clock = GenerationClock::new();
		assert_eq!(clock.next(), 1);
		assert_eq!(clock.issue().generation(), 2);
		assert_eq!(clock.clone().next(), 3);
	}

	#[test]
	fn parent_cancel_reaches_child() {
		let parent = GenerationClock::new().issue();
		let child = parent.child();
		assert_eq!(child.generation(), parent.generation());

		child.cancel();
		assert!(!parent.is_cancelled());

		let sibling = parent.child();
		parent.cancel();
		assert!(sibling.is_cancelled());
	}
}
