//! Discovery service owning the published index and the build state machine.
//!
//! # Concurrency & ordering
//!
//! * Readers load the published [`LinkedIndex`] through `ArcSwapOption` and never lock.
//! * The phase mutex is the single serialization point for builds. It is held only
//!   for state transitions, never across an await.
//! * Publication and the `Ready` transition happen in one critical section, so a
//!   `Ready` state always carries the index readers see.
//! * A build request while another is running is rejected with
//!   [`DiscoveryError::BuildAlreadyInProgress`].

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use contactsx_source::{ContactId, ContactRecord, ContactSource};
use contactsx_worker::{GenerationClock, GenerationToken};
use parking_lot::Mutex;

use crate::{DiscoveryConfig, DiscoveryError, DiscoveryState, LinkedIndex, pipeline};

enum Phase {
	NotStarted,
	InProgress(GenerationToken),
	Ready,
	Failed(DiscoveryError),
}

/// Linked-contact discovery over one contact source.
pub struct LinkedContacts<S: ContactSource> {
	source: Arc<S>,
	config: DiscoveryConfig,
	published: ArcSwapOption<LinkedIndex>,
	phase: Mutex<Phase>,
	clock: GenerationClock,
}

impl<S: ContactSource> LinkedContacts<S> {
	pub fn new(source: Arc<S>, config: DiscoveryConfig) -> Self {
		Self {
			source,
			config,
			published: ArcSwapOption::empty(),
			phase: Mutex::new(Phase::NotStarted),
			clock: GenerationClock::new(),
		}
	}

	pub fn with_defaults(source: Arc<S>) -> Self {
		Self::new(source, DiscoveryConfig::default())
	}

	pub fn source(&self) -> &Arc<S> {
		&self.source
	}

	pub fn config(&self) -> &DiscoveryConfig {
		&self.config
	}

	/// Fetches both views, links them and publishes the result.
	///
	/// On failure the previously published index, if any, stays in place. Dropping
	/// the returned future before it resolves cancels the build.
	pub async fn build_index(&self) -> Result<Arc<LinkedIndex>, DiscoveryError> {
		let token = self.begin()?;
		let generation = token.generation();
		tracing::debug!(generation, "linked.build.start");

		let mut guard = BuildGuard {
			owner: self,
			token: token.clone(),
			armed: true,
		};
		let result = pipeline::build(self.source.clone(), &self.config, token).await;
		guard.armed = false;
		self.finish(generation, result)
	}

	/// Cancels the in-flight build. Returns false when none is running.
	pub fn cancel(&self) -> bool {
		match &*self.phase.lock() {
			Phase::InProgress(token) => {
				tracing::debug!(generation = token.generation(), "linked.build.cancel");
				token.cancel();
				true
			}
			_ => false,
		}
	}

	pub fn current_state(&self) -> DiscoveryState {
		let phase = self.phase.lock();
		match &*phase {
			Phase::NotStarted => DiscoveryState::NotStarted,
			Phase::InProgress(_) => DiscoveryState::InProgress,
			Phase::Ready => match self.published.load_full() {
				Some(index) => DiscoveryState::Ready(index),
				None => DiscoveryState::NotStarted,
			},
			Phase::Failed(err) => DiscoveryState::Failed(err.clone()),
		}
	}

	/// Whether any build has ever been published.
	pub fn is_discovered(&self) -> bool {
		self.published.load().is_some()
	}

	/// The currently published index.
	pub fn snapshot(&self) -> Option<Arc<LinkedIndex>> {
		self.published.load_full()
	}

	fn ready(&self) -> Result<Arc<LinkedIndex>, DiscoveryError> {
		self.snapshot().ok_or(DiscoveryError::IndexNotReady)
	}

	/// The unified id `raw` was merged into. `Ok(None)` when the index is ready but `raw` is not linked.
	pub fn unified_of(&self, raw: &str) -> Result<Option<ContactId>, DiscoveryError> {
		Ok(self.ready()?.unified_of(raw).cloned())
	}

	/// Constituents of `unified`. `Ok` and empty when the index is ready but `unified` is unknown.
	pub fn members_of(&self, unified: &str) -> Result<Vec<ContactId>, DiscoveryError> {
		Ok(self.ready()?.members_of(unified).to_vec())
	}

	/// The unified record `raw` was merged into.
	pub fn unified_record_of(&self, raw: &str) -> Result<Option<Arc<ContactRecord>>, DiscoveryError> {
		Ok(self.ready()?.unified_record_of(raw).cloned())
	}

	/// Constituent records of `unified` in raw-fetch order.
	pub fn member_records_of(&self, unified: &str) -> Result<Vec<Arc<ContactRecord>>, DiscoveryError> {
		Ok(self.ready()?.member_records(unified).cloned().collect())
	}

	fn begin(&self) -> Result<GenerationToken, DiscoveryError> {
		let mut phase = self.phase.lock();
		if let Phase::InProgress(running) = &*phase {
			tracing::debug!(running = running.generation(), "linked.build.rejected");
			return Err(DiscoveryError::BuildAlreadyInProgress);
		}
		let token = self.clock.issue();
		*phase = Phase::InProgress(token.clone());
		Ok(token)
	}

	fn finish(&self, generation: u64, result: Result<LinkedIndex, DiscoveryError>) -> Result<Arc<LinkedIndex>, DiscoveryError> {
		let mut phase = self.phase.lock();
		let current = matches!(&*phase, Phase::InProgress(t) if t.generation() == generation);
		match result {
			Ok(index) => {
				let index = Arc::new(index);
				if current {
					self.published.store(Some(index.clone()));
					*phase = Phase::Ready;
				}
				tracing::debug!(generation, groups = index.len(), linked = index.raw_len(), "linked.build.published");
				Ok(index)
			}
			Err(err) => {
				if current {
					*phase = Phase::Failed(err.clone());
				}
				tracing::warn!(generation, error = %err, retained = self.published.load().is_some(), "linked.build.failed");
				Err(err)
			}
		}
	}
}

/// Marks the build cancelled if its future is dropped before completion.
struct BuildGuard<'a, S: ContactSource> {
	owner: &'a LinkedContacts<S>,
	token: GenerationToken,
	armed: bool,
}

impl<S: ContactSource> Drop for BuildGuard<'_, S> {
	fn drop(&mut self) {
		if self.armed {
			self.token.cancel();
			let _ = self.owner.finish(self.token.generation(), Err(DiscoveryError::Cancelled));
		}
	}
}
