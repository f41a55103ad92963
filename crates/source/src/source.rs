use std::sync::Arc;

use async_trait::async_trait;

use crate::{Authorization, ContactId, ContactRecord, SortOrder, SourceError};

/// Parameters of one whole-store fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
	/// Request the deduplicated view instead of per-source records.
	pub unify: bool,
	pub sort: SortOrder,
}

impl FetchRequest {
	pub const fn unified(sort: SortOrder) -> Self {
		Self { unify: true, sort }
	}

	pub const fn raw(sort: SortOrder) -> Self {
		Self { unify: false, sort }
	}
}

/// A contact store that can serve both the raw and the unified view.
///
/// Deduplication itself is the store's business; callers only consume the
/// identifier-level membership answers.
#[async_trait]
pub trait ContactSource: Send + Sync + 'static {
	/// Current read authorization.
	fn authorization(&self) -> Authorization;

	/// Prompts for access where the platform allows it and returns whether access is granted.
	async fn request_access(&self) -> bool {
		self.authorization().is_granted()
	}

	/// Fetches every contact in the requested view and order.
	async fn fetch_all(&self, request: FetchRequest) -> Result<Vec<ContactRecord>, SourceError>;

	/// Whether the raw record `raw` is one of the records merged into `unified`.
	fn is_subsumed_by(&self, raw: &ContactId, unified: &ContactId) -> bool;

	/// Whether [`ContactSource::unified_id_of`] answers directly.
	fn supports_direct_lookup(&self) -> bool {
		false
	}

	/// The unified record subsuming `raw`, if any.
	///
	/// Only meaningful when [`ContactSource::supports_direct_lookup`] is true.
	fn unified_id_of(&self, _raw: &ContactId) -> Option<ContactId> {
		None
	}
}

#[async_trait]
impl<S: ContactSource + ?Sized> ContactSource for Arc<S> {
	fn authorization(&self) -> Authorization {
		(**self).authorization()
	}

	async fn request_access(&self) -> bool {
		(**self).request_access().await
	}

	async fn fetch_all(&self, request: FetchRequest) -> Result<Vec<ContactRecord>, SourceError> {
		(**self).fetch_all(request).await
	}

	fn is_subsumed_by(&self, raw: &ContactId, unified: &ContactId) -> bool {
		(**self).is_subsumed_by(raw, unified)
	}

	fn supports_direct_lookup(&self) -> bool {
		(**self).supports_direct_lookup()
	}

	fn unified_id_of(&self, raw: &ContactId) -> Option<ContactId> {
		(**self).unified_id_of(raw)
	}
}
