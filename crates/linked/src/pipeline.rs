//! One build attempt: access check, two concurrent fetches, merge.
//!
//! Both fetches always run to completion (or cancellation) before anything is
//! merged. Their results never meet unless both succeeded.

use std::sync::Arc;
use std::time::Duration;

use contactsx_source::{ContactRecord, ContactSource, FetchRequest, SortOrder};
use contactsx_worker::{GenerationToken, TaskClass};
use tokio::task::JoinHandle;

use crate::{DiscoveryConfig, DiscoveryError, FetchView, IndexBuilder, LinkedIndex, Matcher};

type FetchResult = Result<Vec<ContactRecord>, DiscoveryError>;

/// Runs one complete build against `source`.
pub(crate) async fn build<S: ContactSource>(
	source: Arc<S>,
	config: &DiscoveryConfig,
	token: GenerationToken,
) -> Result<LinkedIndex, DiscoveryError> {
	ensure_access(&*source, config.request_access).await?;

	let unified = spawn_fetch(source.clone(), FetchView::Unified, config.sort_order, config.fetch_timeout, token.child());
	let raw = spawn_fetch(source.clone(), FetchView::Raw, config.sort_order, config.fetch_timeout, token.child());
	let (unified, raw) = tokio::join!(unified, raw);
	let (unified, raw) = (settle(unified)?, settle(raw)?);

	if token.is_cancelled() {
		return Err(DiscoveryError::Cancelled);
	}

	let matcher = Matcher::resolve(config.strategy, &*source);
	tracing::debug!(
		generation = token.generation(),
		unified = unified.len(),
		raw = raw.len(),
		matcher = matcher.as_str(),
		"linked.merge"
	);
	let index = contactsx_worker::spawn_blocking(TaskClass::Merge, move || link_records(matcher, &*source, unified, raw))
		.await
		.map_err(|e| DiscoveryError::Worker {
			message: contactsx_worker::describe_join_error(e),
		})?;

	if token.is_cancelled() {
		return Err(DiscoveryError::Cancelled);
	}
	Ok(index)
}

/// Groups `raw` under the `unified` records that subsume them.
///
/// Raw records no unified record claims are left out. Group order follows
/// `unified`; member order follows `raw`.
pub fn link_records<S: ContactSource + ?Sized>(
	matcher: Matcher,
	source: &S,
	unified: Vec<ContactRecord>,
	raw: Vec<ContactRecord>,
) -> LinkedIndex {
	let mut builder = IndexBuilder::with_capacity(unified.len(), raw.len());
	for record in unified {
		builder.add_unified(record);
	}

	let targets = builder.unified_ids().to_vec();
	let mut unlinked = 0usize;
	for record in raw {
		match matcher.assign(source, &targets, &record.id) {
			Some(unified) => {
				if !builder.link(&unified, record) {
					unlinked += 1;
				}
			}
			None => unlinked += 1,
		}
	}

	let rejected = builder.rejected();
	let index = builder.finish();
	tracing::debug!(groups = index.len(), linked = index.raw_len(), unlinked, rejected, "linked.index.built");
	index
}

async fn ensure_access<S: ContactSource + ?Sized>(source: &S, request: bool) -> Result<(), DiscoveryError> {
	let status = source.authorization();
	if status.is_granted() {
		return Ok(());
	}
	if request && status.is_requestable() && source.request_access().await {
		return Ok(());
	}
	tracing::debug!(?status, request, "contact access not granted; skipping fetch");
	Err(DiscoveryError::PermissionDenied)
}

fn spawn_fetch<S: ContactSource>(
	source: Arc<S>,
	view: FetchView,
	sort: SortOrder,
	timeout: Option<Duration>,
	token: GenerationToken,
) -> JoinHandle<FetchResult> {
	let request = FetchRequest { unify: view.unify(), sort };
	contactsx_worker::spawn(TaskClass::Fetch, async move {
		let fetch = async {
			let fut = source.fetch_all(request);
			match timeout {
				Some(after) => match tokio::time::timeout(after, fut).await {
					Ok(res) => res.map_err(|e| DiscoveryError::fetch(view, e)),
					Err(_) => Err(DiscoveryError::FetchTimedOut { view, after }),
				},
				None => fut.await.map_err(|e| DiscoveryError::fetch(view, e)),
			}
		};
		tokio::select! {
			biased;
			_ = token.cancelled() => Err(DiscoveryError::Cancelled),
			res = fetch => res,
		}
	})
}

fn settle(joined: Result<FetchResult, tokio::task::JoinError>) -> FetchResult {
	match joined {
		Ok(res) => res,
		Err(e) if e.is_cancelled() => Err(DiscoveryError::Cancelled),
		Err(e) => Err(DiscoveryError::Worker {
			message: contactsx_worker::describe_join_error(e),
		}),
	}
}

#[cfg(test)]
mod tests {
	use contactsx_source::{ContactId, MemoryStore};
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	fn ids(v: &[ContactId]) -> Vec<&str> {
		v.iter().map(ContactId::as_str).collect()
	}

	#[rstest]
	#[case(Matcher::Pairwise)]
	#[case(Matcher::Direct)]
	fn groups_follow_fetch_order(#[case] matcher: Matcher) {
		let store = MemoryStore::new();
		store.link("U1", &["R1", "R3"]);
		store.link("U2", &["R2"]);
		let unified = vec![ContactRecord::new("U2"), ContactRecord::new("U1")];
		let raw = vec![ContactRecord::new("R3"), ContactRecord::new("R2"), ContactRecord::new("R1"), ContactRecord::new("R4")];

		let index = link_records(matcher, &store, unified, raw);
		let groups: Vec<(&str, Vec<&str>)> = index.groups().map(|(u, m)| (u.as_str(), ids(m))).collect();
		assert_eq!(groups, vec![("U2", vec!["R2"]), ("U1", vec!["R3", "R1"])]);
		assert_eq!(index.unified_of("R4"), None);
	}

	#[test]
	fn direct_lookup_outside_unified_fetch_is_ignored() {
		let store = MemoryStore::new();
		store.link("U1", &["R1"]);
		store.link("U2", &["R2"]);
		let unified = vec![ContactRecord::new("U1")];
		let raw = vec![ContactRecord::new("R1"), ContactRecord::new("R2")];

		let direct = link_records(Matcher::Direct, &store, unified.clone(), raw.clone());
		let pairwise = link_records(Matcher::Pairwise, &store, unified, raw);
		assert_eq!(direct, pairwise);
		assert_eq!(direct.unified_of("R2"), None);
	}
}
