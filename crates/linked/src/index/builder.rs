use std::sync::Arc;

use contactsx_source::{ContactId, ContactRecord};
use rustc_hash::FxHashMap;

use super::LinkedIndex;

/// Accumulates links for one build. Owned exclusively by the build that creates it.
#[derive(Default)]
pub struct IndexBuilder {
	order: Vec<ContactId>,
	members_of: FxHashMap<ContactId, Vec<ContactId>>,
	unified_of: FxHashMap<ContactId, ContactId>,
	unified: FxHashMap<ContactId, Arc<ContactRecord>>,
	raw: FxHashMap<ContactId, Arc<ContactRecord>>,
	rejected: usize,
}

impl IndexBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(unified: usize, raw: usize) -> Self {
		Self {
			order: Vec::with_capacity(unified),
			members_of: FxHashMap::with_capacity_and_hasher(unified, Default::default()),
			unified_of: FxHashMap::with_capacity_and_hasher(raw, Default::default()),
			unified: FxHashMap::with_capacity_and_hasher(unified, Default::default()),
			raw: FxHashMap::with_capacity_and_hasher(raw, Default::default()),
			rejected: 0,
		}
	}

	/// Registers a unified record as a link target. Returns false for a repeated id.
	pub fn add_unified(&mut self, record: ContactRecord) -> bool {
		if self.unified.contains_key(&record.id) {
			tracing::warn!(unified = %record.id, "duplicate unified id in fetch; keeping first");
			return false;
		}
		self.order.push(record.id.clone());
		self.unified.insert(record.id.clone(), Arc::new(record));
		true
	}

	/// Registered unified ids in insertion order.
	pub fn unified_ids(&self) -> &[ContactId] {
		&self.order
	}

	/// Links `raw` into `unified`.
	///
	/// Returns false, leaving the builder unchanged, when `unified` was never
	/// registered or `raw` is already linked.
	pub fn link(&mut self, unified: &ContactId, raw: ContactRecord) -> bool {
		if !self.unified.contains_key(unified) {
			tracing::debug!(%unified, raw = %raw.id, "link target not in unified fetch; raw excluded");
			return false;
		}
		if let Some(existing) = self.unified_of.get(&raw.id) {
			tracing::warn!(raw = %raw.id, %existing, rejected = %unified, "raw record already linked; keeping first");
			self.rejected += 1;
			return false;
		}
		self.unified_of.insert(raw.id.clone(), unified.clone());
		self.members_of.entry(unified.clone()).or_default().push(raw.id.clone());
		self.raw.insert(raw.id.clone(), Arc::new(raw));
		true
	}

	/// Count of links refused because the raw record was already linked.
	pub fn rejected(&self) -> usize {
		self.rejected
	}

	/// Freezes the builder. Unified records that gained no members are left out.
	pub fn finish(self) -> LinkedIndex {
		let Self {
			order,
			members_of,
			unified_of,
			mut unified,
			raw,
			..
		} = self;

		let order: Box<[ContactId]> = order.into_iter().filter(|u| members_of.contains_key(u)).collect();
		unified.retain(|u, _| members_of.contains_key(u));
		let members_of = members_of.into_iter().map(|(u, m)| (u, m.into_boxed_slice())).collect();

		let index = LinkedIndex {
			order,
			members_of,
			unified_of,
			unified,
			raw,
		};
		debug_assert_eq!(index.check_consistency(), Ok(()));
		index
	}
}
