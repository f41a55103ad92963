//! Immutable two-way index between unified records and their raw constituents.
//!
//! # Invariants
//!
//! - Referential consistency: `unified_of[r] == u` for every `r` in `members_of[u]`, and
//!   the reverse.
//!   - Enforced in: [`IndexBuilder::link`], [`IndexBuilder::finish`].
//!   - Tested by: `index::tests::builder_output_is_consistent`
//! - A raw record belongs to at most one group.
//!   - Enforced in: [`IndexBuilder::link`] (first link wins).
//!   - Tested by: `index::tests::second_link_for_raw_is_rejected`
//! - Every published group has at least one member.
//!   - Enforced in: [`IndexBuilder::finish`].

mod builder;
mod invariants;

use std::fmt;
use std::sync::Arc;

use contactsx_source::{ContactId, ContactRecord};
use rustc_hash::FxHashMap;

pub use builder::IndexBuilder;
pub use invariants::Inconsistency;

/// Snapshot of linked-contact membership.
///
/// Built once, never mutated. Rebuilds produce a new value.
#[derive(Clone, Default)]
pub struct LinkedIndex {
	/// Unified ids with at least one member, in unified-fetch order.
	pub(crate) order: Box<[ContactId]>,
	pub(crate) members_of: FxHashMap<ContactId, Box<[ContactId]>>,
	pub(crate) unified_of: FxHashMap<ContactId, ContactId>,
	pub(crate) unified: FxHashMap<ContactId, Arc<ContactRecord>>,
	pub(crate) raw: FxHashMap<ContactId, Arc<ContactRecord>>,
}

impl LinkedIndex {
	/// The unified id `raw` was merged into, if it is a known constituent.
	#[inline]
	pub fn unified_of(&self, raw: &str) -> Option<&ContactId> {
		self.unified_of.get(raw)
	}

	/// Constituents of `unified` in raw-fetch order. Empty for unknown ids.
	#[inline]
	pub fn members_of(&self, unified: &str) -> &[ContactId] {
		self.members_of.get(unified).map(|m| &**m).unwrap_or(&[])
	}

	/// The unified record for a unified id.
	pub fn unified_record(&self, unified: &str) -> Option<&Arc<ContactRecord>> {
		self.unified.get(unified)
	}

	/// The unified record `raw` was merged into.
	pub fn unified_record_of(&self, raw: &str) -> Option<&Arc<ContactRecord>> {
		self.unified_of(raw).and_then(|u| self.unified.get(u))
	}

	/// The raw record for a constituent id.
	pub fn raw_record(&self, raw: &str) -> Option<&Arc<ContactRecord>> {
		self.raw.get(raw)
	}

	/// Constituent records of `unified` in raw-fetch order.
	pub fn member_records<'a>(&'a self, unified: &str) -> impl Iterator<Item = &'a Arc<ContactRecord>> + 'a {
		self.members_of(unified).iter().filter_map(|r| self.raw.get(r))
	}

	/// Iterates `(unified, members)` in unified-fetch order.
	pub fn groups(&self) -> impl Iterator<Item = (&ContactId, &[ContactId])> + '_ {
		self.order.iter().map(|u| (u, self.members_of(u.as_str())))
	}

	/// Number of groups.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Number of linked raw records.
	pub fn raw_len(&self) -> usize {
		self.unified_of.len()
	}
}

/// Equal when both hold the same groups in the same order with the same members.
impl PartialEq for LinkedIndex {
	fn eq(&self, other: &Self) -> bool {
		self.order == other.order && self.groups().zip(other.groups()).all(|(a, b)| a == b)
	}
}

impl Eq for LinkedIndex {}

impl fmt::Debug for LinkedIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.groups()).finish()
	}
}

#[cfg(test)]
mod tests;
