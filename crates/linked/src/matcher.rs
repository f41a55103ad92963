//! Raw-to-unified membership decisions.
//!
//! Membership is decided purely by identifier through the store's own answers.
//! [`Matcher::Pairwise`] asks the store once per (unified, raw) pair and is kept
//! for stores that cannot answer per record; [`Matcher::Direct`] asks once per
//! raw record.

use contactsx_source::{ContactId, ContactSource};
use serde::{Deserialize, Serialize};

/// Configured preference for how membership is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
	/// Direct lookup when the store supports it, pairwise otherwise.
	#[default]
	Auto,
	Pairwise,
	Direct,
}

/// Resolved membership algorithm for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
	/// O(U·C): evaluates the store predicate for every pair.
	Pairwise,
	/// O(C): one store lookup per raw record.
	Direct,
}

impl Matcher {
	/// Picks the algorithm for `strategy` given what `source` supports.
	pub fn resolve<S: ContactSource + ?Sized>(strategy: MatchStrategy, source: &S) -> Self {
		let direct = source.supports_direct_lookup();
		match strategy {
			MatchStrategy::Pairwise => Self::Pairwise,
			MatchStrategy::Auto if direct => Self::Direct,
			MatchStrategy::Auto => Self::Pairwise,
			MatchStrategy::Direct if direct => Self::Direct,
			MatchStrategy::Direct => {
				tracing::warn!("direct membership lookup unsupported by contact source; using pairwise matching");
				Self::Pairwise
			}
		}
	}

	/// Whether `raw` is a constituent of `unified`.
	pub fn matches<S: ContactSource + ?Sized>(source: &S, unified: &ContactId, raw: &ContactId) -> bool {
		source.is_subsumed_by(raw, unified)
	}

	/// Finds the unified record subsuming `raw` among `unified`.
	///
	/// Pairwise takes the first match in `unified` order. Direct returns whatever
	/// the store names; callers must discard ids absent from their unified fetch.
	pub fn assign<S: ContactSource + ?Sized>(self, source: &S, unified: &[ContactId], raw: &ContactId) -> Option<ContactId> {
		match self {
			Self::Pairwise => unified.iter().find(|u| Self::matches(source, u, raw)).cloned(),
			Self::Direct => source.unified_id_of(raw),
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Pairwise => "pairwise",
			Self::Direct => "direct",
		}
	}
}
