use contactsx_source::ContactId;

use super::LinkedIndex;

/// A violated index invariant, as reported by [`LinkedIndex::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
	#[error("member {raw} of {unified} maps back to {found:?}")]
	MemberNotBackLinked {
		unified: ContactId,
		raw: ContactId,
		found: Option<ContactId>,
	},

	#[error("{raw} maps to {unified} but is not among its members")]
	BackLinkWithoutMember { raw: ContactId, unified: ContactId },

	#[error("{raw} appears {count} times across groups")]
	DuplicateMember { raw: ContactId, count: usize },

	#[error("group {unified} has no members")]
	EmptyGroup { unified: ContactId },

	#[error("group order lists {listed} groups but {stored} are stored")]
	OrderMismatch { listed: usize, stored: usize },
}

impl LinkedIndex {
	/// Verifies the two lookup directions agree.
	pub fn check_consistency(&self) -> Result<(), Inconsistency> {
		if self.order.len() != self.members_of.len() {
			return Err(Inconsistency::OrderMismatch {
				listed: self.order.len(),
				stored: self.members_of.len(),
			});
		}

		for (unified, members) in self.groups() {
			if members.is_empty() {
				return Err(Inconsistency::EmptyGroup { unified: unified.clone() });
			}
			for raw in members {
				let found = self.unified_of.get(raw);
				if found != Some(unified) {
					return Err(Inconsistency::MemberNotBackLinked {
						unified: unified.clone(),
						raw: raw.clone(),
						found: found.cloned(),
					});
				}
			}
		}

		for (raw, unified) in &self.unified_of {
			let count = self.members_of(unified.as_str()).iter().filter(|m| *m == raw).count();
			match count {
				0 => {
					return Err(Inconsistency::BackLinkWithoutMember {
						raw: raw.clone(),
						unified: unified.clone(),
					});
				}
				1 => {}
				count => {
					return Err(Inconsistency::DuplicateMember { raw: raw.clone(), count });
				}
			}
		}

		Ok(())
	}
}
