//! In-memory contact store.
//!
//! Raw records are kept in insertion order. Link groups stand in for the
//! platform's deduplication: every group becomes one unified record whose
//! constituents are exactly the raws linked into it.

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Authorization, ContactId, ContactPayload, ContactRecord, ContactSource, FetchRequest, SourceError};

struct LinkGroup {
	unified: ContactId,
	members: Vec<ContactId>,
}

struct Inner {
	authorization: Authorization,
	grant_on_request: bool,
	raw: Vec<ContactRecord>,
	groups: Vec<LinkGroup>,
	group_pos: FxHashMap<ContactId, usize>,
	owner: FxHashMap<ContactId, ContactId>,
}

/// Contact store backed by process memory. Supports direct per-record lookup.
pub struct MemoryStore {
	inner: RwLock<Inner>,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	/// Creates an empty, authorized store.
	pub fn new() -> Self {
		Self {
			inner: RwLock::new(Inner {
				authorization: Authorization::Authorized,
				grant_on_request: false,
				raw: Vec::new(),
				groups: Vec::new(),
				group_pos: FxHashMap::default(),
				owner: FxHashMap::default(),
			}),
		}
	}

	pub fn with_authorization(self, authorization: Authorization) -> Self {
		self.set_authorization(authorization);
		self
	}

	pub fn set_authorization(&self, authorization: Authorization) {
		self.inner.write().authorization = authorization;
	}

	/// Whether [`ContactSource::request_access`] grants a requestable authorization.
	pub fn set_grant_on_request(&self, grant: bool) {
		self.inner.write().grant_on_request = grant;
	}

	/// Inserts a raw record, replacing any record with the same id in place.
	pub fn insert(&self, record: ContactRecord) {
		let mut inner = self.inner.write();
		match inner.raw.iter_mut().find(|r| r.id == record.id) {
			Some(slot) => *slot = record,
			None => inner.raw.push(record),
		}
	}

	/// Removes a raw record and its link, if any.
	pub fn remove(&self, raw: &ContactId) -> Option<ContactRecord> {
		let mut inner = self.inner.write();
		let pos = inner.raw.iter().position(|r| &r.id == raw)?;
		inner.unlink(raw);
		Some(inner.raw.remove(pos))
	}

	/// Links `raws` into the unified record `unified`, creating the group on first use.
	///
	/// A raw already linked to another group is moved; a raw belongs to at most one group.
	pub fn link(&self, unified: impl Into<ContactId>, raws: &[&str]) {
		let unified = unified.into();
		let mut guard = self.inner.write();
		let inner = &mut *guard;
		let idx = match inner.group_pos.get(&unified).copied() {
			Some(idx) => idx,
			None => {
				inner.groups.push(LinkGroup {
					unified: unified.clone(),
					members: Vec::new(),
				});
				inner.group_pos.insert(unified.clone(), inner.groups.len() - 1);
				inner.groups.len() - 1
			}
		};

		for raw in raws {
			let raw = ContactId::new(raw);
			if inner.owner.get(&raw) == Some(&unified) {
				continue;
			}
			inner.unlink(&raw);
			inner.groups[idx].members.push(raw.clone());
			inner.owner.insert(raw, unified.clone());
		}
	}

	/// Detaches a raw record from its group.
	pub fn unlink(&self, raw: &ContactId) -> bool {
		self.inner.write().unlink(raw)
	}

	pub fn raw_len(&self) -> usize {
		self.inner.read().raw.len()
	}
}

impl Inner {
	fn unlink(&mut self, raw: &ContactId) -> bool {
		let Some(prev) = self.owner.remove(raw) else {
			return false;
		};
		if let Some(&idx) = self.group_pos.get(&prev) {
			self.groups[idx].members.retain(|m| m != raw);
		}
		true
	}

	fn unified_records(&self) -> Vec<ContactRecord> {
		let by_id: FxHashMap<&ContactId, &ContactRecord> = self.raw.iter().map(|r| (&r.id, r)).collect();
		self.groups
			.iter()
			.filter_map(|group| {
				let members: Vec<&ContactRecord> = group.members.iter().filter_map(|m| by_id.get(m).copied()).collect();
				if members.is_empty() {
					return None;
				}
				Some(ContactRecord {
					id: group.unified.clone(),
					payload: merge_payloads(&members),
				})
			})
			.collect()
	}
}

fn merge_payloads(members: &[&ContactRecord]) -> ContactPayload {
	let named = members.iter().find(|m| !m.payload.is_unnamed()).unwrap_or(&members[0]);
	let mut out = ContactPayload {
		given_name: named.payload.given_name.clone(),
		middle_name: named.payload.middle_name.clone(),
		family_name: named.payload.family_name.clone(),
		name_prefix: named.payload.name_prefix.clone(),
		name_suffix: named.payload.name_suffix.clone(),
		..ContactPayload::default()
	};

	for m in members {
		let p = &m.payload;
		if out.organization_name.is_empty() {
			out.organization_name = p.organization_name.clone();
		}
		if out.job_title.is_empty() {
			out.job_title = p.job_title.clone();
		}
		if out.birthday.is_none() {
			out.birthday = p.birthday;
		}
		if out.thumbnail.is_none() {
			out.thumbnail = p.thumbnail.clone();
		}
		out.image_data_available |= p.image_data_available;
		for phone in &p.phone_numbers {
			if !out.phone_numbers.iter().any(|x| x.value == phone.value) {
				out.phone_numbers.push(phone.clone());
			}
		}
		for email in &p.email_addresses {
			if !out.email_addresses.iter().any(|x| x.value.eq_ignore_ascii_case(&email.value)) {
				out.email_addresses.push(email.clone());
			}
		}
		for date in &p.dates {
			if !out.dates.contains(date) {
				out.dates.push(date.clone());
			}
		}
	}
	out
}

#[async_trait]
impl ContactSource for MemoryStore {
	fn authorization(&self) -> Authorization {
		self.inner.read().authorization
	}

	async fn request_access(&self) -> bool {
		let mut inner = self.inner.write();
		if inner.grant_on_request && inner.authorization.is_requestable() {
			inner.authorization = Authorization::Authorized;
		}
		inner.authorization.is_granted()
	}

	async fn fetch_all(&self, request: FetchRequest) -> Result<Vec<ContactRecord>, SourceError> {
		let inner = self.inner.read();
		if !inner.authorization.is_granted() {
			return Err(SourceError::PermissionDenied);
		}
		let mut records = if request.unify {
			inner.unified_records()
		} else {
			inner.raw.clone()
		};
		drop(inner);
		request.sort.sort(&mut records);
		tracing::trace!(unify = request.unify, sort = ?request.sort, count = records.len(), "memory_store.fetch_all");
		Ok(records)
	}

	fn is_subsumed_by(&self, raw: &ContactId, unified: &ContactId) -> bool {
		self.inner.read().owner.get(raw) == Some(unified)
	}

	fn supports_direct_lookup(&self) -> bool {
		true
	}

	fn unified_id_of(&self, raw: &ContactId) -> Option<ContactId> {
		self.inner.read().owner.get(raw).cloned()
	}
}
