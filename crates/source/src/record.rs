use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ContactId;

/// A contact entry as returned by one fetch, raw or unified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
	pub id: ContactId,
	#[serde(default)]
	pub payload: ContactPayload,
}

impl ContactRecord {
	pub fn new(id: impl Into<ContactId>) -> Self {
		Self {
			id: id.into(),
			payload: ContactPayload::default(),
		}
	}

	/// Sets given and family name.
	pub fn named(mut self, given: &str, family: &str) -> Self {
		self.payload.given_name = given.to_string();
		self.payload.family_name = family.to_string();
		self
	}

	pub fn with_phone(mut self, label: &str, value: &str) -> Self {
		self.payload.phone_numbers.push(Labeled::new(label, value));
		self
	}

	pub fn with_email(mut self, label: &str, value: &str) -> Self {
		self.payload.email_addresses.push(Labeled::new(label, value));
		self
	}
}

/// Attribute payload carried through discovery untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactPayload {
	pub given_name: String,
	pub middle_name: String,
	pub family_name: String,
	pub name_prefix: String,
	pub name_suffix: String,
	pub organization_name: String,
	pub job_title: String,
	pub birthday: Option<PartialDate>,
	pub dates: Vec<Labeled<PartialDate>>,
	pub phone_numbers: Vec<Labeled<String>>,
	pub email_addresses: Vec<Labeled<String>>,
	pub image_data_available: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub thumbnail: Option<Vec<u8>>,
}

impl ContactPayload {
	/// Returns true when neither given nor family name is set.
	pub fn is_unnamed(&self) -> bool {
		self.given_name.is_empty() && self.family_name.is_empty()
	}
}

/// Calendar date where any component may be absent (e.g. a birthday without year).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
	pub year: Option<i32>,
	pub month: Option<u8>,
	pub day: Option<u8>,
}

/// A value with a store-provided label such as `home` or `mobile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeled<T> {
	pub label: String,
	pub value: T,
}

impl<T> Labeled<T> {
	pub fn new(label: &str, value: impl Into<T>) -> Self {
		Self {
			label: label.to_string(),
			value: value.into(),
		}
	}
}

/// Ordering applied to fetch results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
	/// Store order.
	None,
	#[default]
	GivenName,
	FamilyName,
}

impl SortOrder {
	/// Sorts records in place. Stable, so records with equal keys keep store order.
	pub fn sort(self, records: &mut [ContactRecord]) {
		match self {
			Self::None => {}
			Self::GivenName => records.sort_by(|a, b| a.payload.given_name.cmp(&b.payload.given_name)),
			Self::FamilyName => records.sort_by(|a, b| a.payload.family_name.cmp(&b.payload.family_name)),
		}
	}

	/// Compares two records under this order.
	pub fn compare(self, a: &ContactRecord, b: &ContactRecord) -> Ordering {
		match self {
			Self::None => Ordering::Equal,
			Self::GivenName => a.payload.given_name.cmp(&b.payload.given_name),
			Self::FamilyName => a.payload.family_name.cmp(&b.payload.family_name),
		}
	}
}
