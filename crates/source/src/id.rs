use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Source-assigned contact identifier.
///
/// Stable across fetches of the same store. Cloning is a reference-count bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(Arc<str>);

impl ContactId {
	pub fn new(id: impl AsRef<str>) -> Self {
		Self(Arc::from(id.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for ContactId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl fmt::Display for ContactId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for ContactId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for ContactId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Serialize for ContactId {
	fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
		ser.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for ContactId {
	fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
		String::deserialize(de).map(Self::from)
	}
}

impl From<&str> for ContactId {
	fn from(s: &str) -> Self {
		Self::new(s)
	}
}

impl From<String> for ContactId {
	fn from(s: String) -> Self {
		Self(Arc::from(s))
	}
}

#[cfg(test)]
mod tests {
	use rustc_hash::FxHashMap;

	use super::*;

	#[test]
	fn map_lookup_by_str() {
		let mut map = FxHashMap::default();
		map.insert(ContactId::new("R1"), 1);
		assert_eq!(map.get("R1"), Some(&1));
		assert_eq!(map.get("R2"), None);
	}

	#[test]
	fn serializes_as_plain_string() {
		let json = serde_json::to_string(&ContactId::new("abc")).unwrap();
		assert_eq!(json, "\"abc\"");
		let back: ContactId = serde_json::from_str(&json).unwrap();
		assert_eq!(back.as_str(), "abc");
	}
}
