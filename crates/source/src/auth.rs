use serde::{Deserialize, Serialize};

/// Read authorization state for a contact store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Authorization {
	Authorized,
	Denied,
	/// Access is blocked by policy but may still be requested.
	Restricted,
	/// The user has not been asked yet.
	NotDetermined,
}

impl Authorization {
	pub const fn is_granted(self) -> bool {
		matches!(self, Self::Authorized)
	}

	/// Whether prompting the user could change the outcome.
	pub const fn is_requestable(self) -> bool {
		matches!(self, Self::Restricted | Self::NotDetermined)
	}
}
