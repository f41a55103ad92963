/// Numeric codes reported to the host bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HostErrorCode {
	UnsupportedAction = 1,
	WrongJsonObject = 2,
	PermissionDenied = 3,
	UnknownError = 10,
	NoContainers = 20,
}

impl HostErrorCode {
	pub const fn as_u8(self) -> u8 {
		self as u8
	}
}

/// Errors surfaced by a contact store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
	#[error("contact store access denied")]
	PermissionDenied,

	#[error("contact store has no containers")]
	NoContainers,

	#[error("unsupported store action: {action}")]
	Unsupported { action: &'static str },

	#[error("contact store failure: {message}")]
	Store { message: String },
}

impl SourceError {
	pub fn store(message: impl Into<String>) -> Self {
		Self::Store { message: message.into() }
	}

	pub const fn code(&self) -> HostErrorCode {
		match self {
			Self::PermissionDenied => HostErrorCode::PermissionDenied,
			Self::NoContainers => HostErrorCode::NoContainers,
			Self::Unsupported { .. } => HostErrorCode::UnsupportedAction,
			Self::Store { .. } => HostErrorCode::UnknownError,
		}
	}
}
