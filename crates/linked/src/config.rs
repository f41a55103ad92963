use std::path::{Path, PathBuf};
use std::time::Duration;

use contactsx_source::SortOrder;
use serde::{Deserialize, Serialize};

use crate::MatchStrategy;

/// Errors from loading a [`DiscoveryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	#[error("invalid discovery config: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Tunables for linked-contact discovery.
///
/// ```toml
/// sort-order = "family-name"
/// strategy = "direct"
/// fetch-timeout-ms = 30000
/// request-access = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DiscoveryConfig {
	/// Order requested for both fetches.
	pub sort_order: SortOrder,
	pub strategy: MatchStrategy,
	/// Applied to each fetch independently. `None` waits indefinitely.
	#[serde(rename = "fetch-timeout-ms", with = "millis", skip_serializing_if = "Option::is_none")]
	pub fetch_timeout: Option<Duration>,
	/// Prompt for access when authorization is not yet determined or restricted.
	pub request_access: bool,
}

impl Default for DiscoveryConfig {
	fn default() -> Self {
		Self {
			sort_order: SortOrder::GivenName,
			strategy: MatchStrategy::Auto,
			fetch_timeout: None,
			request_access: false,
		}
	}
}

impl DiscoveryConfig {
	/// Parses a TOML document.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Loads configuration from a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
		self.fetch_timeout = Some(timeout);
		self
	}

	pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
		self.strategy = strategy;
		self
	}

	pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
		self.sort_order = sort_order;
		self
	}

	pub fn with_request_access(mut self, on: bool) -> Self {
		self.request_access = on;
		self
	}
}

mod millis {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &Option<Duration>, ser: S) -> Result<S::Ok, S::Error> {
		match value {
			Some(d) => ser.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
			None => ser.serialize_none(),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
		Ok(Option::<u64>::deserialize(de)?.map(Duration::from_millis))
	}
}
