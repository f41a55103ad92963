//! Linked-contact discovery.
//!
//! # Purpose
//!
//! A contact store presents the same people two ways: raw records, one per
//! originating account, and unified records it has deduplicated from them. This
//! crate fetches both views and records which raw records were merged into which
//! unified record, so hosts can answer "which records make up this person" and
//! "which person does this record belong to" synchronously.
//!
//! # Mental model
//!
//! 1. **Build:** [`LinkedContacts::build_index`] checks access, runs the unified and raw
//!    fetches concurrently, waits for both, then links them on a blocking worker with a
//!    [`Matcher`] into a fresh [`LinkedIndex`].
//! 2. **Publication:** the finished index is swapped into place whole. Nothing is ever
//!    patched in place.
//! 3. **Consumption:** [`LinkedContacts::unified_of`] and [`LinkedContacts::members_of`]
//!    answer from the last published index, or [`DiscoveryError::IndexNotReady`] before
//!    the first one.
//!
//! # Key types
//!
//! | Type | Role |
//! |------|------|
//! | [`LinkedContacts`] | Service owning the published index and build state. |
//! | [`LinkedIndex`] | Immutable `unified -> members` / `raw -> unified` snapshot. |
//! | [`IndexBuilder`] | Per-build accumulator producing a [`LinkedIndex`]. |
//! | [`Matcher`] | Pairwise or direct membership resolution. |
//! | [`DiscoveryState`] | `NotStarted`, `InProgress`, `Ready`, `Failed`. |
//!
//! # Invariants
//!
//! - Must never publish a half-built index.
//!   - Enforced in: [`IndexBuilder::finish`] (build is local), `LinkedContacts::finish` (single swap).
//!   - Tested by: `tests/discovery.rs::readers_never_observe_torn_index`
//! - A failed build must not erase the prior index.
//!   - Enforced in: `LinkedContacts::finish`.
//!   - Tested by: `tests/discovery.rs::raw_fetch_failure_keeps_prior_index`
//! - At most one build runs at a time.
//!   - Enforced in: `LinkedContacts::begin`.
//!   - Tested by: `tests/discovery.rs::concurrent_build_is_rejected`

mod config;
mod discovery;
mod error;
mod index;
mod matcher;
mod pipeline;
mod state;

pub use config::{ConfigError, DiscoveryConfig};
pub use discovery::LinkedContacts;
pub use error::{DiscoveryError, FetchView};
pub use index::{Inconsistency, IndexBuilder, LinkedIndex};
pub use matcher::{MatchStrategy, Matcher};
pub use pipeline::link_records;
pub use state::DiscoveryState;
