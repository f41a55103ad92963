//! Contact store contract and record model.
//!
//! A [`ContactSource`] serves two views of the same data: raw records as stored
//! by each originating account, and unified records the store has deduplicated
//! from them. Identifier-level membership between the two is answered by the
//! store; nothing here compares fields.

mod auth;
mod error;
mod id;
mod memory;
mod record;
mod source;

pub use auth::Authorization;
pub use error::{HostErrorCode, SourceError};
pub use id::ContactId;
pub use memory::MemoryStore;
pub use record::{ContactPayload, ContactRecord, Labeled, PartialDate, SortOrder};
pub use source::{ContactSource, FetchRequest};
