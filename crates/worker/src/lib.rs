//! Worker primitives shared by the contact discovery crates.
//!
//! Fetches run as [`TaskClass::Fetch`] tasks on the async runtime; index
//! construction runs as [`TaskClass::Merge`] on the blocking pool. Build attempts
//! are stamped and cancelled through [`GenerationToken`].

mod class;
mod join;
mod spawn;
mod token;

pub use class::TaskClass;
pub use join::{describe_join_error, join_error_panic_message};
pub use spawn::{spawn, spawn_blocking};
pub use token::{GenerationClock, GenerationToken};
