//! Publishing decided categories to a remote store.
//!
//! The [`Publisher`] performs one write per call and hands any failure back
//! to the caller; it never retries and never panics on a sink error.

mod firebase;
mod memory;
mod record;
mod sink;

pub use firebase::{CONNECTION_CHECK_VALUE, FirebaseSink};
pub use memory::{MemorySink, SinkWrite};
pub use record::PublishRecord;
pub use sink::{Publisher, Sink, WriteMode};
