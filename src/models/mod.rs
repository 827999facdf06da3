//! Core data models: fetched entries, summaries and the assembled digest.

mod digest;
mod entry;
mod query;
mod window;

pub use digest::{Digest, DigestItem, Summary, TopicDigest};
pub use entry::{Entry, EntryBuilder};
pub use query::FeedQuery;
pub use window::Window;
