//! Digest assembly and rendering.
//!
//! [`Collector`] turns topics into a [`Digest`](crate::models::Digest);
//! [`DigestFormatter`] renders it into an [`Email`](crate::mail::Email).

mod collect;
mod format;

pub use collect::Collector;
pub use format::DigestFormatter;
