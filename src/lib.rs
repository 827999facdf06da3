//! # arxiv-digest
//!
//! Polls the arXiv query API for user-defined topics, keeps the papers
//! submitted inside the run window, optionally attaches a three-line AI
//! summary to each, and emails the grouped digest.
//!
//! ## Architecture
//!
//! - [`config`]: settings, topics file and environment credentials
//! - [`sources`]: feed sources ([`sources::ArxivSource`])
//! - [`filter`]: window / keyword / exclusion predicate
//! - [`summarize`]: summarization capability (OpenAI or no-op)
//! - [`digest`]: collection and rendering
//! - [`mail`]: SMTP delivery
//! - [`runner`]: one end-to-end run

pub mod config;
pub mod digest;
pub mod error;
pub mod filter;
pub mod mail;
pub mod models;
pub mod runner;
pub mod sources;
pub mod summarize;
pub mod utils;

// Re-export commonly used types
pub use error::DigestError;
pub use models::{Digest, Entry, Summary};
pub use runner::{Delivery, Notifier, RunOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
