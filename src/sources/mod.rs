//! Feed sources.
//!
//! This module defines the [`FeedSource`] trait the pipeline fetches
//! entries through. [`ArxivSource`] talks to the arXiv Atom query API;
//! [`MockSource`] serves canned entries for tests.

mod arxiv;
pub mod mock;

pub use arxiv::ArxivSource;
pub use mock::MockSource;

use async_trait::async_trait;

use crate::models::{Entry, FeedQuery};

/// A remote feed answering keyword/category queries.
#[async_trait]
pub trait FeedSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Run one query, returning entries in feed order
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<Entry>, SourceError>;
}

/// Errors that can occur when fetching from a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (Atom/XML)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API error reported by the source
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
