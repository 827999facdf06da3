//! Feed query parameters.

use serde::{Deserialize, Serialize};

/// One feed request: a single keyword restricted to a set of categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    /// Keyword or phrase; a trailing `*` requests prefix matching
    pub keyword: String,

    /// Category tags OR-ed together; empty means any category
    pub categories: Vec<String>,

    /// Maximum number of entries to request
    pub max_results: usize,
}

impl FeedQuery {
    /// Create a new feed query
    pub fn new(keyword: impl Into<String>, categories: &[String], max_results: usize) -> Self {
        Self {
            keyword: keyword.into(),
            categories: categories.to_vec(),
            max_results,
        }
    }
}
