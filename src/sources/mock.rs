//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::models::{Entry, FeedQuery};
use crate::sources::{FeedSource, SourceError};

/// A mock source that returns predefined entries per keyword.
///
/// Every query is recorded so tests can assert on what was requested.
#[derive(Debug, Default)]
pub struct MockSource {
    responses: Mutex<HashMap<String, Vec<Entry>>>,
    failing: Mutex<HashSet<String>>,
    queries: Mutex<Vec<FeedQuery>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entries returned for `keyword`.
    pub fn with_entries(self, keyword: &str, entries: Vec<Entry>) -> Self {
        self.set_entries(keyword, entries);
        self
    }

    /// Make every query for `keyword` fail with a network error.
    pub fn failing_on(self, keyword: &str) -> Self {
        lock(&self.failing).insert(keyword.to_string());
        self
    }

    /// Set the entries returned for `keyword`.
    pub fn set_entries(&self, keyword: &str, entries: Vec<Entry>) {
        lock(&self.responses).insert(keyword.to_string(), entries);
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<FeedQuery> {
        lock(&self.queries).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl FeedSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<Entry>, SourceError> {
        lock(&self.queries).push(query.clone());

        if lock(&self.failing).contains(&query.keyword) {
            return Err(SourceError::Network(format!(
                "mock failure for '{}'",
                query.keyword
            )));
        }

        let entries = lock(&self.responses)
            .get(&query.keyword)
            .cloned()
            .unwrap_or_default();
        Ok(entries.into_iter().take(query.max_results).collect())
    }
}
