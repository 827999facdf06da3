//! Topics file: named keyword/category rule sets.
//!
//! ```json
//! {
//!   "nv centers": {
//!     "keywords": ["nv center", "nitrogen-vacancy"],
//!     "categories": ["quant-ph", "cond-mat.mes-hall"],
//!     "exclude_keywords": ["diamond anvil"],
//!     "max_results": 5
//!   }
//! }
//! ```
//!
//! Topic order in the file is the order of the digest.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Per-topic result cap when `max_results` is omitted
pub const DEFAULT_MAX_RESULTS: usize = 10;

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Topic rules as written in the file, keyed by topic name
#[derive(Debug, Deserialize)]
struct TopicSpec {
    #[serde(default)]
    keywords: Vec<String>,

    #[serde(default)]
    categories: Vec<String>,

    #[serde(default)]
    exclude_keywords: Vec<String>,

    #[serde(default = "default_max_results")]
    max_results: usize,
}

/// A named filter rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub name: String,
    pub keywords: Vec<String>,
    pub categories: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub max_results: usize,
}

impl Topic {
    /// Create a topic with default cap and no exclusions
    pub fn new<K, C>(name: impl Into<String>, keywords: K, categories: C) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
            exclude_keywords: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set exclusion phrases
    pub fn exclude<I>(mut self, phrases: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.exclude_keywords = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-run cap
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// All topics of a run, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopicSet {
    topics: Vec<Topic>,
}

impl TopicSet {
    /// Build from already-constructed topics
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// Load the topics file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parse topics from JSON text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        // Parsed through a Map first so key order survives (serde_json preserve_order)
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(content).map_err(|e| ConfigError::Topics(e.to_string()))?;

        let mut topics = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let spec: TopicSpec = serde_json::from_value(value)
                .map_err(|e| ConfigError::Topics(format!("topic '{}': {}", name, e)))?;

            if spec.max_results == 0 {
                return Err(ConfigError::Topics(format!(
                    "topic '{}': max_results must be at least 1",
                    name
                )));
            }
            if spec.keywords.is_empty() {
                tracing::warn!(topic = %name, "Topic has no keywords and will never match");
            }

            topics.push(Topic {
                name,
                keywords: spec.keywords,
                categories: spec.categories,
                exclude_keywords: spec.exclude_keywords,
                max_results: spec.max_results,
            });
        }

        Ok(Self { topics })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Look up a topic by name
    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }
}

impl<'a> IntoIterator for &'a TopicSet {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.topics.iter()
    }
}
