//! Entry model representing one paper record fetched from the feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A paper as returned by the feed
///
/// Produced by a [`FeedSource`](crate::sources::FeedSource) and read-only
/// afterwards. The `link` is the identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Feed identifier (for arXiv, the versioned abs URL)
    pub id: String,

    /// Title, whitespace-normalised
    pub title: String,

    /// Abstract text, whitespace-normalised
    pub r#abstract: String,

    /// Author names in feed order
    pub authors: Vec<String>,

    /// Landing page URL
    pub link: String,

    /// First submission timestamp
    pub submitted: Option<DateTime<Utc>>,

    /// Category terms (e.g. `quant-ph`)
    pub categories: Vec<String>,
}

impl Entry {
    /// Create a new entry with the identifying fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            r#abstract: String::new(),
            authors: Vec::new(),
            link: link.into(),
            submitted: None,
            categories: Vec::new(),
        }
    }

    /// Authors joined for display, `None` when the feed listed nobody
    pub fn author_line(&self) -> Option<String> {
        if self.authors.is_empty() {
            None
        } else {
            Some(self.authors.join(", "))
        }
    }

    /// Categories joined for display
    pub fn category_line(&self) -> String {
        self.categories.join(", ")
    }
}

/// Builder for constructing Entry objects
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    entry: Entry,
}

impl EntryBuilder {
    /// Create a new builder with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            entry: Entry::new(id, title, link),
        }
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.entry.r#abstract = abstract_text.into();
        self
    }

    /// Set authors
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set submission timestamp
    pub fn submitted(mut self, submitted: DateTime<Utc>) -> Self {
        self.entry.submitted = Some(submitted);
        self
    }

    /// Set categories
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Build the Entry
    pub fn build(self) -> Entry {
        self.entry
    }
}
