//! Digest model: matched entries grouped by topic.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entry, Window};

/// Three-line structured summary attached to an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub problem: String,
    pub result: String,
    pub method: String,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem: {}", self.problem)?;
        writeln!(f, "Result: {}", self.result)?;
        write!(f, "Method: {}", self.method)
    }
}

/// An included entry and its optional summary
#[derive(Debug, Clone, Serialize)]
pub struct DigestItem {
    pub entry: Entry,
    pub summary: Option<Summary>,
}

impl DigestItem {
    pub fn new(entry: Entry, summary: Option<Summary>) -> Self {
        Self { entry, summary }
    }
}

/// Entries retained for one topic, in feed order
#[derive(Debug, Clone, Serialize)]
pub struct TopicDigest {
    pub topic: String,
    pub items: Vec<DigestItem>,
}

/// The result of one run, consumed once by the formatter
///
/// Topics appear in configuration declaration order; topics without any
/// retained entry are not stored.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    window: Window,
    topics: Vec<TopicDigest>,
}

impl Digest {
    /// Create an empty digest covering `window`
    pub fn new(window: Window) -> Self {
        Self {
            window,
            topics: Vec::new(),
        }
    }

    /// Append a topic's items; empty groups are dropped
    pub fn push_topic(&mut self, topic: impl Into<String>, items: Vec<DigestItem>) {
        if items.is_empty() {
            return;
        }
        self.topics.push(TopicDigest {
            topic: topic.into(),
            items,
        });
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn topics(&self) -> &[TopicDigest] {
        &self.topics
    }

    /// Items listed under `topic`, if it has any
    pub fn items_for(&self, topic: &str) -> Option<&[DigestItem]> {
        self.topics
            .iter()
            .find(|t| t.topic == topic)
            .map(|t| t.items.as_slice())
    }

    /// Total number of listed items across all topics
    pub fn entry_count(&self) -> usize {
        self.topics.iter().map(|t| t.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_push_topic_skips_empty() {
        let mut digest = Digest::new(Window::trailing(Utc::now(), 1));
        digest.push_topic("empty", Vec::new());
        assert!(digest.is_empty());

        digest.push_topic(
            "quantum",
            vec![DigestItem::new(Entry::new("1", "T", "l"), None)],
        );
        assert!(!digest.is_empty());
        assert_eq!(digest.entry_count(), 1);
        assert!(digest.items_for("quantum").is_some());
        assert!(digest.items_for("empty").is_none());
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            problem: "P".into(),
            result: "R".into(),
            method: "M".into(),
        };
        assert_eq!(summary.to_string(), "Problem: P\nResult: R\nMethod: M");
    }
}
