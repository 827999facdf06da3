//! Fetch, filter, deduplicate, cap and summarize entries per topic.

use std::collections::HashSet;

use crate::config::{DedupPolicy, FetchPolicy, Topic, TopicSet};
use crate::error::{DigestError, Result};
use crate::filter::{FilterEngine, Verdict};
use crate::models::{Digest, DigestItem, Entry, FeedQuery};
use crate::sources::FeedSource;
use crate::summarize::Summarizer;

/// Builds a [`Digest`] from the feed, one query and one summary at a time
#[derive(Debug)]
pub struct Collector<'a> {
    source: &'a dyn FeedSource,
    filter: &'a FilterEngine,
    summarizer: &'a dyn Summarizer,
    dedup: DedupPolicy,
    fetch_policy: FetchPolicy,
}

impl<'a> Collector<'a> {
    pub fn new(
        source: &'a dyn FeedSource,
        filter: &'a FilterEngine,
        summarizer: &'a dyn Summarizer,
    ) -> Self {
        Self {
            source,
            filter,
            summarizer,
            dedup: DedupPolicy::default(),
            fetch_policy: FetchPolicy::default(),
        }
    }

    pub fn dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn fetch_policy(mut self, fetch_policy: FetchPolicy) -> Self {
        self.fetch_policy = fetch_policy;
        self
    }

    /// Run every topic's queries in declaration order
    pub async fn collect(&self, topics: &TopicSet) -> Result<Digest> {
        let mut digest = Digest::new(*self.filter.window());
        let mut listed: HashSet<String> = HashSet::new();

        for topic in topics {
            let entries = self.collect_topic(topic, &listed).await?;
            if self.dedup == DedupPolicy::FirstTopicWins {
                listed.extend(entries.iter().map(|e| e.link.clone()));
            }

            tracing::info!(topic = %topic.name, count = entries.len(), "Topic collected");

            let items = self.summarize_all(entries).await;
            digest.push_topic(topic.name.clone(), items);
        }

        Ok(digest)
    }

    /// Included entries for one topic, capped at `max_results`.
    ///
    /// `listed` holds links already claimed by earlier topics.
    async fn collect_topic(&self, topic: &Topic, listed: &HashSet<String>) -> Result<Vec<Entry>> {
        let mut kept: Vec<Entry> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for keyword in &topic.keywords {
            if kept.len() >= topic.max_results {
                break;
            }

            let query = FeedQuery::new(keyword.as_str(), &topic.categories, topic.max_results);
            let fetched = match self.source.fetch(&query).await {
                Ok(entries) => entries,
                Err(err) => match self.fetch_policy {
                    FetchPolicy::FailFast => {
                        return Err(DigestError::Fetch {
                            topic: topic.name.clone(),
                            keyword: keyword.clone(),
                            source: err,
                        })
                    }
                    FetchPolicy::BestEffort => {
                        tracing::warn!(
                            topic = %topic.name,
                            keyword = %keyword,
                            error = %err,
                            "Feed query failed, skipping"
                        );
                        continue;
                    }
                },
            };

            for entry in fetched {
                if kept.len() >= topic.max_results {
                    break;
                }
                if seen.contains(&entry.link) || listed.contains(&entry.link) {
                    continue;
                }

                match self.filter.verdict(topic, &entry) {
                    Verdict::Included => {
                        seen.insert(entry.link.clone());
                        kept.push(entry);
                    }
                    Verdict::Excluded(phrase) => {
                        tracing::debug!(link = %entry.link, phrase = %phrase, "Entry excluded");
                    }
                    Verdict::OutsideWindow | Verdict::NoKeyword => {}
                }
            }
        }

        Ok(kept)
    }

    async fn summarize_all(&self, entries: Vec<Entry>) -> Vec<DigestItem> {
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let summary = if self.summarizer.enabled() {
                match self.summarizer.summarize(&entry.title, &entry.r#abstract).await {
                    Ok(summary) => Some(summary),
                    Err(err) => {
                        tracing::warn!(link = %entry.link, error = %err, "Summary unavailable");
                        None
                    }
                }
            } else {
                None
            };
            items.push(DigestItem::new(entry, summary));
        }
        items
    }
}
