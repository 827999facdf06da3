//! One end-to-end digest run.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::config::{Settings, TopicSet};
use crate::digest::{Collector, DigestFormatter};
use crate::error::Result;
use crate::filter::FilterEngine;
use crate::mail::Mailer;
use crate::sources::FeedSource;
use crate::summarize::Summarizer;

/// Where a non-empty digest goes
pub enum Delivery {
    /// Send through a mailer
    Mail(Box<dyn Mailer>),
    /// Write `papers.json`, `email.txt` and `email.html` into a directory
    Artifacts(PathBuf),
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The digest was mailed
    Sent { entries: usize },
    /// Nothing matched; no mail was attempted
    NoNewPapers,
    /// Artifacts were written instead of mailing
    DryRun {
        entries: usize,
        directory: PathBuf,
        text_body: String,
    },
}

/// Wires the pipeline stages together
pub struct Notifier {
    settings: Settings,
    topics: TopicSet,
    source: Box<dyn FeedSource>,
    summarizer: Box<dyn Summarizer>,
    delivery: Delivery,
}

impl Notifier {
    pub fn new(
        settings: Settings,
        topics: TopicSet,
        source: Box<dyn FeedSource>,
        summarizer: Box<dyn Summarizer>,
        delivery: Delivery,
    ) -> Self {
        Self {
            settings,
            topics,
            source,
            summarizer,
            delivery,
        }
    }

    /// Fetch, filter, summarize, then deliver (or skip when empty)
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        let filter = FilterEngine::new(self.settings.window(now), &self.settings.global_exclude);
        tracing::info!(
            topics = self.topics.len(),
            source = self.source.name(),
            window_start = %filter.window().start,
            window_end = %filter.window().end,
            "Starting digest run"
        );

        let digest = Collector::new(self.source.as_ref(), &filter, self.summarizer.as_ref())
            .dedup(self.settings.dedup)
            .fetch_policy(self.settings.fetch_policy)
            .collect(&self.topics)
            .await?;

        if digest.is_empty() {
            tracing::info!("No new papers");
            return Ok(RunOutcome::NoNewPapers);
        }

        let entries = digest.entry_count();
        let email = DigestFormatter::from_settings(&self.settings).render(&digest, now);

        match &self.delivery {
            Delivery::Mail(mailer) => {
                mailer.send(&email).await?;
                Ok(RunOutcome::Sent { entries })
            }
            Delivery::Artifacts(directory) => {
                std::fs::create_dir_all(directory)?;
                std::fs::write(
                    directory.join("papers.json"),
                    serde_json::to_string_pretty(&digest)?,
                )?;
                std::fs::write(directory.join("email.txt"), &email.text_body)?;
                std::fs::write(directory.join("email.html"), &email.html_body)?;
                tracing::info!(directory = %directory.display(), entries, "Artifacts written");

                Ok(RunOutcome::DryRun {
                    entries,
                    directory: directory.clone(),
                    text_body: email.text_body,
                })
            }
        }
    }
}
