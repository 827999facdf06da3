//! Configuration management.
//!
//! Three inputs feed a run:
//!
//! - [`Settings`]: run-level knobs from an optional TOML file, overridden by
//!   `ARXIV_DIGEST_*` environment variables (and `WINDOW_DAYS`)
//! - [`TopicSet`]: the JSON topics file
//! - [`MailCredentials`] / [`openai_api_key`]: secrets read from the environment
//!
//! # Settings File Format
//!
//! ```toml
//! window_days = 1
//! title_max = 120
//! abstract_max = 600
//! global_exclude = ["review", "survey", "comment on", "corrigendum"]
//! summarize = true
//! model = "gpt-4.1"
//! dedup = "first-topic-wins"
//! fetch_policy = "best-effort"
//! request_interval_secs = 3
//! smtp_host = "smtp.gmail.com"
//! smtp_port = 587
//! utc_offset_hours = 9
//! cutoff_hour = 9
//! ```

mod credentials;
mod topics;

pub use credentials::{openai_api_key, MailCredentials};
pub use topics::{Topic, TopicSet, DEFAULT_MAX_RESULTS};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::Window;

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "ARXIV_DIGEST";

/// Environment variable overriding `window_days`
pub const WINDOW_DAYS_VAR: &str = "WINDOW_DAYS";

/// Longest accepted window, in days
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// How a paper matched by several topics is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Listed only under the first topic (in declaration order) that includes it
    #[default]
    FirstTopicWins,
    /// Listed under every topic that includes it
    EveryTopic,
}

/// What a failed feed query does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// Log and continue with the remaining queries
    #[default]
    BestEffort,
    /// Abort the run
    FailFast,
}

/// Run-level settings, immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Trailing window in days
    pub window_days: u32,

    /// Title truncation limit in characters
    pub title_max: usize,

    /// Abstract truncation limit in characters
    pub abstract_max: usize,

    /// Phrases that drop an entry regardless of topic
    pub global_exclude: Vec<String>,

    /// Request AI summaries for included entries
    pub summarize: bool,

    /// Chat model used for summaries
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    pub openai_base_url: String,

    pub dedup: DedupPolicy,

    pub fetch_policy: FetchPolicy,

    /// Feed query endpoint
    pub feed_url: String,

    /// Minimum seconds between feed requests (0 disables pacing)
    pub request_interval_secs: u64,

    /// HTTP timeout in seconds
    pub request_timeout_secs: u64,

    pub smtp_host: String,

    pub smtp_port: u16,

    /// Offset used for the cutoff, the subject date and window rendering
    pub utc_offset_hours: i32,

    /// Local hour closing the daily window; unset means a plain trailing window
    pub cutoff_hour: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_days: 1,
            title_max: 120,
            abstract_max: 600,
            global_exclude: ["review", "survey", "comment on", "corrigendum"]
                .into_iter()
                .map(String::from)
                .collect(),
            summarize: true,
            model: "gpt-4.1".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            dedup: DedupPolicy::default(),
            fetch_policy: FetchPolicy::default(),
            feed_url: "http://export.arxiv.org/api/query".to_string(),
            request_interval_secs: 3,
            request_timeout_secs: 30,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            utc_offset_hours: 0,
            cutoff_hour: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("global_exclude"),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Settings(e.to_string()))?;

        settings
            .with_env_window(std::env::var(WINDOW_DAYS_VAR).ok())?
            .validated()
    }

    /// Apply a raw `WINDOW_DAYS` value, if present
    pub fn with_env_window(mut self, raw: Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = raw {
            self.window_days = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: WINDOW_DAYS_VAR.to_string(),
                message: format!("expected a positive integer, got '{}'", raw),
            })?;
        }
        Ok(self)
    }

    /// Reject values the rest of the pipeline cannot work with
    pub fn validated(self) -> Result<Self, ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.window_days == 0 {
            return Err(invalid("window_days", "must be at least 1"));
        }
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(invalid(
                "window_days",
                &format!("must be at most {}", MAX_WINDOW_DAYS),
            ));
        }
        if self.title_max < 4 {
            return Err(invalid("title_max", "must be at least 4"));
        }
        if self.abstract_max < 4 {
            return Err(invalid("abstract_max", "must be at least 4"));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(invalid("utc_offset_hours", "must be between -12 and 14"));
        }
        if matches!(self.cutoff_hour, Some(h) if h > 23) {
            return Err(invalid("cutoff_hour", "must be between 0 and 23"));
        }
        Ok(self)
    }

    /// Configured offset as a chrono value
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// The acceptance window for a run starting at `now`
    pub fn window(&self, now: DateTime<Utc>) -> Window {
        match self.cutoff_hour {
            Some(hour) => Window::daily_cutoff(now, self.window_days, self.utc_offset(), hour),
            None => Window::trailing(now, self.window_days),
        }
    }

    /// Render the effective settings as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Settings(e.to_string()))
    }
}

/// Locate a settings file in the default locations
///
/// Checks `./arxiv-digest.toml`, then `<config dir>/arxiv-digest/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("arxiv-digest.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("arxiv-digest").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Configuration errors; all are fatal and raised before any network call
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid topics file: {0}")]
    Topics(String),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Missing env var: {0}")]
    MissingEnv(String),
}
