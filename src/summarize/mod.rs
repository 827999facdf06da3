//! Optional AI summaries for included entries.
//!
//! Summarization is a capability: the pipeline always holds a
//! [`Summarizer`], and uses [`NoopSummarizer`] when summaries are disabled.
//! A failed summary never drops the entry it was requested for.

mod openai;

pub use openai::OpenAiSummarizer;

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use crate::models::Summary;

/// Produces a three-field summary from a paper's title and abstract
#[async_trait]
pub trait Summarizer: Send + Sync + std::fmt::Debug {
    /// Whether calls should be made at all
    fn enabled(&self) -> bool {
        true
    }

    async fn summarize(&self, title: &str, abstract_text: &str) -> Result<Summary, SummaryError>;
}

/// Summarizer used when summaries are turned off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSummarizer;

#[async_trait]
impl Summarizer for NoopSummarizer {
    fn enabled(&self) -> bool {
        false
    }

    async fn summarize(&self, _title: &str, _abstract_text: &str) -> Result<Summary, SummaryError> {
        Err(SummaryError::Disabled)
    }
}

/// Errors from the summarization API; all are recoverable
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Summaries are disabled")]
    Disabled,

    #[error("Summary request failed: {0}")]
    Request(String),

    #[error("Summary API error: {0}")]
    Api(String),

    #[error("Malformed summary reply: {0}")]
    Malformed(String),
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?im)^\s*(?:\d+\s*[.):-]\s*)?[*_]*\s*(problem|result|method)\s*[*_]*\s*:\s*[*_]*\s*(.+?)\s*$",
        )
        .expect("summary line pattern is valid")
    })
}

/// Parse a `Problem:` / `Result:` / `Method:` reply.
///
/// Lines may be numbered (`1)`, `2.`) or bolded; the first occurrence of
/// each label wins. All three labels must be present and non-empty.
pub fn parse_summary(reply: &str) -> Result<Summary, SummaryError> {
    let mut problem = None;
    let mut result = None;
    let mut method = None;

    for caps in line_pattern().captures_iter(reply) {
        let text = caps[2].trim_end_matches(['*', '_']).trim().to_string();
        if text.is_empty() {
            continue;
        }
        let slot = match caps[1].to_lowercase().as_str() {
            "problem" => &mut problem,
            "result" => &mut result,
            _ => &mut method,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    match (problem, result, method) {
        (Some(problem), Some(result), Some(method)) => Ok(Summary {
            problem,
            result,
            method,
        }),
        _ => Err(SummaryError::Malformed(format!(
            "expected Problem/Result/Method lines, got: {}",
            reply.trim()
        ))),
    }
}
