//! Inclusion rules applied to every fetched entry.
//!
//! An entry is included for a topic iff its submission date lies inside the
//! run window, at least one topic keyword occurs in its title or abstract,
//! and none of the topic's exclusion phrases nor the global exclusion list
//! occurs there. Matching is case-insensitive substring search.

use crate::config::Topic;
use crate::models::{Entry, Window};

/// Outcome of checking one entry against one topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Included,
    /// No submission date, or outside the window
    OutsideWindow,
    /// No topic keyword occurs in title or abstract
    NoKeyword,
    /// The given exclusion phrase occurs in title or abstract
    Excluded(String),
}

impl Verdict {
    pub fn is_included(&self) -> bool {
        matches!(self, Verdict::Included)
    }
}

/// Pure predicate over already-fetched entries
#[derive(Debug, Clone)]
pub struct FilterEngine {
    window: Window,
    global_exclude: Vec<String>,
}

impl FilterEngine {
    pub fn new(window: Window, global_exclude: &[String]) -> Self {
        Self {
            window,
            global_exclude: global_exclude
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Decide whether `entry` belongs in `topic`'s results
    pub fn verdict(&self, topic: &Topic, entry: &Entry) -> Verdict {
        match entry.submitted {
            Some(ts) if self.window.contains(ts) => {}
            _ => return Verdict::OutsideWindow,
        }

        let haystack = format!("{}\n{}", entry.title, entry.r#abstract).to_lowercase();

        let matched = topic
            .keywords
            .iter()
            .map(|k| keyword_needle(k))
            .any(|needle| !needle.is_empty() && haystack.contains(&needle));
        if !matched {
            return Verdict::NoKeyword;
        }

        let topic_exclude = topic.exclude_keywords.iter().map(|p| p.trim().to_lowercase());
        let global_exclude = self.global_exclude.iter().cloned();
        if let Some(phrase) = topic_exclude
            .chain(global_exclude)
            .find(|p| !p.is_empty() && haystack.contains(p.as_str()))
        {
            return Verdict::Excluded(phrase);
        }

        Verdict::Included
    }

    pub fn accepts(&self, topic: &Topic, entry: &Entry) -> bool {
        self.verdict(topic, entry).is_included()
    }
}

/// Lowercased keyword with the feed's `*` wildcard removed
fn keyword_needle(keyword: &str) -> String {
    keyword.trim().trim_end_matches('*').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryBuilder;
    use chrono::{DateTime, Duration, Utc};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn engine() -> FilterEngine {
        FilterEngine::new(
            Window::trailing(now(), 1),
            &["review".to_string(), "Comment on".to_string()],
        )
    }

    fn topic() -> Topic {
        Topic::new("nv", ["NV center", "magnon*"], ["quant-ph"])
    }

    fn entry(title: &str, abstract_text: &str, hours_ago: i64) -> Entry {
        EntryBuilder::new("id", title, "http://arxiv.org/abs/id")
            .abstract_text(abstract_text)
            .submitted(now() - Duration::hours(hours_ago))
            .build()
    }

    #[test]
    fn test_keyword_in_title_case_insensitive() {
        let e = entry("Sensing with nv centers", "Abstract.", 2);
        assert_eq!(engine().verdict(&topic(), &e), Verdict::Included);
    }

    #[test]
    fn test_keyword_in_abstract() {
        let e = entry("Untitled", "We study MAGNONS in YIG.", 2);
        assert!(engine().accepts(&topic(), &e));
    }

    #[test]
    fn test_no_keyword() {
        let e = entry("Superconductivity", "Cuprates.", 2);
        assert_eq!(engine().verdict(&topic(), &e), Verdict::NoKeyword);
    }

    #[test]
    fn test_outside_window() {
        let stale = entry("NV center", "x", 25);
        assert_eq!(engine().verdict(&topic(), &stale), Verdict::OutsideWindow);

        let undated = EntryBuilder::new("id", "NV center", "l").build();
        assert_eq!(engine().verdict(&topic(), &undated), Verdict::OutsideWindow);
    }

    #[test]
    fn test_topic_exclusion() {
        let t = topic().exclude(["Diamond Anvil"]);
        let e = entry("NV center in a diamond anvil cell", "x", 1);
        assert_eq!(
            engine().verdict(&t, &e),
            Verdict::Excluded("diamond anvil".to_string())
        );
    }

    #[test]
    fn test_global_exclusion_in_title_or_abstract() {
        let in_title = entry("A review of NV center sensing", "x", 1);
        assert!(!engine().accepts(&topic(), &in_title));

        let in_abstract = entry("NV center", "This is a comment on earlier work.", 1);
        assert_eq!(
            engine().verdict(&topic(), &in_abstract),
            Verdict::Excluded("comment on".to_string())
        );
    }

    #[test]
    fn test_blank_keywords_never_match() {
        let t = Topic::new("blank", ["  ", "*"], ["quant-ph"]);
        let e = entry("Anything", "at all", 1);
        assert_eq!(engine().verdict(&t, &e), Verdict::NoKeyword);
    }
}
