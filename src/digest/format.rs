//! Render a digest as plain-text and HTML email bodies.

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt::Write;

use crate::config::Settings;
use crate::mail::Email;
use crate::models::{Digest, DigestItem};
use crate::utils::{html_escape, truncate};

const UNKNOWN_AUTHORS: &str = "Unknown authors";

/// Renders digests using the run's truncation limits
#[derive(Debug, Clone)]
pub struct DigestFormatter {
    title_max: usize,
    abstract_max: usize,
    offset: FixedOffset,
}

impl DigestFormatter {
    pub fn new(title_max: usize, abstract_max: usize, offset: FixedOffset) -> Self {
        Self {
            title_max,
            abstract_max,
            offset,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.title_max,
            settings.abstract_max,
            settings.utc_offset(),
        )
    }

    /// `"YYYY-MM-DD – arXiv Digest"`, dated in the configured offset
    pub fn subject(&self, now: DateTime<Utc>) -> String {
        format!(
            "{} – arXiv Digest",
            now.with_timezone(&self.offset).format("%Y-%m-%d")
        )
    }

    /// Subject plus both bodies
    pub fn render(&self, digest: &Digest, now: DateTime<Utc>) -> Email {
        Email {
            subject: self.subject(now),
            text_body: self.plain_text(digest),
            html_body: self.html(digest),
        }
    }

    pub fn plain_text(&self, digest: &Digest) -> String {
        let mut out = String::from("📰  Daily arXiv Digest\n\n");

        let topics = digest.topics();
        for (t_idx, group) in topics.iter().enumerate() {
            let heading = format!("📌 {} ({})", group.topic.to_uppercase(), group.items.len());
            let _ = writeln!(out, "{}", heading);
            let _ = writeln!(out, "{}", "=".repeat(group.topic.chars().count() + 7));

            for (p_idx, item) in group.items.iter().enumerate() {
                self.write_text_item(&mut out, p_idx + 1, item);
                if p_idx + 1 < group.items.len() {
                    let _ = writeln!(out, "      {}", "-".repeat(40));
                }
            }

            if t_idx + 1 < topics.len() {
                let _ = writeln!(out, "{}", "-".repeat(30));
            }
        }

        let _ = writeln!(out, "{}", "━".repeat(34));
        let _ = write!(out, "Window: {}", digest.window().describe(self.offset));
        out
    }

    fn write_text_item(&self, out: &mut String, index: usize, item: &DigestItem) {
        let entry = &item.entry;
        let title = truncate(&entry.title, self.title_max);

        if entry.categories.is_empty() {
            let _ = writeln!(out, "{}. 📄 {}", index, title);
        } else {
            let _ = writeln!(out, "{}. 📄 {}  ({})", index, title, entry.category_line());
        }
        let _ = writeln!(out, "      🔗 {}", entry.link);
        let _ = writeln!(
            out,
            "      👥 {}",
            entry
                .author_line()
                .unwrap_or_else(|| UNKNOWN_AUTHORS.to_string())
        );

        if let Some(summary) = &item.summary {
            let _ = writeln!(out, "      💡 3-line summary:");
            for line in summary.to_string().lines() {
                let _ = writeln!(out, "         {}", line);
            }
        }

        if !entry.r#abstract.is_empty() {
            let _ = writeln!(
                out,
                "      📝 {}",
                truncate(&entry.r#abstract, self.abstract_max)
            );
        }
    }

    pub fn html(&self, digest: &Digest) -> String {
        let mut sections = String::new();

        for group in digest.topics() {
            let _ = write!(
                sections,
                r#"
    <h2>📌 {topic} ({count})</h2>
    <ol>"#,
                topic = html_escape(&group.topic.to_uppercase()),
                count = group.items.len(),
            );
            for item in &group.items {
                self.write_html_item(&mut sections, item);
            }
            sections.push_str("\n    </ol>");
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 720px; margin: 0 auto; padding: 16px; }}
        h2 {{ border-bottom: 1px solid #d1d5db; padding-bottom: 4px; }}
        li {{ margin-bottom: 16px; }}
        .meta {{ color: #6b7280; font-size: 13px; }}
        .summary {{ background: #f3f4f6; padding: 8px; border-radius: 4px; }}
        .footer {{ color: #6b7280; font-size: 12px; }}
    </style>
</head>
<body>
    <h1>📰 Daily arXiv Digest</h1>{sections}
    <hr>
    <p class="footer">Window: {window}</p>
</body>
</html>
"#,
            sections = sections,
            window = html_escape(&digest.window().describe(self.offset)),
        )
    }

    fn write_html_item(&self, out: &mut String, item: &DigestItem) {
        let entry = &item.entry;
        let _ = write!(
            out,
            r#"
        <li>
            <a href="{link}"><strong>{title}</strong></a>
            <div class="meta">{authors}{categories}</div>"#,
            link = html_escape(&entry.link),
            title = html_escape(&truncate(&entry.title, self.title_max)),
            authors = html_escape(
                &entry
                    .author_line()
                    .unwrap_or_else(|| UNKNOWN_AUTHORS.to_string())
            ),
            categories = if entry.categories.is_empty() {
                String::new()
            } else {
                format!(" · {}", html_escape(&entry.category_line()))
            },
        );

        if let Some(summary) = &item.summary {
            let _ = write!(
                out,
                r#"
            <div class="summary"><b>Problem:</b> {}<br><b>Result:</b> {}<br><b>Method:</b> {}</div>"#,
                html_escape(&summary.problem),
                html_escape(&summary.result),
                html_escape(&summary.method),
            );
        }

        if !entry.r#abstract.is_empty() {
            let _ = write!(
                out,
                "\n            <p>{}</p>",
                html_escape(&truncate(&entry.r#abstract, self.abstract_max))
            );
        }
        out.push_str("\n        </li>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryBuilder, Summary, Window};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn formatter() -> DigestFormatter {
        DigestFormatter::new(20, 30, FixedOffset::east_opt(0).unwrap())
    }

    fn sample() -> Digest {
        let mut digest = Digest::new(Window::trailing(now(), 1));
        let long = EntryBuilder::new("1", "A very long title that keeps going", "http://x/1")
            .abstract_text("An abstract that is definitely longer than thirty chars.")
            .authors(["Jane Doe"])
            .categories(["quant-ph"])
            .build();
        let short = EntryBuilder::new("2", "Short <b>title</b>", "http://x/2").build();
        digest.push_topic(
            "nv",
            vec![
                DigestItem::new(
                    long,
                    Some(Summary {
                        problem: "P".into(),
                        result: "R".into(),
                        method: "M".into(),
                    }),
                ),
                DigestItem::new(short, None),
            ],
        );
        digest.push_topic(
            "magnon",
            vec![DigestItem::new(
                EntryBuilder::new("3", "Magnons", "http://x/3").build(),
                None,
            )],
        );
        digest
    }

    #[test]
    fn test_subject() {
        assert_eq!(formatter().subject(now()), "2024-05-10 – arXiv Digest");

        let kst = DigestFormatter::new(120, 600, FixedOffset::east_opt(9 * 3600).unwrap());
        let late = DateTime::parse_from_rfc3339("2024-05-10T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(kst.subject(late), "2024-05-11 – arXiv Digest");
    }

    #[test]
    fn test_plain_text_groups_in_order_and_truncates() {
        let text = formatter().plain_text(&sample());

        let nv = text.find("📌 NV (2)").unwrap();
        let magnon = text.find("📌 MAGNON (1)").unwrap();
        assert!(nv < magnon);

        assert!(text.contains("1. 📄 A very long title...  (quant-ph)"));
        assert!(text.contains("2. 📄 Short <b>title</b>\n"));
        assert!(text.contains("👥 Jane Doe"));
        assert!(text.contains("👥 Unknown authors"));
        assert!(text.contains("Problem: P"));
        assert!(text.contains("📝 An abstract that is definit..."));
        assert!(text.contains("1. 📄 Magnons"));
        assert!(text.contains("Window: 2024-05-09 12:00 – 2024-05-10 12:00"));
    }

    #[test]
    fn test_html_escapes_content() {
        let html = formatter().html(&sample());
        assert!(html.contains("Short &lt;b&gt;title&lt;/b&gt;"));
        assert!(html.contains(r#"<a href="http://x/1">"#));
        assert!(html.contains("<b>Problem:</b> P"));
        assert!(!html.contains("<b>title</b>"));
    }

    #[test]
    fn test_render_bundles_subject_and_bodies() {
        let email = formatter().render(&sample(), now());
        assert_eq!(email.subject, "2024-05-10 – arXiv Digest");
        assert!(email.text_body.contains("Daily arXiv Digest"));
        assert!(email.html_body.starts_with("<!DOCTYPE html>"));
    }
}
