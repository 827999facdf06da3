//! Text helpers for feed content and digest rendering.

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `limit` characters.
///
/// Text at or under the limit is returned unchanged. Longer text keeps its
/// first `limit - 3` characters, drops trailing whitespace and gets
/// [`ELLIPSIS`] appended.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let kept: String = text
        .chars()
        .take(limit.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

/// Collapse every run of whitespace (including newlines) to a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_untouched() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_exactly_at_limit_untouched() {
        let title = "a".repeat(120);
        assert_eq!(truncate(&title, 120), title);
    }

    #[test]
    fn test_truncate_over_limit() {
        let title = "a".repeat(121);
        let cut = truncate(&title, 120);
        assert!(cut.ends_with(ELLIPSIS));
        assert_eq!(cut.chars().count(), 120);
    }

    #[test]
    fn test_truncate_trims_before_marker() {
        assert_eq!(truncate("hello world again", 9), "hello...");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(truncate(&text, 10), text);
        assert_eq!(truncate(&text, 6), "ééé...");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Spin\n  qubits\tin   silicon "),
            "Spin qubits in silicon"
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"q\""), "&quot;q&quot;");
    }
}
