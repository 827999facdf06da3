//! arXiv feed source.

use async_trait::async_trait;
use feed_rs::parser;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::time::Duration;

use crate::config::Settings;
use crate::models::{Entry, EntryBuilder, FeedQuery};
use crate::sources::{FeedSource, SourceError};
use crate::utils::{normalize_whitespace, HttpClient};

/// arXiv caps a single query page at this many results
const ARXIV_MAX_RESULTS: usize = 2000;

/// Marker in the id of the pseudo-entry arXiv returns for a rejected query
const ARXIV_ERROR_ID: &str = "arxiv.org/api/errors";

/// arXiv Atom query API source
///
/// Requests are paced by a rate limiter; arXiv asks clients to issue at
/// most one request every three seconds.
pub struct ArxivSource {
    client: HttpClient,
    base_url: String,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl fmt::Debug for ArxivSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArxivSource")
            .field("base_url", &self.base_url)
            .field("paced", &self.limiter.is_some())
            .finish()
    }
}

impl ArxivSource {
    /// Create a source from run settings
    pub fn new(settings: &Settings) -> Result<Self, SourceError> {
        let client = HttpClient::new(Duration::from_secs(settings.request_timeout_secs))?;
        Ok(Self::with_client(
            client,
            &settings.feed_url,
            Duration::from_secs(settings.request_interval_secs),
        ))
    }

    /// Create with a custom HTTP client and endpoint (for testing)
    pub fn with_client(client: HttpClient, base_url: &str, interval: Duration) -> Self {
        let limiter = Quota::with_period(interval).map(RateLimiter::direct);
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
        }
    }

    /// Build the `search_query` parameter for one keyword.
    ///
    /// A keyword containing a space is searched as an exact phrase in title
    /// and abstract; a single word is prefix-matched (`*` appended unless
    /// already present). Categories are OR-ed and AND-ed with the keyword
    /// part. The result is already URL-encoded.
    pub fn build_search_query(keyword: &str, categories: &[String]) -> String {
        let keyword = keyword.trim();
        let kw_part = if keyword.contains(' ') {
            let phrase = urlencoding::encode(keyword);
            format!("(ti:%22{phrase}%22+OR+abs:%22{phrase}%22)")
        } else {
            let token = if keyword.contains('*') {
                keyword.to_string()
            } else {
                format!("{}*", keyword)
            };
            let token = urlencoding::encode(&token).replace("%2A", "*");
            format!("(ti:{token}+OR+abs:{token})")
        };

        if categories.is_empty() {
            return kw_part;
        }

        let cat_part = categories
            .iter()
            .map(|c| format!("cat:{}", urlencoding::encode(c.trim())))
            .collect::<Vec<_>>()
            .join("+OR+");
        format!("({cat_part})+AND+{kw_part}")
    }

    /// Full request URL for a query, newest submissions first
    fn build_url(&self, query: &FeedQuery) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.base_url,
            Self::build_search_query(&query.keyword, &query.categories),
            query.max_results.min(ARXIV_MAX_RESULTS)
        )
    }

    /// Parse an arXiv Atom document into entries
    pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Entry>, SourceError> {
        let feed = parser::parse(bytes)
            .map_err(|e| SourceError::Parse(format!("Failed to parse Atom feed: {}", e)))?;

        if let Some(error) = feed.entries.iter().find(|e| e.id.contains(ARXIV_ERROR_ID)) {
            let message = error
                .summary
                .as_ref()
                .map(|s| s.content.trim().to_string())
                .unwrap_or_else(|| "query rejected".to_string());
            return Err(SourceError::Api(message));
        }

        Ok(feed.entries.iter().map(Self::parse_entry).collect())
    }

    /// Convert one Atom entry
    fn parse_entry(entry: &feed_rs::model::Entry) -> Entry {
        let title = entry
            .title
            .as_ref()
            .map(|t| normalize_whitespace(&t.content))
            .unwrap_or_default();

        let abstract_text = entry
            .summary
            .as_ref()
            .map(|s| normalize_whitespace(&s.content))
            .unwrap_or_default();

        // Prefer the HTML landing page; arXiv also lists the PDF as a related link
        let link = entry
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone())
            .unwrap_or_else(|| entry.id.clone());

        let mut builder = EntryBuilder::new(entry.id.clone(), title, link)
            .abstract_text(abstract_text)
            .authors(entry.authors.iter().map(|a| normalize_whitespace(&a.name)))
            .categories(entry.categories.iter().map(|c| c.term.clone()));

        if let Some(submitted) = entry.published.or(entry.updated) {
            builder = builder.submitted(submitted);
        }

        builder.build()
    }
}

#[async_trait]
impl FeedSource for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<Entry>, SourceError> {
        if query.keyword.trim().is_empty() {
            return Err(SourceError::InvalidRequest("Empty keyword".to_string()));
        }

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = self.build_url(query);
        tracing::debug!(url = %url, "Querying arXiv");

        let response = self
            .client
            .client()
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        let entries = Self::parse_feed(bytes.as_ref())?;
        tracing::debug!(keyword = %query.keyword, count = entries.len(), "arXiv query returned");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-05-10T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/abs/2405.01234v1</id>
    <updated>2024-05-09T17:59:59Z</updated>
    <published>2024-05-09T17:59:59Z</published>
    <title>Coherent control of
      NV centers</title>
    <summary>  We demonstrate
  coherent control.  </summary>
    <author><name>Jane Doe</name></author>
    <author><name>John Smith</name></author>
    <link href="http://arxiv.org/abs/2405.01234v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2405.01234v1" rel="related" type="application/pdf"/>
    <category term="quant-ph" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cond-mat.mes-hall" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>"#;

    const ERROR_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-05-10T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234</id>
    <title>Error</title>
    <summary>incorrect id format for 1234</summary>
    <updated>2024-05-10T00:00:00Z</updated>
    <link href="http://arxiv.org/api/errors#incorrect_id_format_for_1234" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

    #[test]
    fn test_build_search_query_phrase() {
        let q = ArxivSource::build_search_query("nv center", &["quant-ph".to_string()]);
        assert_eq!(
            q,
            "(cat:quant-ph)+AND+(ti:%22nv%20center%22+OR+abs:%22nv%20center%22)"
        );
    }

    #[test]
    fn test_build_search_query_single_word_gets_wildcard() {
        let q = ArxivSource::build_search_query("magnon", &[]);
        assert_eq!(q, "(ti:magnon*+OR+abs:magnon*)");

        let q = ArxivSource::build_search_query("qubit*", &[]);
        assert_eq!(q, "(ti:qubit*+OR+abs:qubit*)");
    }

    #[test]
    fn test_build_search_query_categories_or_joined() {
        let cats = vec!["quant-ph".to_string(), "cond-mat.mes-hall".to_string()];
        let q = ArxivSource::build_search_query("magnon", &cats);
        assert!(q.starts_with("(cat:quant-ph+OR+cat:cond-mat.mes-hall)+AND+"));
    }

    #[test]
    fn test_parse_feed() {
        let entries = ArxivSource::parse_feed(FEED.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.title, "Coherent control of NV centers");
        assert_eq!(entry.r#abstract, "We demonstrate coherent control.");
        assert_eq!(entry.authors, vec!["Jane Doe", "John Smith"]);
        assert_eq!(entry.link, "http://arxiv.org/abs/2405.01234v1");
        assert_eq!(entry.categories, vec!["quant-ph", "cond-mat.mes-hall"]);
        assert_eq!(
            entry.submitted.map(|d| d.to_rfc3339()).as_deref(),
            Some("2024-05-09T17:59:59+00:00")
        );
    }

    #[test]
    fn test_parse_error_feed() {
        let result = ArxivSource::parse_feed(ERROR_FEED.as_bytes());
        assert!(matches!(result, Err(SourceError::Api(msg)) if msg.contains("incorrect id")));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            ArxivSource::parse_feed(b"not xml at all"),
            Err(SourceError::Parse(_))
        ));
    }

    fn test_source(base_url: &str) -> ArxivSource {
        let client = HttpClient::new(Duration::from_secs(5)).unwrap();
        ArxivSource::with_client(client, base_url, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_fetch_with_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("max_results".into(), "5".into()),
                mockito::Matcher::UrlEncoded("sortBy".into(), "submittedDate".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FEED)
            .create_async()
            .await;

        let source = test_source(&format!("{}/api/query", server.url()));
        let query = FeedQuery::new("nv center", &["quant-ph".to_string()], 5);
        let entries = source.fetch(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Coherent control of NV centers");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/query")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let source = test_source(&format!("{}/api/query", server.url()));
        let result = source.fetch(&FeedQuery::new("magnon", &[], 10)).await;
        assert!(matches!(result, Err(SourceError::Api(msg)) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_keyword() {
        let source = test_source("http://127.0.0.1:9/api/query");
        let result = source.fetch(&FeedQuery::new("  ", &[], 10)).await;
        assert!(matches!(result, Err(SourceError::InvalidRequest(_))));
    }
}
