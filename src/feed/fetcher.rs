//! Feed fetching and parsing.
//!
//! Wraps reqwest and feed-rs behind the [`FetchFeed`] trait so the ingestion
//! engine can be exercised without the network.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::{FeedmillError, Result};
use crate::feed::types::{ParsedEntry, ParsedFeed, MAX_DESCRIPTION_LENGTH, MAX_FEED_SIZE};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = "feedmill/0.1 (RSS aggregator)";

/// Contract for fetching and normalizing one feed.
///
/// Implementations are cloned per worker; a single instance is never shared
/// across concurrent fetches.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    /// Fetch the feed at `url` and normalize it.
    async fn fetch_and_parse(&self, url: &str) -> Result<ParsedFeed>;
}

/// HTTP feed fetcher.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a fetcher with default settings (no request timeout).
    pub fn new() -> Result<Self> {
        Self::with_config(&FetchConfig::default())
    }

    /// Create a fetcher from configuration.
    ///
    /// A request timeout is only installed when `request_timeout_secs` is
    /// positive; by default a slow origin is waited out indefinitely.
    pub fn with_config(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT);

        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }

        let client = builder
            .build()
            .map_err(|e| FeedmillError::Feed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch and parse the feed at the given URL.
    pub async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedmillError::Feed(format!("failed to fetch feed: {e}")))?;

        if !response.status().is_success() {
            return Err(FeedmillError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_FEED_SIZE {
                return Err(FeedmillError::Feed(format!(
                    "feed too large: {content_length} bytes (max {MAX_FEED_SIZE} bytes)"
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedmillError::Feed(format!("failed to read response: {e}")))?;

        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(FeedmillError::Feed(format!(
                "feed too large: {} bytes (max {MAX_FEED_SIZE} bytes)",
                bytes.len()
            )));
        }

        parse_feed(&bytes)
    }
}

#[async_trait]
impl FetchFeed for FeedFetcher {
    async fn fetch_and_parse(&self, url: &str) -> Result<ParsedFeed> {
        self.fetch(url).await
    }
}

/// Validate a subscription URL.
///
/// Only http/https URLs with a host are accepted.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| FeedmillError::Validation(format!("invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(FeedmillError::Validation(format!(
                "unsupported URL scheme: {scheme}"
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(FeedmillError::Validation("URL has no host".to_string()));
    }

    Ok(())
}

/// Parse feed bytes into a normalized [`ParsedFeed`].
fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| FeedmillError::Feed(format!("failed to parse feed: {e}")))?;

    let title = feed.title.map(|t| t.content).unwrap_or_default();
    let description = feed
        .description
        .map(|d| strip_html(&d.content))
        .unwrap_or_default();

    let entries: Vec<ParsedEntry> = feed
        .entries
        .into_iter()
        .map(|entry| {
            let guid = entry.id;
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            let description = entry
                .summary
                .map(|t| truncate(&strip_html(&t.content)))
                .unwrap_or_default();
            let content = entry
                .content
                .and_then(|c| c.body)
                .unwrap_or_default();
            let authors: Vec<String> = entry.authors.into_iter().map(|a| a.name).collect();
            let author = authors.first().filter(|name| !name.is_empty()).cloned();

            ParsedEntry {
                guid,
                link,
                title,
                description,
                content,
                author,
                authors,
                published_at: entry.published,
                updated_at: entry.updated,
            }
        })
        .collect();

    Ok(ParsedFeed {
        title,
        description,
        entries,
    })
}

/// Strip HTML tags and decode common entities from text.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                // Skip to the closing bracket
                for c in chars.by_ref() {
                    if c == '>' {
                        break;
                    }
                }
            }
            '&' => {
                let mut entity = String::new();
                let mut terminated = false;
                while let Some(&c) = chars.peek() {
                    if c == ';' {
                        chars.next();
                        terminated = true;
                        break;
                    }
                    if c == '&' || c == '<' || entity.len() > 8 {
                        break;
                    }
                    entity.push(c);
                    chars.next();
                }
                if terminated {
                    match decode_entity(&entity) {
                        Some(decoded) => out.push(decoded),
                        None => {
                            out.push('&');
                            out.push_str(&entity);
                            out.push(';');
                        }
                    }
                } else {
                    out.push('&');
                    out.push_str(&entity);
                }
            }
            _ => out.push(ch),
        }
    }

    out.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Decode a named or numeric HTML entity.
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}

/// Truncate a description to the maximum stored length.
fn truncate(text: &str) -> String {
    if text.len() <= MAX_DESCRIPTION_LENGTH {
        text.to_string()
    } else {
        text.chars().take(MAX_DESCRIPTION_LENGTH).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_http_and_https() {
        assert!(validate_url("https://example.com/feed.xml").is_ok());
        assert!(validate_url("http://example.com/feed.xml").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        let result = validate_url("ftp://example.com/feed.xml");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unsupported URL scheme"));
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_fetcher_without_timeout() {
        let config = FetchConfig {
            request_timeout_secs: 0,
            ..FetchConfig::default()
        };
        assert!(FeedFetcher::with_config(&config).is_ok());
    }

    #[test]
    fn test_fetcher_with_timeout() {
        let config = FetchConfig {
            request_timeout_secs: 30,
            ..FetchConfig::default()
        };
        assert!(FeedFetcher::with_config(&config).is_ok());
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html("<p>Hello</p>"), "Hello");
        assert_eq!(strip_html("<b>Bold</b> text"), "Bold text");
        assert_eq!(strip_html("<div><p>Nested</p></div>"), "Nested");
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("&amp;"), "&");
        assert_eq!(strip_html("&lt;tag&gt;"), "<tag>");
        assert_eq!(strip_html("&quot;quoted&quot;"), "\"quoted\"");
        assert_eq!(strip_html("A&nbsp;B"), "A B");
    }

    #[test]
    fn test_strip_html_numeric_entities() {
        assert_eq!(strip_html("&#65;"), "A");
        assert_eq!(strip_html("&#x41;"), "A");
    }

    #[test]
    fn test_strip_html_unknown_entity_kept() {
        assert_eq!(strip_html("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_strip_html_collapses_whitespace() {
        assert_eq!(
            strip_html("<p>  Multiple   spaces  </p>"),
            "Multiple spaces"
        );
        assert_eq!(strip_html("line\n\tbreaks"), "line breaks");
    }

    #[test]
    fn test_truncate_description() {
        let short = "Short text";
        assert_eq!(truncate(short), short);

        let long = "a".repeat(MAX_DESCRIPTION_LENGTH + 100);
        assert_eq!(truncate(&long).len(), MAX_DESCRIPTION_LENGTH);
    }

    #[test]
    fn test_parse_feed_rss() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <description>A test feed</description>
    <item>
      <title>First Article</title>
      <link>https://example.com/1</link>
      <guid>guid-1</guid>
      <description>&lt;p&gt;Description&lt;/p&gt;</description>
    </item>
  </channel>
</rss>"#;

        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.title, "Test Feed");
        assert_eq!(feed.description, "A test feed");
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].title, "First Article");
        assert_eq!(feed.entries[0].guid, "guid-1");
        assert_eq!(feed.entries[0].link, "https://example.com/1");
        assert_eq!(feed.entries[0].description, "Description");
    }

    #[test]
    fn test_parse_feed_atom() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <link href="https://example.com"/>
  <entry>
    <id>urn:uuid:1</id>
    <title>Atom Entry</title>
    <link href="https://example.com/entry"/>
    <summary>Entry summary</summary>
    <author><name>Author Name</name></author>
    <updated>2025-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

        let feed = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(feed.title, "Atom Feed");
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].guid, "urn:uuid:1");
        assert_eq!(feed.entries[0].author, Some("Author Name".to_string()));
        assert_eq!(feed.entries[0].authors, vec!["Author Name".to_string()]);
        assert!(feed.entries[0].published_at.is_none());
        assert!(feed.entries[0].updated_at.is_some());
        assert!(feed.entries[0].effective_published().is_some());
    }

    #[test]
    fn test_parse_feed_without_titles() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item>
      <guid>1</guid>
    </item>
  </channel>
</rss>"#;

        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.title, "");
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].title, "");
        assert_eq!(feed.entries[0].guid, "1");
    }

    #[test]
    fn test_parse_feed_invalid() {
        assert!(parse_feed(b"This is not XML").is_err());
    }
}
