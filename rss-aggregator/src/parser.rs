use crate::types::{AggregatorError, ParsedEntry, ParsedFeed, Result};
use feed_rs::parser;
use std::collections::HashSet;
use tracing::debug;

/// Parses RSS/Atom documents, dropping entries repeated within a feed.
#[derive(Default)]
pub struct FeedParser {
    seen_guids: HashSet<String>,
    seen_urls: HashSet<String>,
}

impl FeedParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_feed(&mut self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries: Vec<ParsedEntry> = feed
            .entries
            .into_iter()
            .filter_map(|entry| self.parse_entry(entry))
            .collect();

        debug!("Parsed feed with {} entries", entries.len());
        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(&mut self, entry: feed_rs::model::Entry) -> Option<ParsedEntry> {
        let title = entry.title.map(|t| t.content).unwrap_or_default();
        let url = entry
            .links
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_default();

        let guid = if !entry.id.is_empty() {
            Some(entry.id.clone())
        } else {
            None
        };

        if let Some(ref guid) = guid {
            if !self.seen_guids.insert(guid.clone()) {
                debug!("Skipping duplicate entry with GUID: {}", guid);
                return None;
            }
        }

        if !url.is_empty() && !self.seen_urls.insert(url.clone()) {
            debug!("Skipping duplicate entry with URL: {}", url);
            return None;
        }

        let summary = entry.summary.map(|s| s.content);
        let content = entry.content.and_then(|c| c.body);
        let published_at = entry.published.or(entry.updated);

        Some(ParsedEntry {
            guid,
            url,
            title,
            summary,
            content,
            published_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Fixture</title>
    <link>https://example.org/</link>
    <description>Fixture feed</description>
    <item>
      <title>First item</title>
      <link>https://example.org/a</link>
      <guid>a</guid>
      <description>Short summary</description>
      <content:encoded><![CDATA[<p>Full body</p>]]></content:encoded>
      <pubDate>Fri, 07 Mar 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>First item again</title>
      <link>https://example.org/a</link>
      <guid>a-copy</guid>
    </item>
    <item>
      <link>https://example.org/untitled</link>
      <guid>c</guid>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_entries_and_skips_repeated_links() {
        let mut parser = FeedParser::new();
        let feed = parser.parse_feed(RSS).unwrap();
        assert_eq!(feed.title.as_deref(), Some("Fixture"));
        assert_eq!(feed.entries.len(), 2);

        let first = &feed.entries[0];
        assert_eq!(first.richest_body(), "<p>Full body</p>");
        assert!(first.published_at.is_some());
        assert!(feed.entries[1].title.is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let mut parser = FeedParser::new();
        assert!(matches!(parser.parse_feed("not a feed"), Err(AggregatorError::Parse(_))));
    }
}
