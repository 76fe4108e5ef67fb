//! Single-story breaking news alerts.

use chrono::{DateTime, Utc};
use interfaces::defs::{Article, DigestType};
use interfaces::text::strip_html;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::senders::Publisher;

static RE_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)font-size:\s*18px[^>]*>([^<]+(?:<[^>]*>[^<]*)*?)</p>").unwrap()
});

static RE_TEXT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)font-size:\s*1[68]px[^>]*>(.+?)</(?:p|div)>").unwrap());

/// Blocks shorter than this are bylines and datelines, not summaries.
const MIN_FALLBACK_CHARS: usize = 50;

/// The alert's summary paragraph.
///
/// Prefers the first 18px paragraph. Otherwise takes the first 16px or 18px
/// block that is long enough and does not open with the headline itself.
pub fn extract_summary(html: &str, headline: &str) -> String {
    if let Some(caps) = RE_SUMMARY.captures(html) {
        let summary = strip_html(&caps[1]);
        if !summary.is_empty() {
            return summary;
        }
    }

    let headline = headline.to_lowercase();
    RE_TEXT_BLOCK
        .captures_iter(html)
        .map(|caps| strip_html(&caps[1]))
        .find(|block| {
            let opening: String = block.to_lowercase().chars().take(30).collect();
            block.chars().count() > MIN_FALLBACK_CHARS && !opening.contains(&headline)
        })
        .unwrap_or_default()
}

/// Build the one record an alert carries. The subject line is the headline.
pub fn parse_alert(
    subject: &str,
    html: &str,
    published: Option<DateTime<Utc>>,
    publisher: &Publisher,
) -> Option<Article> {
    let headline = strip_html(subject);
    if headline.is_empty() {
        return None;
    }
    let summary = extract_summary(html, &headline);
    let link = publisher.resolver.first_in(html).unwrap_or_default();
    Some(publisher.article(headline, link, summary, published, DigestType::Alert))
}
