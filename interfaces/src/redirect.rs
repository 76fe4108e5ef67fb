use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

// Tracker blobs arrive with or without padding and sometimes with stray low bits.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

static RE_CLICK_BLOB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/click/[\d.]+/([A-Za-z0-9+=_-]+)").unwrap());

static RE_TRACKING_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://link\.apnews\.com/click/[\d.]+/[A-Za-z0-9+/=_-]+").unwrap()
});

/// Recovers canonical article URLs from click-tracking redirects.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    publisher_domain: String,
    article_marker: String,
}

impl RedirectResolver {
    pub fn new(publisher_domain: impl Into<String>, article_marker: impl Into<String>) -> Self {
        Self {
            publisher_domain: publisher_domain.into(),
            article_marker: article_marker.into(),
        }
    }

    pub fn apnews() -> Self {
        Self::new("apnews.com", "/article/")
    }

    /// Decode the blob segment of a tracking URL.
    ///
    /// Returns `None` for anything that does not decode to an article page on
    /// the publisher's domain. Query strings on the decoded URL are dropped.
    pub fn resolve(&self, tracked_url: &str) -> Option<String> {
        let blob = RE_CLICK_BLOB.captures(tracked_url)?.get(1)?.as_str();
        let normalized: String = blob
            .chars()
            .map(|c| match c {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();
        let normalized = normalized.trim_end_matches('=');

        let bytes = match LENIENT_STANDARD.decode(normalized) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(url = tracked_url, error = %e, "Tracking blob did not decode");
                return None;
            }
        };
        let decoded = String::from_utf8_lossy(&bytes);
        let base = decoded.split('?').next().unwrap_or_default().trim();

        let parsed = Url::parse(base).ok()?;
        let host = parsed.host_str()?;
        let on_domain = host == self.publisher_domain
            || host.ends_with(&format!(".{}", self.publisher_domain));
        if on_domain && parsed.path().contains(&self.article_marker) {
            Some(base.to_string())
        } else {
            None
        }
    }

    /// Every distinct resolvable tracking link in `html`, in document order.
    pub fn resolve_all(&self, html: &str) -> Vec<String> {
        let mut links: Vec<String> = Vec::new();
        for tracked in RE_TRACKING_URL.find_iter(html) {
            if let Some(link) = self.resolve(tracked.as_str()) {
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }
        links
    }

    /// First resolvable tracking link in `html`.
    pub fn first_in(&self, html: &str) -> Option<String> {
        RE_TRACKING_URL
            .find_iter(html)
            .find_map(|tracked| self.resolve(tracked.as_str()))
    }
}

impl Default for RedirectResolver {
    fn default() -> Self {
        Self::apnews()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn tracking_url(target: &str) -> String {
        format!(
            "https://link.apnews.com/click/44179595.478365/{}/5f2a9c",
            URL_SAFE_NO_PAD.encode(target)
        )
    }

    #[test]
    fn decodes_unpadded_blob() {
        let resolver = RedirectResolver::apnews();
        let url = tracking_url("https://apnews.com/article/example");
        assert_eq!(resolver.resolve(&url).as_deref(), Some("https://apnews.com/article/example"));
    }

    #[test]
    fn strips_query_string() {
        let resolver = RedirectResolver::apnews();
        let url = tracking_url("https://apnews.com/article/bridge-reopens-1a2b?utm_source=newsletter&user_email=x");
        assert_eq!(
            resolver.resolve(&url).as_deref(),
            Some("https://apnews.com/article/bridge-reopens-1a2b")
        );
    }

    #[test]
    fn rejects_off_domain_and_non_article_targets() {
        let resolver = RedirectResolver::apnews();
        assert_eq!(resolver.resolve(&tracking_url("https://example.com/article/x")), None);
        assert_eq!(resolver.resolve(&tracking_url("https://apnews.com/hub/politics")), None);
        assert_eq!(resolver.resolve(&tracking_url("https://notapnews.com/article/x")), None);
    }

    #[test]
    fn malformed_tracking_url_yields_nothing() {
        let resolver = RedirectResolver::apnews();
        assert_eq!(resolver.resolve("https://link.apnews.com/click/abc"), None);
        assert_eq!(resolver.resolve("https://link.apnews.com/click/1.2/%%%"), None);
        assert_eq!(resolver.resolve("https://link.apnews.com/click/1.2/A/x"), None);
    }

    #[test]
    fn scans_document_for_distinct_links_in_order() {
        let resolver = RedirectResolver::apnews();
        let first = tracking_url("https://apnews.com/article/first-story");
        let second = tracking_url("https://apnews.com/article/second-story");
        let html = format!(
            r#"<a href="{first}">One</a><a href="{second}">Two</a><a href="{first}">Again</a>"#
        );
        assert_eq!(
            resolver.resolve_all(&html),
            vec![
                "https://apnews.com/article/first-story".to_string(),
                "https://apnews.com/article/second-story".to_string(),
            ]
        );
        assert_eq!(resolver.first_in(&html).as_deref(), Some("https://apnews.com/article/first-story"));
    }
}
