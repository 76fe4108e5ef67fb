//! Sectioned multi-story newsletters.
//!
//! The body is scanned once for the bold section markers and split into
//! ordered `(Section, span)` pairs. Each span is then handed to a pure
//! extractor for its section type. Related-coverage lists are not sections of
//! their own; they are embedded inside feature stories and are collected
//! separately over the whole body.

use chrono::{DateTime, Utc};
use interfaces::defs::{Article, DigestType};
use interfaces::text::{ceil_boundary, floor_boundary, strip_html};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::senders::Publisher;

static RE_SECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<strong>\s*(UP FIRST|TOP STORIES|IN OTHER NEWS|TRENDING)\s*</strong>").unwrap()
});

static RE_FEATURE_HEADLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)font-size:\s*(?:2[0-9]|3[0-9])px[^>]*>\s*<strong>(.*?)</strong>").unwrap()
});

static RE_FEATURE_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)font-size:\s*18px[^>]*>(.*?)(?:Read more\.|</p>)").unwrap()
});

static RE_ONE_LINER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<strong>([^<]+?)\s*:?\s*</strong>\s*<a\s+href="([^"]+)"[^>]*>([^<]+)</a>"#).unwrap()
});

static RE_RELATED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<strong>\s*RELATED COVERAGE\s*➤?\s*</strong>").unwrap());

static RE_RELATED_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"divider_block|<strong>(?:UP FIRST|TOP STORIES|IN OTHER NEWS|TRENDING)").unwrap()
});

static RE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<a\s+href="([^"]+)"[^>]*>([^<]+)</a>"#).unwrap());

const MIN_HEADLINE_CHARS: usize = 10;
const MIN_RELATED_TITLE_CHARS: usize = 15;
const LINK_WINDOW_BEFORE: usize = 200;
const LINK_WINDOW_AFTER: usize = 2000;
const SUMMARY_WINDOW: usize = 3000;
const RELATED_BLOCK_LIMIT: usize = 5000;

/// Bold text that names a section rather than a story.
const NON_STORY_HEADINGS: &[&str] = &[
    "UP FIRST",
    "TOP STORIES",
    "IN OTHER NEWS",
    "TRENDING",
    "RELATED COVERAGE ➤",
    "RELATED COVERAGE",
];

/// One-liner labels that introduce something other than a story. `WATCH`
/// one-liners are stories.
const SKIPPED_LABELS: &[&str] = &["RELATED COVERAGE", "RELATED COVERAGE ➤", "LISTEN"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Lead,
    Top,
    Other,
    Trending,
}

impl Section {
    fn from_marker(marker: &str) -> Option<Self> {
        match marker.to_uppercase().as_str() {
            "UP FIRST" => Some(Section::Lead),
            "TOP STORIES" => Some(Section::Top),
            "IN OTHER NEWS" => Some(Section::Other),
            "TRENDING" => Some(Section::Trending),
            _ => None,
        }
    }

    pub fn digest_type(&self) -> DigestType {
        match self {
            Section::Lead => DigestType::Lead,
            Section::Top => DigestType::Top,
            Section::Other => DigestType::Other,
            Section::Trending => DigestType::Trending,
        }
    }
}

/// Split `html` at every section marker. Each span runs from the end of its
/// marker to the start of the next one, or to the end of the body.
pub fn scan_sections(html: &str) -> Vec<(Section, &str)> {
    let markers: Vec<(Section, usize, usize)> = RE_SECTION_MARKER
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let section = Section::from_marker(caps.get(1)?.as_str())?;
            Some((section, whole.start(), whole.end()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, (section, _, span_start))| {
            let span_end = markers.get(i + 1).map(|(_, start, _)| *start).unwrap_or(html.len());
            (*section, &html[*span_start..span_end])
        })
        .collect()
}

/// A story found by one of the extractors, before it becomes a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundStory {
    pub headline: String,
    pub link: String,
    pub summary: String,
}

/// Stories introduced by a large bold headline.
pub fn feature_stories(span: &str, publisher: &Publisher) -> Vec<FoundStory> {
    let mut stories = Vec::new();

    for caps in RE_FEATURE_HEADLINE.captures_iter(span) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let headline = strip_html(inner.as_str());
        if headline.chars().count() < MIN_HEADLINE_CHARS {
            continue;
        }
        if NON_STORY_HEADINGS.contains(&headline.to_uppercase().as_str()) {
            continue;
        }

        let near_start = floor_boundary(span, whole.start().saturating_sub(LINK_WINDOW_BEFORE));
        let near_end = ceil_boundary(span, whole.end() + LINK_WINDOW_AFTER);
        let link = publisher
            .resolver
            .first_in(&span[near_start..near_end])
            .unwrap_or_default();

        let after_end = ceil_boundary(span, whole.end() + SUMMARY_WINDOW);
        let summary = RE_FEATURE_SUMMARY
            .captures(&span[whole.end()..after_end])
            .map(|c| strip_html(&c[1]))
            .unwrap_or_default();

        stories.push(FoundStory {
            headline,
            link,
            summary,
        });
    }
    stories
}

/// `<strong>Label:</strong> <a href=...>Headline</a>` one-liners.
pub fn one_liners(span: &str, publisher: &Publisher) -> Vec<FoundStory> {
    RE_ONE_LINER
        .captures_iter(span)
        .filter_map(|caps| {
            let label = strip_html(&caps[1]);
            let label = label.trim_end_matches(':').trim().to_uppercase();
            if SKIPPED_LABELS.contains(&label.as_str()) {
                return None;
            }
            let headline = strip_html(&caps[3]);
            if headline.chars().count() < MIN_HEADLINE_CHARS {
                return None;
            }
            Some(FoundStory {
                headline,
                link: publisher.resolver.resolve(&caps[2]).unwrap_or_default(),
                summary: String::new(),
            })
        })
        .collect()
}

/// Link-only stories listed under every related-coverage heading in `html`.
pub fn related_coverage(html: &str, publisher: &Publisher) -> Vec<FoundStory> {
    let mut stories = Vec::new();

    for block in RE_RELATED_MARKER.split(html).skip(1) {
        let end = RE_RELATED_END
            .find(block)
            .map(|m| m.start())
            .unwrap_or_else(|| floor_boundary(block, RELATED_BLOCK_LIMIT));
        let chunk = &block[..end];

        for caps in RE_LINK.captures_iter(chunk) {
            let title = strip_html(&caps[2]);
            if title.chars().count() < MIN_RELATED_TITLE_CHARS {
                continue;
            }
            // Unresolvable related links are dropped.
            let Some(link) = publisher.resolver.resolve(&caps[1]) else {
                continue;
            };
            stories.push(FoundStory {
                headline: title,
                link,
                summary: String::new(),
            });
        }
    }
    stories
}

/// Records pulled from one newsletter, split by how they should be deduplicated.
#[derive(Debug, Default)]
pub struct DigestExtraction {
    pub primary: Vec<Article>,
    pub related: Vec<Article>,
}

impl DigestExtraction {
    pub fn len(&self) -> usize {
        self.primary.len() + self.related.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn parse_digest(html: &str, published: Option<DateTime<Utc>>, publisher: &Publisher) -> DigestExtraction {
    let mut extraction = DigestExtraction::default();

    for (section, span) in scan_sections(html) {
        let found = match section {
            Section::Other => one_liners(span, publisher),
            Section::Lead | Section::Top | Section::Trending => feature_stories(span, publisher),
        };
        debug!(?section, stories = found.len(), "Scanned digest section");
        extraction.primary.extend(found.into_iter().map(|story| {
            publisher.article(story.headline, story.link, story.summary, published, section.digest_type())
        }));
    }

    extraction.related = related_coverage(html, publisher)
        .into_iter()
        .map(|story| publisher.article(story.headline, story.link, story.summary, published, DigestType::Related))
        .collect();

    extraction
}
