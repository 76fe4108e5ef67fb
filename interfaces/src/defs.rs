use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::dedup::fingerprint;

/// Topic taxonomy shared by every producer and consumer of article records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Category {
    World,
    #[default]
    Us,
    Science,
    Tech,
    Environment,
    Local,
    Libraries,
    Longform,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::World,
        Category::Us,
        Category::Science,
        Category::Tech,
        Category::Environment,
        Category::Local,
        Category::Libraries,
        Category::Longform,
    ];

    /// Order in which categories appear in a finished batch.
    pub const DISPLAY_ORDER: [Category; 8] = [
        Category::Local,
        Category::Us,
        Category::World,
        Category::Science,
        Category::Tech,
        Category::Environment,
        Category::Libraries,
        Category::Longform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::World => "world",
            Category::Us => "us",
            Category::Science => "science",
            Category::Tech => "tech",
            Category::Environment => "environment",
            Category::Local => "local",
            Category::Libraries => "libraries",
            Category::Longform => "longform",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::World => "World",
            Category::Us => "U.S.",
            Category::Science => "Science",
            Category::Tech => "Tech",
            Category::Environment => "Environment",
            Category::Local => "Local",
            Category::Libraries => "Libraries",
            Category::Longform => "Long Read",
        }
    }

    pub fn display_rank(&self) -> usize {
        Self::DISPLAY_ORDER
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::DISPLAY_ORDER.len())
    }

    /// Parse a category name, falling back to the default for anything unknown.
    pub fn parse_or_default(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .unwrap_or_default()
    }

    /// The `categories` mapping embedded in every batch document.
    pub fn label_map() -> BTreeMap<String, String> {
        Self::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), c.label().to_string()))
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Category::parse_or_default(&s)).unwrap_or_default())
    }
}

/// Where inside an email an article came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestType {
    Alert,
    Lead,
    Top,
    Other,
    Trending,
    Related,
}

impl DigestType {
    /// Preference weight used when two email stories collide. Never a filter.
    pub fn priority(&self) -> u8 {
        match self {
            DigestType::Lead => 9,
            DigestType::Top => 8,
            DigestType::Alert => 7,
            DigestType::Trending => 7,
            DigestType::Other => 6,
            DigestType::Related => 5,
        }
    }
}

/// The normalized article record exchanged between every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ArticleRecord")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub category_label: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_type: Option<DigestType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Fields written by other producers that this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire shape of [`Article`]; the display label is re-derived on read so it
/// always agrees with the parsed category.
#[derive(Deserialize)]
struct ArticleRecord {
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    published: Option<DateTime<Utc>>,
    #[serde(default)]
    fingerprint: String,
    #[serde(default)]
    digest_type: Option<DigestType>,
    #[serde(default)]
    priority: Option<u8>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<ArticleRecord> for Article {
    fn from(record: ArticleRecord) -> Self {
        let mut extra = record.extra;
        extra.remove("category_label");
        Self {
            title: record.title,
            link: record.link,
            source: record.source,
            category: record.category,
            category_label: record.category.label().to_string(),
            excerpt: record.excerpt,
            published: record.published,
            fingerprint: record.fingerprint,
            digest_type: record.digest_type,
            priority: record.priority,
            extra,
        }
    }
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
        category: Category,
    ) -> Self {
        let title = title.into();
        let fingerprint = fingerprint(&title);
        Self {
            title,
            link: link.into(),
            source: source.into(),
            category,
            category_label: category.label().to_string(),
            excerpt: String::new(),
            published: None,
            fingerprint,
            digest_type: None,
            priority: None,
            extra: Map::new(),
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }

    pub fn with_provenance(mut self, digest_type: DigestType) -> Self {
        self.priority = Some(digest_type.priority());
        self.digest_type = Some(digest_type);
        self
    }

    /// The stored fingerprint, or one derived from the title when a producer omitted it.
    pub fn effective_fingerprint(&self) -> String {
        if self.fingerprint.is_empty() {
            fingerprint(&self.title)
        } else {
            self.fingerprint.clone()
        }
    }
}

/// One ingestion run's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_back: Option<u32>,
    #[serde(default)]
    pub article_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<String, String>>,
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchDocument {
    pub fn new(hours_back: u32, articles: Vec<Article>) -> Self {
        Self {
            generated_at: Some(Utc::now()),
            hours_back: Some(hours_back),
            article_count: articles.len(),
            categories: Some(Category::label_map()),
            articles,
            source: None,
            merged_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Batch document is not valid JSON")
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch document {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Malformed batch document {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `output`, or to stdout when no path is given.
    pub fn write_to(&self, output: Option<&Path>) -> Result<()> {
        let json = self.to_json()?;
        match output {
            Some(path) => fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display())),
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", json).context("Failed to write to stdout")
            }
        }
    }
}

/// The per-run recall window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub hours: u32,
    pub now: DateTime<Utc>,
    pub cutoff: DateTime<Utc>,
}

impl LookbackWindow {
    pub fn new(hours: u32) -> Self {
        Self::ending_at(Utc::now(), hours)
    }

    pub fn ending_at(now: DateTime<Utc>, hours: u32) -> Self {
        Self {
            hours,
            now,
            cutoff: now - Duration::hours(i64::from(hours)),
        }
    }

    /// Items without a publish time are admitted.
    pub fn admits(&self, published: Option<DateTime<Utc>>) -> bool {
        published.map_or(true, |p| p >= self.cutoff)
    }

    pub fn cutoff_date(&self) -> NaiveDate {
        self.cutoff.date_naive()
    }
}

// Editorial selection runs outside this workspace. Like every model in this
// family it is a stateless type whose associated functions take all inputs.

/// Decision for one input article, addressed by its index in the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorialPick {
    pub index: usize,
    pub selected: bool,
    pub commentary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorialOutput {
    pub picks: Vec<EditorialPick>,
    pub text: String,
}

impl EditorialOutput {
    pub fn selected_indices(&self) -> Vec<usize> {
        self.picks.iter().filter(|p| p.selected).map(|p| p.index).collect()
    }
}

pub trait EditorialModel {
    fn select(batch: &BatchDocument) -> Result<EditorialOutput>;
}
