//! Title fingerprints, near-duplicate detection and batch finishing.
//!
//! Two records describe the same story when their normalized titles hash to
//! the same fingerprint, or when the smaller of their two word sets is
//! mostly contained in the other. The second test is deliberately measured
//! against the smaller set so that a short headline embedded in a longer one
//! still counts as a duplicate.

use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::defs::{Article, Category};

/// Minimum overlap (relative to the smaller word set) for two titles to match.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Number of hex characters kept from the title hash.
pub const FINGERPRINT_LEN: usize = 12;

/// Priority for any source missing from [`SOURCE_PRIORITY`].
pub const DEFAULT_SOURCE_PRIORITY: u8 = 5;

/// Wire services and primary broadcasters win ties over secondary outlets.
pub const SOURCE_PRIORITY: &[(&str, u8)] = &[
    ("BBC News", 10),
    ("BBC U.S.", 10),
    ("BBC Science", 10),
    ("Reuters", 9),
    ("Associated Press", 9),
    ("NPR World", 8),
    ("NPR U.S.", 8),
    ("NPR Politics", 8),
    ("NPR Science", 8),
    ("NPR Technology", 8),
];

/// Lowercase, drop punctuation, collapse whitespace.
pub fn normalize_title(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn fingerprint(title: &str) -> String {
    let digest = Sha256::digest(normalize_title(title).as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

fn word_set(title: &str) -> HashSet<String> {
    normalize_title(title)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn titles_similar(a: &str, b: &str) -> bool {
    let words_a = word_set(a);
    let words_b = word_set(b);
    if words_a.is_empty() || words_b.is_empty() {
        return false;
    }
    let overlap = words_a.intersection(&words_b).count();
    let smaller = words_a.len().min(words_b.len());
    overlap as f64 / smaller as f64 >= SIMILARITY_THRESHOLD
}

pub fn source_priority(source: &str) -> u8 {
    SOURCE_PRIORITY
        .iter()
        .find(|(name, _)| *name == source)
        .map(|(_, priority)| *priority)
        .unwrap_or(DEFAULT_SOURCE_PRIORITY)
}

/// Cross-batch rule: `candidate` is a duplicate when its fingerprint or its
/// title matches anything already in `existing`.
pub fn is_duplicate_of_any(candidate: &Article, existing: &[Article]) -> bool {
    let candidate_fp = candidate.effective_fingerprint();
    existing.iter().any(|kept| {
        kept.effective_fingerprint() == candidate_fp || titles_similar(&candidate.title, &kept.title)
    })
}

/// Intra-batch dedup, keeping the record from the highest-priority source.
pub fn deduplicate(mut articles: Vec<Article>) -> Vec<Article> {
    // stable: equal priorities keep their arrival order
    articles.sort_by(|a, b| source_priority(&b.source).cmp(&source_priority(&a.source)));

    let mut kept: Vec<Article> = Vec::with_capacity(articles.len());
    for article in articles {
        if is_duplicate_of_any(&article, &kept) {
            debug!(title = %article.title, source = %article.source, "Dropping duplicate");
            continue;
        }
        kept.push(article);
    }
    kept
}

/// Keep at most `max_per_category` records per category, preserving order.
pub fn cap_per_category(articles: Vec<Article>, max_per_category: usize) -> Vec<Article> {
    let mut counts: HashMap<Category, usize> = HashMap::new();
    articles
        .into_iter()
        .filter(|article| {
            let count = counts.entry(article.category).or_insert(0);
            *count += 1;
            *count <= max_per_category
        })
        .collect()
}

/// Group by display order, newest first within a group, undated last.
pub fn sort_for_display(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        a.category
            .display_rank()
            .cmp(&b.category.display_rank())
            .then_with(|| match (a.published, b.published) {
                (Some(pa), Some(pb)) => pb.cmp(&pa),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
    });
}

/// Dedup, cap and sort a freshly collected batch.
pub fn finish_batch(articles: Vec<Article>, max_per_category: usize) -> Vec<Article> {
    let mut finished = cap_per_category(deduplicate(articles), max_per_category);
    sort_for_display(&mut finished);
    finished
}
