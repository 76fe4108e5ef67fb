//! Combine a primary batch with supplemental batches from other producers.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::dedup::is_duplicate_of_any;
use crate::defs::BatchDocument;

/// Append supplemental articles that are not duplicates of anything already
/// accumulated. The primary document's metadata is kept as-is.
pub fn merge_batches(mut primary: BatchDocument, supplementals: &[BatchDocument]) -> BatchDocument {
    let before = primary.articles.len();

    for supplemental in supplementals {
        let mut added = 0;
        for article in &supplemental.articles {
            if is_duplicate_of_any(article, &primary.articles) {
                continue;
            }
            let mut article = article.clone();
            if article.fingerprint.is_empty() {
                article.fingerprint = article.effective_fingerprint();
            }
            primary.articles.push(article);
            added += 1;
        }
        info!(
            source = supplemental.source.as_deref().unwrap_or("unknown"),
            offered = supplemental.articles.len(),
            added,
            "Merged supplemental batch"
        );
    }

    primary.article_count = primary.articles.len();
    primary.merged_at = Some(Utc::now());
    info!(before, after = primary.article_count, "Merge complete");
    primary
}

/// Read and merge batch documents from disk.
///
/// An unreadable primary is an error; unreadable supplementals are skipped.
pub fn merge_files(primary_path: &Path, supplemental_paths: &[impl AsRef<Path>]) -> Result<BatchDocument> {
    let primary = BatchDocument::read_from(primary_path)?;

    let supplementals: Vec<BatchDocument> = supplemental_paths
        .iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match BatchDocument::read_from(path) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{:#}", e), "Skipping supplemental batch");
                    None
                }
            }
        })
        .collect();

    Ok(merge_batches(primary, &supplementals))
}
