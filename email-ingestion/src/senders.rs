use chrono::{DateTime, Utc};
use interfaces::classify::Classifier;
use interfaces::defs::{Article, DigestType};
use interfaces::redirect::RedirectResolver;

/// How a sender's messages are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderKind {
    /// One breaking story per message.
    Alert,
    /// Sectioned multi-story newsletter.
    Digest,
}

pub const ALLOWED_SENDERS: &[(&str, SenderKind)] = &[
    ("alerts@apnews.com", SenderKind::Alert),
    ("morningwire@apnews.com", SenderKind::Digest),
    ("afternoonwire@apnews.com", SenderKind::Digest),
];

/// Look up a sender address; anything not on the allow-list is `None`.
pub fn sender_kind(address: &str) -> Option<SenderKind> {
    let address = address.trim().to_lowercase();
    ALLOWED_SENDERS
        .iter()
        .find(|(sender, _)| *sender == address)
        .map(|(_, kind)| *kind)
}

/// Everything needed to turn a story found in a message into a record.
#[derive(Debug, Clone)]
pub struct Publisher {
    pub name: String,
    pub resolver: RedirectResolver,
    pub classifier: Classifier,
}

impl Publisher {
    pub fn associated_press() -> Self {
        Self {
            name: "Associated Press".to_string(),
            resolver: RedirectResolver::apnews(),
            classifier: Classifier::associated_press(),
        }
    }

    pub fn article(
        &self,
        title: String,
        link: String,
        excerpt: String,
        published: Option<DateTime<Utc>>,
        digest_type: DigestType,
    ) -> Article {
        let category = self.classifier.classify(&link, &title, &excerpt);
        Article::new(title, link, self.name.clone(), category)
            .with_excerpt(excerpt)
            .with_published(published)
            .with_provenance(digest_type)
    }
}
