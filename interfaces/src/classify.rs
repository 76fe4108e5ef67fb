//! Heuristic topic classification for wire-service stories.
//!
//! A [`Classifier`] tries URL path rules first, then an ordered keyword
//! table over the lowercased headline and excerpt, then its default.

use crate::defs::Category;

/// Keyword order is significant: the first category with any hit wins.
#[derive(Debug, Clone)]
pub struct Classifier {
    path_rules: Vec<(&'static str, Category)>,
    keyword_rules: Vec<(Category, &'static [&'static str])>,
    default: Category,
}

const AP_SCIENCE: &[&str] = &[
    "study finds",
    "researchers",
    "nasa",
    "space",
    "climate",
    "species",
    "fossil",
    "vaccine",
    "genome",
    "medical",
    "scientific",
    "asteroid",
    "telescope",
    "physicist",
];

const AP_TECH: &[&str] = &[
    "ai ",
    "artificial intelligence",
    "cyber",
    "app ",
    "tech ",
    "software",
    "silicon valley",
    "crypto",
    "blockchain",
    "robot",
    "data breach",
    "social media",
    "tesla",
    "apple ",
    "google ",
    "microsoft",
    "amazon ",
];

const AP_ENVIRONMENT: &[&str] = &[
    "climate change",
    "emission",
    "wildfire",
    "flooding",
    "drought",
    "renewable",
    "solar",
    "carbon",
    "deforestation",
    "endangered",
    "pollution",
    "epa ",
];

const AP_WORLD: &[&str] = &[
    "ukraine",
    "russia",
    "china",
    "europe",
    "nato",
    "un ",
    "united nations",
    "middle east",
    "israel",
    "gaza",
    "iran",
    "north korea",
    "brazil",
    "india",
    "africa",
    "greenland",
    "peru",
    "cuba",
    "congress removes",
];

// Headline-only tables for AP stories read through the search proxy.
const AP_PROXY_SCIENCE: &[&str] = &[
    "study finds",
    "researchers",
    "nasa",
    "space",
    "vaccine",
    "medical",
    "scientific",
    "asteroid",
    "telescope",
];

const AP_PROXY_TECH: &[&str] = &[
    "ai ",
    "artificial intelligence",
    "cyber",
    "tech ",
    "software",
    "crypto",
    "robot",
    "data breach",
    "tesla",
    "apple ",
    "google ",
    "microsoft",
];

const AP_PROXY_ENVIRONMENT: &[&str] = &[
    "climate",
    "emission",
    "wildfire",
    "renewable",
    "solar",
    "carbon",
    "pollution",
    "epa ",
];

const AP_PROXY_WORLD: &[&str] = &[
    "ukraine",
    "russia",
    "china",
    "nato",
    "gaza",
    "israel",
    "iran",
    "north korea",
    "europe",
    "india",
    "africa",
    "middle east",
    "united nations",
    "greenland",
];

const REUTERS_SCIENCE: &[&str] = &[
    "study",
    "researchers",
    "nasa",
    "space",
    "vaccine",
    "medical",
    "clinical",
    "asteroid",
    "physicist",
];

const REUTERS_TECH: &[&str] = &[
    "ai ",
    "artificial intelligence",
    "cyber",
    "tech ",
    "software",
    "crypto",
    "robot",
    "data breach",
    "chip",
    "tesla",
    "apple ",
    "google ",
    "microsoft",
];

const REUTERS_ENVIRONMENT: &[&str] = &[
    "climate",
    "emission",
    "wildfire",
    "renewable",
    "solar",
    "carbon",
    "pollution",
    "epa ",
];

const REUTERS_WORLD: &[&str] = &[
    "ukraine",
    "russia",
    "china",
    "nato",
    "gaza",
    "israel",
    "iran",
    "north korea",
    "europe",
    "india",
    "africa",
    "middle east",
    "united nations",
];

impl Classifier {
    pub fn new(
        path_rules: Vec<(&'static str, Category)>,
        keyword_rules: Vec<(Category, &'static [&'static str])>,
        default: Category,
    ) -> Self {
        Self {
            path_rules,
            keyword_rules,
            default,
        }
    }

    fn ap_path_rules() -> Vec<(&'static str, Category)> {
        vec![
            ("/science", Category::Science),
            ("/technology", Category::Tech),
            ("/entertainment", Category::Us),
            ("/sports", Category::Us),
        ]
    }

    /// Profile for Associated Press stories extracted from email.
    pub fn associated_press() -> Self {
        Self::new(
            Self::ap_path_rules(),
            vec![
                (Category::Science, AP_SCIENCE),
                (Category::Tech, AP_TECH),
                (Category::Environment, AP_ENVIRONMENT),
                (Category::World, AP_WORLD),
            ],
            Category::Us,
        )
    }

    /// Associated Press stories read through the search proxy, where only
    /// the headline is available.
    pub fn associated_press_proxy() -> Self {
        Self::new(
            Self::ap_path_rules(),
            vec![
                (Category::Science, AP_PROXY_SCIENCE),
                (Category::Tech, AP_PROXY_TECH),
                (Category::Environment, AP_PROXY_ENVIRONMENT),
                (Category::World, AP_PROXY_WORLD),
            ],
            Category::Us,
        )
    }

    pub fn reuters() -> Self {
        Self::new(
            vec![
                ("/technology/", Category::Tech),
                ("/science/", Category::Science),
                ("/sustainability/", Category::Environment),
                ("/environment/", Category::Environment),
                ("/legal/", Category::Us),
                ("/world/us", Category::Us),
                ("/us-", Category::Us),
            ],
            vec![
                (Category::Science, REUTERS_SCIENCE),
                (Category::Tech, REUTERS_TECH),
                (Category::Environment, REUTERS_ENVIRONMENT),
                (Category::World, REUTERS_WORLD),
            ],
            Category::World,
        )
    }

    pub fn default_category(&self) -> Category {
        self.default
    }

    pub fn classify(&self, url: &str, headline: &str, excerpt: &str) -> Category {
        let url = url.to_lowercase();
        if let Some((_, category)) = self.path_rules.iter().find(|(segment, _)| url.contains(segment)) {
            return *category;
        }

        let text = format!("{} {}", headline, excerpt).to_lowercase();
        self.keyword_rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(category, _)| *category)
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_path_beats_keywords() {
        let ap = Classifier::associated_press();
        let category = ap.classify(
            "https://apnews.com/science/mars-rover-abc123",
            "Russia and China sign pact",
            "",
        );
        assert_eq!(category, Category::Science);
    }

    #[test]
    fn keyword_tables_are_scanned_in_order() {
        let ap = Classifier::associated_press();
        // "climate" is a science keyword and "climate change" an environment one
        assert_eq!(
            ap.classify("https://apnews.com/article/x", "Climate change report released", ""),
            Category::Science
        );
        assert_eq!(
            ap.classify("https://apnews.com/article/x", "Wildfire spreads across county", ""),
            Category::Environment
        );
        assert_eq!(
            ap.classify("https://apnews.com/article/x", "Ukraine talks resume", ""),
            Category::World
        );
    }

    #[test]
    fn proxy_profile_files_climate_under_environment() {
        let url = "https://news.google.com/rss/articles/CBMiabc";
        let headline = "Climate summit draws leaders to Brazil";
        assert_eq!(Classifier::associated_press().classify(url, headline, ""), Category::Science);
        assert_eq!(
            Classifier::associated_press_proxy().classify(url, headline, ""),
            Category::Environment
        );
        assert_eq!(
            Classifier::associated_press_proxy().classify(url, "New species of frog found", ""),
            Category::Us
        );
        assert_eq!(
            Classifier::associated_press_proxy().classify("https://apnews.com/sports/x", "NASA launch", ""),
            Category::Us
        );
    }

    #[test]
    fn keyword_spacing_is_significant() {
        let ap = Classifier::associated_press();
        assert_eq!(
            ap.classify("https://apnews.com/article/x", "Local fair draws crowds", ""),
            Category::Us
        );
        assert_eq!(
            ap.classify("https://apnews.com/article/x", "New ai rules announced", ""),
            Category::Tech
        );
    }

    #[test]
    fn profiles_have_their_own_defaults() {
        let reuters = Classifier::reuters();
        assert_eq!(reuters.default_category(), Category::World);
        assert_eq!(
            reuters.classify("https://www.reuters.com/business/deal-2025-01-01/", "Merger agreed", ""),
            Category::World
        );
        assert_eq!(
            reuters.classify("https://www.reuters.com/world/us/vote-2025/", "Ukraine aid vote", ""),
            Category::Us
        );
        assert_eq!(
            reuters.classify("https://www.reuters.com/sustainability/x/", "", ""),
            Category::Environment
        );
    }

    #[test]
    fn excerpt_participates_in_keyword_match() {
        let ap = Classifier::associated_press();
        assert_eq!(
            ap.classify("", "A surprising find", "Researchers describe the fossil"),
            Category::Science
        );
    }
}
