use crate::traits::ArticleSource;
use crate::types::{Article, Category, LookbackWindow, Result};
use crate::Fetcher;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use tracing::info;

const EXCERPT: &str = "Lawfare's weekly roundup: a comprehensive summary of the week's national security law and policy coverage.";

/// A weekly roundup published at a predictable URL every Friday.
///
/// Nothing is fetched; the page is probed with a HEAD request and a record is
/// emitted only once it exists.
pub struct WeeklyProbeSource {
    pub name: String,
}

impl WeeklyProbeSource {
    pub fn lawfare() -> Self {
        Self {
            name: "Lawfare".to_string(),
        }
    }

    /// The publish date worth probing at `now`: today on Friday, yesterday on
    /// Saturday, nothing otherwise.
    pub fn candidate_date(now: DateTime<Utc>) -> Option<NaiveDate> {
        let today = now.date_naive();
        match today.weekday() {
            Weekday::Fri => Some(today),
            Weekday::Sat => Some(today - Duration::days(1)),
            _ => None,
        }
    }

    pub fn url_for(date: NaiveDate) -> String {
        format!(
            "https://www.lawfaremedia.org/article/the-week-that-was-{}-{}-{}",
            date.month(),
            date.day(),
            date.year()
        )
    }

    pub fn article_for(&self, date: NaiveDate) -> Article {
        let title = format!("The Week That Was — {}", date.format("%B %-d, %Y"));
        let published = date
            .and_hms_opt(18, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
        Article::new(title, Self::url_for(date), self.name.clone(), Category::Longform)
            .with_excerpt(EXCERPT)
            .with_published(published)
    }
}

#[async_trait]
impl ArticleSource for WeeklyProbeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self, fetcher: &Fetcher, window: &LookbackWindow) -> Result<Vec<Article>> {
        let Some(date) = Self::candidate_date(window.now) else {
            return Ok(Vec::new());
        };

        let url = Self::url_for(date);
        if !fetcher.probe(&url).await? {
            info!("{}: weekly page not ready yet", self.name);
            return Ok(Vec::new());
        }

        info!("{}: found weekly roundup for {}", self.name, date);
        Ok(vec![self.article_for(date)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_only_on_friday_and_saturday() {
        let friday = Utc.with_ymd_and_hms(2025, 3, 7, 20, 0, 0).unwrap();
        let saturday = Utc.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap();
        let sunday = Utc.with_ymd_and_hms(2025, 3, 9, 9, 0, 0).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7);
        assert_eq!(WeeklyProbeSource::candidate_date(friday), expected);
        assert_eq!(WeeklyProbeSource::candidate_date(saturday), expected);
        assert_eq!(WeeklyProbeSource::candidate_date(sunday), None);
    }

    #[test]
    fn url_and_title_are_not_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            WeeklyProbeSource::url_for(date),
            "https://www.lawfaremedia.org/article/the-week-that-was-3-7-2025"
        );
        let article = WeeklyProbeSource::lawfare().article_for(date);
        assert_eq!(article.title, "The Week That Was — March 7, 2025");
        assert_eq!(article.category, Category::Longform);
        assert_eq!(
            article.published,
            Some(Utc.with_ymd_and_hms(2025, 3, 7, 18, 0, 0).unwrap())
        );
    }
}
