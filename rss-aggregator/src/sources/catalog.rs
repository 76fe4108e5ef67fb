use crate::sources::{RssFeedSource, SearchProxySource, WeeklyProbeSource};
use crate::traits::ArticleSource;
use crate::types::Category;

/// (source name, feed URL, category)
pub const FEEDS: &[(&str, &str, Category)] = &[
    // World
    ("BBC News", "https://feeds.bbci.co.uk/news/world/rss.xml", Category::World),
    ("NPR World", "https://feeds.npr.org/1004/rss.xml", Category::World),
    // U.S.
    ("BBC U.S.", "https://feeds.bbci.co.uk/news/world/us_and_canada/rss.xml", Category::Us),
    ("NPR Politics", "https://feeds.npr.org/1014/rss.xml", Category::Us),
    ("NPR U.S.", "https://feeds.npr.org/1003/rss.xml", Category::Us),
    // Science
    ("BBC Science", "https://feeds.bbci.co.uk/news/science_and_environment/rss.xml", Category::Science),
    ("NPR Science", "https://feeds.npr.org/1007/rss.xml", Category::Science),
    ("Quanta Magazine", "https://api.quantamagazine.org/feed/", Category::Science),
    ("Nature", "https://www.nature.com/nature.rss", Category::Science),
    // Tech
    ("Ars Technica", "https://feeds.arstechnica.com/arstechnica/index", Category::Tech),
    ("The Verge", "https://www.theverge.com/rss/index.xml", Category::Tech),
    ("NPR Technology", "https://feeds.npr.org/1019/rss.xml", Category::Tech),
    ("Wired", "https://www.wired.com/feed/rss", Category::Tech),
    // Environment
    ("Grist", "https://grist.org/feed/", Category::Environment),
    ("Inside Climate News", "https://insideclimatenews.org/feed/", Category::Environment),
    ("Yale E360", "https://e360.yale.edu/feed.xml", Category::Environment),
    // Local
    ("KETV Omaha", "https://www.ketv.com/topstories-rss", Category::Local),
    ("Nebraska Examiner", "https://nebraskaexaminer.com/feed/", Category::Local),
    ("Flatwater Free Press", "https://flatwaterfreepress.org/feed/", Category::Local),
    // Libraries
    ("American Libraries", "https://americanlibrariesmagazine.org/feed/", Category::Libraries),
    ("LISNews", "https://lisnews.org/feed/", Category::Libraries),
    ("librarian.net", "https://librarian.net/feed/", Category::Libraries),
    ("Library Technology Guides", "https://librarytechnology.org/rss", Category::Libraries),
    // Additional U.S. and world
    ("The Hill", "https://thehill.com/homenews/feed/", Category::Us),
    ("PBS NewsHour", "https://www.pbs.org/newshour/feeds/rss/headlines", Category::Us),
    ("Al Jazeera", "https://www.aljazeera.com/xml/rss/all.xml", Category::World),
    // Long reads
    ("The Atlantic", "https://www.theatlantic.com/feed/all/", Category::Longform),
    ("The New Yorker", "https://www.newyorker.com/feed/everything", Category::Longform),
    ("Bellingcat", "https://www.bellingcat.com/feed/", Category::Longform),
    ("ProPublica", "https://www.propublica.org/feeds/propublica/main", Category::Longform),
    ("Foreign Affairs", "https://www.foreignaffairs.com/rss.xml", Category::Longform),
    ("Foreign Policy", "https://foreignpolicy.com/feed/", Category::Longform),
];

/// Every configured feed, then the search-proxy publishers, then the weekly probe.
pub fn default_sources() -> Vec<Box<dyn ArticleSource>> {
    let mut sources: Vec<Box<dyn ArticleSource>> = FEEDS
        .iter()
        .map(|(name, url, category)| {
            Box::new(RssFeedSource::new(*name, *url, *category)) as Box<dyn ArticleSource>
        })
        .collect();
    sources.push(Box::new(SearchProxySource::associated_press()));
    sources.push(Box::new(SearchProxySource::reuters()));
    sources.push(Box::new(WeeklyProbeSource::lawfare()));
    sources
}
