use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sr_core::{Error, Result};
use url::Url;

/// One syndication feed. `name` becomes the `source` of its articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config(format!("Feed without a name: {}", self.url)));
        }
        let url = Url::parse(&self.url)
            .map_err(|e| Error::Config(format!("Invalid feed URL for {}: {}", self.name, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::Config(format!(
                "Unsupported scheme '{}' for feed {}",
                scheme, self.name
            ))),
        }
    }
}

/// Deliberately unrelated outlets, so that recommendations cross topics.
pub fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("TechCrunch (Tech)", "http://feeds.feedburner.com/TechCrunch/startups"),
        FeedConfig::new("LeMonde (Planète/Science)", "http://www.lemonde.fr/planete/rss_full.xml"),
        FeedConfig::new(
            "CourrierInt (Histoire/Culture)",
            "https://www.courrierinternational.com/feed/rss/toute-lactualite/histoire",
        ),
        FeedConfig::new("Dezeen (Design/Art)", "https://www.dezeen.com/feed/"),
        FeedConfig::new("LesEchos (Économie)", "https://www.lesechos.fr/rss/lesechos_economie.xml"),
    ]
}

/// Read a JSON array of feeds, e.g. `[{"name": "...", "url": "..."}]`.
pub fn load_feeds(path: impl AsRef<Path>) -> Result<Vec<FeedConfig>> {
    let contents = fs::read_to_string(path.as_ref())?;
    let feeds: Vec<FeedConfig> = serde_json::from_str(&contents)?;
    if feeds.is_empty() {
        return Err(Error::Config(format!(
            "No feeds configured in {}",
            path.as_ref().display()
        )));
    }
    for feed in &feeds {
        feed.validate()?;
    }
    Ok(feeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_feeds_are_valid() {
        let feeds = default_feeds();
        assert_eq!(feeds.len(), 5);
        for feed in &feeds {
            assert!(feed.validate().is_ok(), "{:?}", feed);
        }
    }

    #[test]
    fn test_validate() {
        assert!(FeedConfig::new("x", "not a url").validate().is_err());
        assert!(FeedConfig::new("x", "ftp://example.com/feed").validate().is_err());
        assert!(FeedConfig::new(" ", "https://example.com/feed").validate().is_err());
    }

    #[test]
    fn test_load_feeds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Example", "url": "https://example.com/rss"}}]"#).unwrap();

        let feeds = load_feeds(file.path()).unwrap();
        assert_eq!(feeds, vec![FeedConfig::new("Example", "https://example.com/rss")]);
    }

    #[test]
    fn test_load_feeds_errors() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(load_feeds(empty.path()), Err(Error::Config(_))));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{").unwrap();
        assert!(matches!(load_feeds(broken.path()), Err(Error::Serialization(_))));

        assert!(matches!(load_feeds("/no/such/feeds.json"), Err(Error::Io(_))));
    }
}
