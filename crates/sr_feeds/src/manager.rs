use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use sr_core::{Article, ArticleSource, Error, Result};
use tokio::sync::Semaphore;

use crate::config::FeedConfig;
use crate::logging::Logger;
use crate::parser::parse_feed;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_CONCURRENCY: usize = 4;
const USER_AGENT: &str = concat!("serendipity/", env!("CARGO_PKG_VERSION"));

/// Fetches and normalizes a fixed set of feeds.
pub struct FeedManager {
    client: Client,
    feeds: Vec<FeedConfig>,
    semaphore: Arc<Semaphore>,
    logger: Logger,
}

impl FeedManager {
    pub fn new(feeds: Vec<FeedConfig>) -> Result<Self> {
        Self::with_options(feeds, DEFAULT_TIMEOUT, DEFAULT_CONCURRENCY)
    }

    pub fn with_options(
        feeds: Vec<FeedConfig>,
        timeout: Duration,
        max_concurrent: usize,
    ) -> Result<Self> {
        for feed in &feeds {
            feed.validate()?;
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            feeds,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            logger: Logger::new().with_prefix("📡".to_string()),
        })
    }

    pub fn feeds(&self) -> &[FeedConfig] {
        &self.feeds
    }

    /// Case-insensitive lookup, matching either the full name or its first word.
    pub fn find_feed(&self, name: &str) -> Option<&FeedConfig> {
        let wanted = name.trim().to_lowercase();
        self.feeds.iter().find(|feed| {
            let full = feed.name.to_lowercase();
            full == wanted || full.split_whitespace().next() == Some(wanted.as_str())
        })
    }

    /// Download and parse a single feed.
    pub async fn fetch_feed(&self, feed: &FeedConfig) -> Result<Vec<Article>> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::Feed(e.to_string()))?;

        let body = self
            .client
            .get(&feed.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let articles: Vec<Article> = parse_feed(&body)?
            .into_iter()
            .filter_map(|entry| entry.into_article(&feed.name))
            .collect();
        Ok(articles)
    }

    /// Fetch every feed; a failing feed is logged and contributes nothing.
    pub async fn fetch_all(&self) -> Vec<Article> {
        let results = join_all(self.feeds.iter().map(|feed| async move {
            let logger = self.logger.clone().with_prefix(format!("[{}]", feed.name));
            match self.fetch_feed(feed).await {
                Ok(articles) => {
                    logger.info(&format!("✨ {} articles", articles.len()));
                    articles
                }
                Err(e) => {
                    logger.error(&format!("Failed to load feed {}: {}", feed.url, e));
                    Vec::new()
                }
            }
        }))
        .await;

        let articles: Vec<Article> = results.into_iter().flatten().collect();
        self.logger
            .info(&format!("🗞️ {} articles from {} feeds", articles.len(), self.feeds.len()));
        articles
    }
}

#[async_trait]
impl ArticleSource for FeedManager {
    fn name(&self) -> &str {
        "feeds"
    }

    async fn fetch_normalized_articles(&self) -> Vec<Article> {
        self.fetch_all().await
    }
}
