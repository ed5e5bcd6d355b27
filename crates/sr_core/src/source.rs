use async_trait::async_trait;

use crate::types::Article;

/// Anything able to produce a fresh, normalized batch of articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Human readable name, used in logs
    fn name(&self) -> &str;

    /// Fetch every article this source knows about.
    ///
    /// Failures of individual feeds are reported out of band and simply
    /// contribute no articles, so this never fails as a whole.
    async fn fetch_normalized_articles(&self) -> Vec<Article>;
}
