use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use sr_core::{Article, ArticleId};

/// An immutable, deduplicated corpus as of one ingestion cycle.
#[derive(Debug, Default)]
pub struct CorpusSnapshot {
    articles: Vec<Article>,
    positions: HashMap<ArticleId, usize>,
    loaded: bool,
}

impl CorpusSnapshot {
    /// The "not yet loaded" corpus every store starts with.
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Build a loaded snapshot, keeping the first article seen for each link.
    pub fn from_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        let mut seen_links = HashSet::new();
        let mut kept = Vec::new();
        let mut positions = HashMap::new();

        for article in articles {
            if !seen_links.insert(article.dedup_key().to_string()) {
                continue;
            }
            positions.entry(article.id).or_insert(kept.len());
            kept.push(article);
        }

        Self {
            articles: kept,
            positions,
            loaded: true,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Corpus position of `id`, which is also its row in a vectorized matrix.
    pub fn position(&self, id: ArticleId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get(&self, id: ArticleId) -> Option<&Article> {
        self.position(id).map(|idx| &self.articles[idx])
    }

    /// `min(n, len)` distinct articles chosen uniformly at random.
    pub fn sample(&self, n: usize) -> Vec<Article> {
        let mut rng = rand::thread_rng();
        self.articles
            .choose_multiple(&mut rng, n.min(self.articles.len()))
            .cloned()
            .collect()
    }
}
