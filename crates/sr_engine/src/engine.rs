use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use sr_core::{Article, ArticleId, ArticleSource, Error, Result};
use sr_storage::ArticleStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::rerank::{DiversityReranker, Recommendation};
use crate::similarity::SimilarityRanker;
use crate::vectorizer::{TextVectorizer, TfidfMatrix};

/// Steps of a single recommendation request. There is no way back: a
/// failure while vectorizing or ranking aborts the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Vectorizing,
    Ranking,
    Reranking,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Vectorizing => "vectorizing",
            Stage::Ranking => "ranking",
            Stage::Reranking => "reranking",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub reference: Article,
    pub items: Vec<Recommendation>,
}

impl RecommendationResult {
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.items.iter().map(|r| &r.article)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct RecommendationEngine {
    store: Arc<ArticleStore>,
    config: EngineConfig,
    vectorizer: TextVectorizer,
    ranker: SimilarityRanker,
    reranker: DiversityReranker,
    refresh_lock: Mutex<()>,
    refreshes: AtomicU64,
}

impl fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("corpus", &self.store.size())
            .field("stop_words", &self.config.vectorizer.stop_words.to_string())
            .field("top_n", &self.config.top_n)
            .finish()
    }
}

impl RecommendationEngine {
    pub fn new(store: Arc<ArticleStore>, config: EngineConfig) -> Self {
        info!(
            "🧠 Recommendation engine ready (stop words: {})",
            config.vectorizer.stop_words
        );
        Self {
            vectorizer: TextVectorizer::new(config.vectorizer.clone()),
            store,
            config,
            ranker: SimilarityRanker::new(),
            reranker: DiversityReranker::new(),
            refresh_lock: Mutex::new(()),
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<ArticleStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True once the corpus is large enough to serve requests.
    pub fn is_ready(&self) -> bool {
        self.store.size() >= self.config.ready_threshold
    }

    pub fn get_initial_sample(&self, n: usize) -> Result<Vec<Article>> {
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(snapshot.sample(n))
    }

    pub fn get_article(&self, id: ArticleId) -> Result<Article> {
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        snapshot.get(id).cloned().ok_or(Error::NotFound(id))
    }

    /// Articles similar to `reference_id`, preferring other sources.
    ///
    /// The whole request runs against one corpus snapshot, so a concurrent
    /// refresh cannot change the corpus halfway through.
    pub fn get_recommendations(
        &self,
        reference_id: ArticleId,
        n: usize,
    ) -> Result<RecommendationResult> {
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let position = snapshot
            .position(reference_id)
            .ok_or(Error::NotFound(reference_id))?;
        let reference = snapshot.articles()[position].clone();
        let mut stage = Stage::Idle;

        stage = self.advance(stage, Stage::Vectorizing, reference_id);
        let texts: Vec<&str> = snapshot
            .articles()
            .iter()
            .map(|a| a.full_text.as_str())
            .collect();
        let matrix = self.vectorize(&texts)?;

        stage = self.advance(stage, Stage::Ranking, reference_id);
        let ranked = self.ranker.rank(position, &matrix).map_err(|e| {
            warn!("Ranking failed for {}: {}", reference_id, e);
            Error::NotFound(reference_id)
        })?;

        stage = self.advance(stage, Stage::Reranking, reference_id);
        let items = self
            .reranker
            .select_top_n(&ranked, snapshot.articles(), &reference.source, n);

        self.advance(stage, Stage::Done, reference_id);
        Ok(RecommendationResult { reference, items })
    }

    /// Fetch a fresh corpus from `source` and swap it in.
    pub async fn refresh(&self, source: &dyn ArticleSource) -> usize {
        info!("🔄 Refreshing corpus from {}", source.name());
        let articles = source.fetch_normalized_articles().await;
        let size = self.store.replace_all(articles);
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        size
    }

    /// Refresh only when the corpus is not ready yet. Returns whether a
    /// refresh happened.
    ///
    /// Concurrent callers share one refresh: whoever waited on the lock
    /// while another refresh completed returns without fetching again.
    pub async fn ensure_ready(&self, source: &dyn ArticleSource) -> bool {
        if self.is_ready() {
            return false;
        }
        let seen = self.refreshes.load(Ordering::SeqCst);
        let _guard = self.refresh_lock.lock().await;
        if self.is_ready() || self.refreshes.load(Ordering::SeqCst) != seen {
            return false;
        }
        self.refresh(source).await;
        true
    }

    /// Vectorize with the configured stop words, retrying once without them.
    fn vectorize(&self, texts: &[&str]) -> Result<TfidfMatrix> {
        match self.vectorizer.fit_transform(texts) {
            Ok(matrix) => Ok(matrix),
            Err(e) if self.vectorizer.stop_words().is_active() => {
                warn!("⚠️ Vectorization failed ({}), retrying without stop words", e);
                self.vectorizer
                    .unfiltered()
                    .fit_transform(texts)
                    .map_err(|e| Error::EngineUnavailable(e.to_string()))
            }
            Err(e) => Err(Error::EngineUnavailable(e.to_string())),
        }
    }

    fn advance(&self, from: Stage, to: Stage, reference_id: ArticleId) -> Stage {
        debug!("Recommendation {}: {} -> {}", reference_id, from, to);
        to
    }
}
