use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sr_core::{Article, ArticleId, ArticleSource};
use sr_engine::{
    EngineConfig, Pick, RecommendationEngine, SimilarityRanker, StopWords, TextVectorizer,
};
use sr_storage::ArticleStore;

fn article(source: &str, n: usize, title: &str, summary: &str) -> Article {
    Article::from_entry(
        source,
        Some(title),
        Some(&format!("https://{}.test/{}", source.to_lowercase(), n)),
        Some(summary),
    )
    .unwrap()
}

fn engine_with(articles: Vec<Article>) -> RecommendationEngine {
    let store = Arc::new(ArticleStore::new());
    store.replace_all(articles);
    RecommendationEngine::new(store, EngineConfig::default().with_stop_words(StopWords::english()))
}

/// Three articles per source, all about overlapping topics.
fn two_source_corpus() -> Vec<Article> {
    vec![
        article("A", 0, "Electric car battery breakthrough", "A new battery chemistry for electric cars"),
        article("A", 1, "Battery factory opens", "The electric battery plant employs thousands"),
        article("A", 2, "Football final tonight", "The match starts at eight"),
        article("B", 3, "Electric car sales soar", "Battery prices fall as electric car demand grows"),
        article("B", 4, "Recycling old batteries", "Battery recycling for electric vehicles"),
        article("B", 5, "Gallery opening in Milan", "Design week brings new furniture"),
    ]
}

#[test]
fn test_two_sources_returns_other_source() {
    let corpus = two_source_corpus();
    let reference = corpus[0].id;
    let engine = engine_with(corpus);

    let result = engine.get_recommendations(reference, 3).unwrap();

    assert_eq!(result.reference.id, reference);
    assert_eq!(result.len(), 3);
    assert!(result.items.iter().all(|r| r.article.source == "B"));
    assert!(result.items.iter().all(|r| r.pick == Pick::Diverse));
    assert_eq!(result.items[0].article.title, "Electric car sales soar");
    assert!(result.items.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_two_sources_backfills_with_same_source() {
    let mut corpus = two_source_corpus();
    corpus.remove(5);
    let reference = corpus[0].id;
    let engine = engine_with(corpus);

    let result = engine.get_recommendations(reference, 3).unwrap();

    let picks: Vec<_> = result
        .items
        .iter()
        .map(|r| (r.article.source.as_str(), r.pick))
        .collect();
    assert_eq!(
        picks,
        vec![("B", Pick::Diverse), ("B", Pick::Diverse), ("A", Pick::Backfill)]
    );
    assert_eq!(result.items[2].article.title, "Battery factory opens");
}

#[test]
fn test_single_article_corpus() {
    let corpus = vec![article("A", 0, "Only story", "Nothing else")];
    let reference = corpus[0].id;
    let engine = engine_with(corpus);

    let result = engine.get_recommendations(reference, 3).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_output_never_contains_reference_or_duplicates() {
    let corpus = two_source_corpus();
    let ids: Vec<ArticleId> = corpus.iter().map(|a| a.id).collect();
    let engine = engine_with(corpus);

    for &reference in &ids {
        for n in 0..8 {
            let result = engine.get_recommendations(reference, n).unwrap();
            let unique: HashSet<_> = result.articles().map(|a| a.id).collect();
            assert_eq!(unique.len(), result.len());
            assert!(!unique.contains(&reference));
            assert_eq!(result.len(), n.min(ids.len() - 1));

            let first_backfill = result
                .items
                .iter()
                .position(|r| r.pick == Pick::Backfill)
                .unwrap_or(result.len());
            assert!(result.items[first_backfill..]
                .iter()
                .all(|r| r.pick == Pick::Backfill));
        }
    }
}

#[test]
fn test_rank_properties() {
    let corpus = two_source_corpus();
    let texts: Vec<&str> = corpus.iter().map(|a| a.full_text.as_str()).collect();
    let vectorizer = TextVectorizer::new(EngineConfig::default().vectorizer);
    let matrix = vectorizer.fit_transform(&texts).unwrap();
    let ranker = SimilarityRanker::new();

    for reference in 0..corpus.len() {
        let ranked = ranker.rank(reference, &matrix).unwrap();
        assert_eq!(ranked.len(), corpus.len() - 1);
        assert!(ranked.iter().all(|c| (0.0..=1.0).contains(&c.score)));
        let row = matrix.row(reference).unwrap();
        assert!((sr_engine::similarity::cosine_similarity(row, row) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_recommendations_are_deterministic() {
    let corpus = two_source_corpus();
    let reference = corpus[1].id;
    let engine = engine_with(corpus);

    let first = engine.get_recommendations(reference, 4).unwrap();
    let second = engine.get_recommendations(reference, 4).unwrap();
    assert_eq!(first, second);
}

struct FixedSource(Vec<Article>);

#[async_trait]
impl ArticleSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch_normalized_articles(&self) -> Vec<Article> {
        self.0.clone()
    }
}

#[tokio::test]
async fn test_refresh_and_ensure_ready() {
    let engine = RecommendationEngine::new(Arc::new(ArticleStore::new()), EngineConfig::default());
    let source = FixedSource(two_source_corpus());

    assert!(!engine.is_ready());
    assert!(engine.ensure_ready(&source).await);
    assert!(engine.is_ready());
    assert_eq!(engine.store().size(), 6);
    assert!(!engine.ensure_ready(&source).await);

    let sample = engine.get_initial_sample(5).unwrap();
    assert_eq!(sample.len(), 5);

    let stale = sample[0].id;
    assert_eq!(engine.refresh(&FixedSource(Vec::new())).await, 0);
    assert!(matches!(
        engine.get_recommendations(stale, 3),
        Err(sr_core::Error::EmptyCorpus)
    ));
}

#[tokio::test]
async fn test_stale_reference_after_refresh() {
    let engine = RecommendationEngine::new(Arc::new(ArticleStore::new()), EngineConfig::default());
    let corpus = two_source_corpus();
    let stale = corpus[0].id;
    engine.refresh(&FixedSource(corpus)).await;
    engine
        .refresh(&FixedSource(vec![article("C", 9, "Fresh", "News")]))
        .await;

    assert!(matches!(
        engine.get_recommendations(stale, 3),
        Err(sr_core::Error::NotFound(id)) if id == stale
    ));
}

/// Counts fetches and takes a while to answer, like a slow set of feeds.
struct SlowSource {
    articles: Vec<Article>,
    fetches: AtomicUsize,
}

#[async_trait]
impl ArticleSource for SlowSource {
    fn name(&self) -> &str {
        "slow"
    }

    async fn fetch_normalized_articles(&self) -> Vec<Article> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.articles.clone()
    }
}

#[tokio::test]
async fn test_concurrent_ensure_ready_fetches_once() {
    let engine = RecommendationEngine::new(Arc::new(ArticleStore::new()), EngineConfig::default());
    let source = SlowSource {
        articles: two_source_corpus(),
        fetches: AtomicUsize::new(0),
    };

    let (a, b, c) = tokio::join!(
        engine.ensure_ready(&source),
        engine.ensure_ready(&source),
        engine.ensure_ready(&source)
    );

    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!([a, b, c].iter().filter(|&&refreshed| refreshed).count(), 1);
    assert!(engine.is_ready());
}

#[tokio::test]
async fn test_concurrent_ensure_ready_shares_a_failed_refresh() {
    let engine = RecommendationEngine::new(Arc::new(ArticleStore::new()), EngineConfig::default());
    let source = SlowSource {
        articles: Vec::new(),
        fetches: AtomicUsize::new(0),
    };

    tokio::join!(engine.ensure_ready(&source), engine.ensure_ready(&source));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    assert!(!engine.is_ready());

    // A later caller still gets to retry
    assert!(engine.ensure_ready(&source).await);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}
