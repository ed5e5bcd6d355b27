use std::sync::{Arc, PoisonError, RwLock};

use sr_core::{Article, ArticleId};
use tracing::info;

use crate::snapshot::CorpusSnapshot;

/// In-memory article store.
///
/// The active corpus is an immutable [`CorpusSnapshot`] behind an `Arc`.
/// A refresh builds a whole new snapshot and swaps the pointer, so readers
/// always observe either the old or the new corpus in full. The lock is only
/// held for the pointer clone or swap.
#[derive(Debug)]
pub struct ArticleStore {
    current: RwLock<Arc<CorpusSnapshot>>,
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CorpusSnapshot::unloaded())),
        }
    }

    /// A consistent view of the corpus, valid for as long as the caller holds it.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_loaded()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn size(&self) -> usize {
        self.snapshot().len()
    }

    pub fn get_by_id(&self, id: ArticleId) -> Option<Article> {
        self.snapshot().get(id).cloned()
    }

    pub fn sample_random(&self, n: usize) -> Vec<Article> {
        self.snapshot().sample(n)
    }

    /// Replace the whole corpus. Returns the number of articles kept after
    /// deduplicating by link.
    pub fn replace_all(&self, articles: Vec<Article>) -> usize {
        let received = articles.len();
        let snapshot = Arc::new(CorpusSnapshot::from_articles(articles));
        let kept = snapshot.len();

        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;

        info!(
            "📚 Corpus replaced: {} articles ({} duplicates dropped)",
            kept,
            received - kept
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    fn articles(prefix: &str, count: usize) -> Vec<Article> {
        (0..count)
            .map(|i| {
                Article::from_entry(
                    prefix,
                    Some(&format!("{prefix} title {i}")),
                    Some(&format!("https://{prefix}.test/{i}")),
                    Some("summary"),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_store_lifecycle() {
        let store = ArticleStore::new();
        assert!(store.is_empty());
        assert!(!store.is_loaded());
        assert_eq!(store.size(), 0);
        assert!(store.sample_random(5).is_empty());

        let batch = articles("a", 3);
        let first = batch[0].clone();
        assert_eq!(store.replace_all(batch), 3);
        assert!(store.is_loaded());
        assert_eq!(store.size(), 3);
        assert_eq!(store.get_by_id(first.id), Some(first.clone()));

        store.replace_all(articles("b", 2));
        assert_eq!(store.size(), 2);
        assert!(store.get_by_id(first.id).is_none());
    }

    #[test]
    fn test_replace_all_with_nothing_is_loaded_but_empty() {
        let store = ArticleStore::new();
        assert_eq!(store.replace_all(Vec::new()), 0);
        assert!(store.is_loaded());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_dedups() {
        let store = ArticleStore::new();
        let mut batch = articles("a", 2);
        batch.extend(articles("a", 2));
        assert_eq!(store.replace_all(batch), 2);
    }

    #[test]
    fn test_held_snapshot_survives_refresh() {
        let store = ArticleStore::new();
        store.replace_all(articles("a", 4));
        let held = store.snapshot();

        store.replace_all(articles("b", 1));
        assert_eq!(held.len(), 4);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_concurrent_refresh_and_sample() {
        let store = Arc::new(ArticleStore::new());
        let old = articles("old", 20);
        let new = articles("new", 20);
        let known: HashSet<ArticleId> = old.iter().chain(new.iter()).map(|a| a.id).collect();
        let old_ids: HashSet<ArticleId> = old.iter().map(|a| a.id).collect();
        store.replace_all(old.clone());

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let batch = if i % 2 == 0 { new.clone() } else { old.clone() };
                    store.replace_all(batch);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                let known = known.clone();
                let old_ids = old_ids.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let sample = store.sample_random(10);
                        assert_eq!(sample.len(), 10);
                        assert!(sample.iter().all(|a| known.contains(&a.id)));
                        // A sample never mixes the two corpora.
                        let from_old = sample.iter().filter(|a| old_ids.contains(&a.id)).count();
                        assert!(from_old == 0 || from_old == sample.len());
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
