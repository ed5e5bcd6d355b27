//! Source-diversity reranking of a similarity ranking.
//!
//! The first pass only accepts candidates from a different source than the
//! reference article. When that cannot fill the list, a second pass walks the
//! same ranking again and backfills with the most relevant candidates that
//! were not picked yet, whatever their source.

use std::collections::HashSet;

use serde::Serialize;
use sr_core::{Article, ArticleId};
use tracing::debug;

use crate::similarity::ScoredCandidate;

/// Which pass selected a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pick {
    /// From another source than the reference
    Diverse,
    /// Relevance backfill once diverse candidates ran out
    Backfill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub article: Article,
    pub score: f64,
    pub pick: Pick,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiversityReranker;

impl DiversityReranker {
    pub fn new() -> Self {
        Self
    }

    /// Pick up to `n` articles from `ranked`, which must be sorted by
    /// descending score and must not contain the reference itself.
    ///
    /// `articles` is the corpus the candidate indices point into. Candidates
    /// with an out-of-range index are skipped.
    pub fn select_top_n(
        &self,
        ranked: &[ScoredCandidate],
        articles: &[Article],
        reference_source: &str,
        n: usize,
    ) -> Vec<Recommendation> {
        let mut picks = Vec::with_capacity(n.min(ranked.len()));
        let mut accepted: HashSet<ArticleId> = HashSet::with_capacity(n);

        if n == 0 {
            return picks;
        }

        for candidate in ranked {
            let Some(article) = articles.get(candidate.index) else {
                continue;
            };
            if article.source != reference_source && accepted.insert(article.id) {
                picks.push(Recommendation {
                    article: article.clone(),
                    score: candidate.score,
                    pick: Pick::Diverse,
                });
                if picks.len() >= n {
                    return picks;
                }
            }
        }

        let diverse = picks.len();
        for candidate in ranked {
            let Some(article) = articles.get(candidate.index) else {
                continue;
            };
            if accepted.insert(article.id) {
                picks.push(Recommendation {
                    article: article.clone(),
                    score: candidate.score,
                    pick: Pick::Backfill,
                });
                if picks.len() >= n {
                    break;
                }
            }
        }

        if picks.len() > diverse {
            debug!(
                "Backfilled {} of {} recommendations from '{}'",
                picks.len() - diverse,
                picks.len(),
                reference_source
            );
        }
        picks
    }
}
