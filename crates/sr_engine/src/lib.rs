//! Serendipitous recommendation engine: TF-IDF relevance combined with a
//! source-diversity constraint.

pub mod config;
pub mod engine;
pub mod error;
pub mod rerank;
pub mod similarity;
pub mod stopwords;
pub mod vectorizer;

pub use config::{EngineConfig, VectorizerConfig};
pub use engine::{RecommendationEngine, RecommendationResult, Stage};
pub use error::{RankingError, VectorizationError};
pub use rerank::{DiversityReranker, Pick, Recommendation};
pub use similarity::{ScoredCandidate, SimilarityRanker};
pub use stopwords::{StopWordList, StopWords};
pub use vectorizer::{SparseVector, TextVectorizer, TfidfMatrix};

pub mod prelude {
    pub use super::{EngineConfig, RecommendationEngine, RecommendationResult, StopWords};
    pub use sr_core::{Article, ArticleId, Error, Result};
}
