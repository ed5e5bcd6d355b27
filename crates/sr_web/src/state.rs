use std::sync::Arc;

use sr_core::ArticleSource;
use sr_engine::RecommendationEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    /// Where a refresh pulls the corpus from
    pub source: Arc<dyn ArticleSource>,
}

impl AppState {
    pub fn new(engine: Arc<RecommendationEngine>, source: Arc<dyn ArticleSource>) -> Self {
        Self { engine, source }
    }
}
