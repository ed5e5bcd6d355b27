use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sr_core::{Article, ArticleId, Error};
use sr_engine::RecommendationResult;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct CountParams {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub articles: usize,
}

pub async fn sample_articles(
    State(state): State<AppState>,
    Query(params): Query<CountParams>,
) -> ApiResult<Vec<Article>> {
    state.engine.ensure_ready(state.source.as_ref()).await;
    let n = params.n.unwrap_or(state.engine.config().sample_size);
    Ok(Json(state.engine.get_initial_sample(n)?))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Article> {
    let id: ArticleId = id.parse()?;
    Ok(Json(state.engine.get_article(id)?))
}

pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CountParams>,
) -> ApiResult<RecommendationResult> {
    let id: ArticleId = id.parse()?;
    state.engine.ensure_ready(state.source.as_ref()).await;
    let n = params.n.unwrap_or(state.engine.config().top_n);

    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.get_recommendations(id, n))
        .await
        .map_err(|e| Error::External(anyhow::anyhow!("recommendation task failed: {}", e)))??;

    info!(
        "🎲 {} recommendations for '{}'",
        result.len(),
        result.reference.title
    );
    Ok(Json(result))
}

pub async fn refresh(State(state): State<AppState>) -> ApiResult<RefreshResponse> {
    let articles = state.engine.refresh(state.source.as_ref()).await;
    Ok(Json(RefreshResponse { articles }))
}
