use thiserror::Error;

use crate::types::ArticleId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No articles available, try again later")]
    EmptyCorpus,

    #[error("Article not found: {0}")]
    NotFound(ArticleId),

    #[error("Invalid article id: {0}")]
    InvalidId(String),

    #[error("Recommendation engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}
