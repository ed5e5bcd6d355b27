use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorizationError {
    #[error("cannot vectorize an empty corpus")]
    NoDocuments,

    #[error("empty vocabulary after stop-word filtering ({documents} documents)")]
    EmptyVocabulary { documents: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankingError {
    #[error("reference row {index} not in matrix of {rows} rows")]
    ReferenceNotFound { index: usize, rows: usize },
}
