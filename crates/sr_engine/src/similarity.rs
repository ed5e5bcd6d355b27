use std::cmp::Ordering;

use serde::Serialize;

use crate::error::RankingError;
use crate::vectorizer::{SparseVector, TfidfMatrix};

/// A corpus row and its similarity to the reference row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub index: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityRanker;

impl SimilarityRanker {
    pub fn new() -> Self {
        Self
    }

    /// Score every row against `reference`, most similar first.
    ///
    /// Ties keep corpus order. The reference row itself is not returned.
    pub fn rank(
        &self,
        reference: usize,
        matrix: &TfidfMatrix,
    ) -> Result<Vec<ScoredCandidate>, RankingError> {
        let reference_row = matrix.row(reference).ok_or(RankingError::ReferenceNotFound {
            index: reference,
            rows: matrix.n_rows(),
        })?;

        let mut scored: Vec<ScoredCandidate> = matrix
            .rows()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != reference)
            .map(|(index, row)| ScoredCandidate {
                index,
                score: cosine_similarity(reference_row, row),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });

        Ok(scored)
    }
}

/// Cosine of the angle between `a` and `b`, clamped to `[0, 1]`.
///
/// Zero vectors are orthogonal to everything, themselves included.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}
