//! Cosine scoring of corpus vectors and deterministic top-k selection.

use serde::Serialize;
use tracing::warn;

use crate::questions::embedding::EmbeddingVector;
use crate::questions::QuestionsError;

/// Width of the score buckets used for ordering. Scores in the same bucket
/// are tied and fall back to ingestion order.
pub const TIE_EPSILON: f64 = 1e-9;

/// A single ranked hit. `index` points into the corpus the ranker was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub index: usize,
    pub score: f32,
}

/// Cosine similarity in `[-1.0, 1.0]`.
///
/// Returns `0.0` for empty vectors, zero-norm vectors, and dimension mismatches.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }
    if a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Ranks `corpus` against `query` and returns the best `k` hits.
///
/// - `k == 0` is rejected; `k` larger than the corpus is clamped.
/// - Ordering: score descending, then corpus index ascending for ties.
pub fn rank(
    query: &[f32],
    corpus: &[EmbeddingVector],
    k: usize,
) -> Result<Vec<SimilarityResult>, QuestionsError> {
    if k == 0 {
        return Err(QuestionsError::InvalidInput(
            "top_k must be greater than 0".to_string(),
        ));
    }
    if corpus.is_empty() {
        return Err(QuestionsError::EmptyCorpus);
    }

    let mut scored: Vec<SimilarityResult> = corpus
        .iter()
        .enumerate()
        .map(|(index, vector)| SimilarityResult {
            index,
            score: cosine_similarity(query, vector),
        })
        .collect();

    // total order over (bucket desc, index asc); sort_by is stable
    scored.sort_by(|a, b| {
        score_bucket(b.score)
            .cmp(&score_bucket(a.score))
            .then(a.index.cmp(&b.index))
    });
    scored.truncate(k.min(corpus.len()));

    Ok(scored)
}

/// Snaps a score onto the `TIE_EPSILON` grid. Scores live in `[-1, 1]`, so
/// the bucket always fits in an `i64`.
fn score_bucket(score: f32) -> i64 {
    (f64::from(score) / TIE_EPSILON).round() as i64
}
