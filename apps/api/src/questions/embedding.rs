//! Text encoders that turn problem statements and job descriptions into
//! fixed-length vectors.
//!
//! `FastEmbedder` runs all-MiniLM-L6-v2 locally through fastembed (ONNX).
//! `HashEmbedder` is a deterministic feature-hashing fallback that needs no
//! model download; it backs offline runs and the unit tests.

use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use siphasher::sip::SipHasher13;
use tracing::{debug, info};

use crate::questions::QuestionsError;

/// A single embedding. Dimensionality is fixed by the model that produced it.
pub type EmbeddingVector = Vec<f32>;

/// Output dimensionality of all-MiniLM-L6-v2.
pub const MINILM_DIMENSION: usize = 384;

/// Deterministic text encoder. Implementations must be safe for concurrent reads.
pub trait TextEmbedder: Send + Sync {
    fn model_name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Encodes a single text. Whitespace-only input is rejected.
    fn encode(&self, text: &str) -> Result<EmbeddingVector, QuestionsError> {
        let mut vectors = self.encode_batch(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| QuestionsError::EncodingError("encoder returned no vector".to_string()))
    }

    /// Encodes `texts` preserving order and cardinality.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, QuestionsError>;
}

/// Trims every input and rejects the batch if any element is empty.
fn prepare_batch(texts: &[String]) -> Result<Vec<&str>, QuestionsError> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(QuestionsError::EncodingError(format!(
                    "input {i} is empty after trimming"
                )))
            } else {
                Ok(trimmed)
            }
        })
        .collect()
}

fn check_cardinality(expected: usize, got: usize) -> Result<(), QuestionsError> {
    if expected != got {
        return Err(QuestionsError::EncodingError(format!(
            "encoder returned {got} vectors for {expected} inputs"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// FastEmbedder
// ────────────────────────────────────────────────────────────────────────────

/// Local sentence-embedding model via fastembed.
///
/// Loading downloads the ONNX weights into `cache_dir` on first use and is
/// slow; call it from a blocking thread.
pub struct FastEmbedder {
    // fastembed needs exclusive access for inference
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl FastEmbedder {
    pub fn load(cache_dir: PathBuf) -> Result<Self, QuestionsError> {
        let model = EmbeddingModel::AllMiniLML6V2;
        info!("Loading embedding model {:?} (cache: {})", model, cache_dir.display());

        let options = InitOptions::new(model.clone())
            .with_cache_dir(cache_dir)
            .with_show_download_progress(false);

        let embedding = TextEmbedding::try_new(options).map_err(|e| {
            QuestionsError::ModelUnavailable(format!("failed to initialize fastembed model: {e}"))
        })?;

        Ok(Self {
            model: Mutex::new(embedding),
            model_name: format!("{model:?}"),
        })
    }
}

impl TextEmbedder for FastEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        MINILM_DIMENSION
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, QuestionsError> {
        let inputs = prepare_batch(texts)?;
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut model = self
            .model
            .lock()
            .map_err(|_| QuestionsError::ModelUnavailable("embedding model lock poisoned".to_string()))?;

        let vectors = model
            .embed(inputs, None)
            .map_err(|e| QuestionsError::EncodingError(format!("fastembed inference failed: {e}")))?;

        check_cardinality(texts.len(), vectors.len())?;
        debug!("Encoded {} texts with {}", vectors.len(), self.model_name);
        Ok(vectors)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HashEmbedder
// ────────────────────────────────────────────────────────────────────────────

// Changing these keys changes every vector.
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Feature-hashing embedder over lowercased alphanumeric tokens.
///
/// SipHash-1-3 with fixed keys keeps vectors stable across Rust versions.
/// Output is L2-normalised; text without any tokens maps to the zero vector.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(&self, token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        hasher.finish()
    }

    fn embed_one(&self, text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let h = self.hash(&token);
            let idx = (h % self.dimension as u64) as usize;
            // high bit picks the sign so collisions partly cancel
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(MINILM_DIMENSION)
    }
}

impl TextEmbedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "feature-hash-v1"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, QuestionsError> {
        let inputs = prepare_batch(texts)?;
        Ok(inputs.into_iter().map(|t| self.embed_one(t)).collect())
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::ranker::cosine_similarity;

    #[test]
    fn test_hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.encode("Given an array of integers, return two indices").unwrap();
        let b = embedder.encode("Given an array of integers, return two indices").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), MINILM_DIMENSION);
    }

    #[test]
    fn test_hash_embedder_normalizes() {
        let v = HashEmbedder::default().encode("binary tree level order").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn test_hash_embedder_ignores_case_and_punctuation() {
        let embedder = HashEmbedder::default();
        let a = embedder.encode("Linked List, Cycle!").unwrap();
        let b = embedder.encode("linked list cycle").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_related_text_scores_higher_than_unrelated() {
        let embedder = HashEmbedder::default();
        let query = embedder.encode("graph shortest path dijkstra").unwrap();
        let related = embedder.encode("find the shortest path in a weighted graph").unwrap();
        let unrelated = embedder.encode("reverse the characters of a string").unwrap();
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[test]
    fn test_encode_rejects_blank_input() {
        let err = HashEmbedder::default().encode("   \n\t").unwrap_err();
        assert!(matches!(err, QuestionsError::EncodingError(_)));
    }

    #[test]
    fn test_encode_batch_preserves_order_and_cardinality() {
        let embedder = HashEmbedder::default();
        let texts = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        let batch = embedder.encode_batch(&texts).unwrap();
        assert_eq!(batch.len(), 3);
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(&embedder.encode(text).unwrap(), vector);
        }
    }

    #[test]
    fn test_encode_batch_rejects_any_blank_element() {
        let texts = vec!["alpha".to_string(), " ".to_string()];
        assert!(HashEmbedder::default().encode_batch(&texts).is_err());
    }

    #[test]
    fn test_symbol_only_text_is_zero_vector() {
        let v = HashEmbedder::new(8).encode("+++").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
