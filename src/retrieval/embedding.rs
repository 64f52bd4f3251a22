//! Text embedding: the `Embedder` capability and its deterministic
//! hash-based fallback implementation.

use sha2::{Digest, Sha384};

use crate::Result;

/// A capability for turning text into dense vectors and comparing them.
///
/// Grounded on `EmbeddingService` in
/// `original_source/src/mind/v3/retrieval/embeddings.py`, which tries a
/// real sentence-transformer model first and falls back to
/// [`HashEmbedder`] when one isn't available. This crate never attempts to
/// load an ML runtime: [`HashEmbedder`] is the only implementation
/// shipped, and it is always available.
pub trait Embedder {
    /// The dimension of vectors this embedder produces.
    fn dimensions(&self) -> usize;

    /// Embeds a single piece of text.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding fails.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds a batch of texts. The default implementation embeds each
    /// text independently; implementations with real batching should
    /// override this.
    ///
    /// # Errors
    ///
    /// Returns an error if any text fails to embed.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Cosine similarity between two vectors, in `[-1, 1]` (`[0, 1]` for
    /// non-negative embeddings). Returns `0.0` if either vector has zero
    /// norm.
    fn similarity(&self, u: &[f32], v: &[f32]) -> f32 {
        cosine_similarity(u, v)
    }
}

/// Cosine similarity between two equal-length vectors. Returns `0.0` if
/// either vector has zero norm, or if the vectors have different lengths.
#[must_use]
pub fn cosine_similarity(u: &[f32], v: &[f32]) -> f32 {
    if u.len() != v.len() || u.is_empty() {
        return 0.0;
    }

    let dot: f32 = u.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
    let norm_u = u.iter().map(|a| a * a).sum::<f32>().sqrt();
    let norm_v = v.iter().map(|a| a * a).sum::<f32>().sqrt();

    if norm_u == 0.0 || norm_v == 0.0 {
        return 0.0;
    }

    dot / (norm_u * norm_v)
}

/// Deterministic, hash-based embedding, ported from `HashEmbedding`.
///
/// SHA-384-hashes the input, cycles the digest bytes to fill `dimensions`
/// floats in `[-1, 1]`, then L2-normalizes. Two calls with the same text
/// always produce the same vector; unrelated texts produce near-orthogonal
/// vectors with high probability. Not a substitute for a real embedding
/// model's semantic quality, but requires no external runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dimensions: usize,
    normalize: bool,
}

impl HashEmbedder {
    /// Creates a new hash embedder producing `dimensions`-length,
    /// L2-normalized vectors.
    #[must_use]
    pub const fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            normalize: true,
        }
    }

    /// Disables L2 normalization, consuming and returning `self`. Intended
    /// for tests that want to inspect the raw hash-derived values.
    #[must_use]
    pub const fn without_normalization(mut self) -> Self {
        self.normalize = false;
        self
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let digest = Sha384::digest(text.as_bytes());

        let mut vector: Vec<f32> = (0..self.dimensions)
            .map(|i| {
                let byte = digest[i % digest.len()];
                (f32::from(byte) / 127.5) - 1.0
            })
            .collect();

        if self.normalize {
            let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in &mut vector {
                    *v /= norm;
                }
            }
        }

        Ok(vector)
    }
}
