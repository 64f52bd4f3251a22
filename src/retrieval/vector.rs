//! Dense-vector cosine-similarity search over a fixed document set.
//!
//! Ported from `HybridSearch._vector_search` in
//! `original_source/archived/mind_v3_full/src/v3/retrieval/search.py`.

use crate::models::document::{Document, SearchHit};
use crate::retrieval::embedding::cosine_similarity;

/// Scores every document against `query_vector` by cosine similarity,
/// returning hits sorted descending by score and truncated to `top_k`.
#[must_use]
pub fn search(documents: &[&Document], query_vector: &[f32], top_k: usize) -> Vec<SearchHit> {
    let mut scored: Vec<SearchHit> = documents
        .iter()
        .map(|doc| {
            let score = cosine_similarity(query_vector, &doc.vector);
            let mut hit = SearchHit::new(doc, score);
            hit.vector_score = Some(score);
            hit
        })
        .collect();

    // Stable sort: ties keep `documents`' input order (insertion order, by
    // convention of callers) rather than an arbitrary reordering.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}
