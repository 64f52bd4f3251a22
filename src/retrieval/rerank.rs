//! Result reranking: the `Reranker` trait, its keyword-overlap
//! implementation, and a cross-encoder-shaped implementation that falls
//! back to keyword overlap when no scorer is supplied.
//!
//! Ported from `SimpleReranker`/`Reranker` in
//! `original_source/src/mind/v3/retrieval/reranker.py`, whose `Reranker`
//! tries to load a `CrossEncoder` model and falls back to
//! `SimpleReranker` if that import fails. [`CrossEncoderReranker`] mirrors
//! that try-at-construction-time fallback shape without an ML runtime
//! dependency, by taking an optional `(query, text) -> f32` scorer instead
//! of a model name to load.

use crate::models::document::SearchHit;
use crate::retrieval::bm25::tokenize;

/// A capability for re-scoring an already-ranked list of hits against the
/// original query.
pub trait Reranker {
    /// Re-scores and re-sorts `hits` against `query`, returning at most
    /// `top_k` results.
    fn rerank(&self, query: &str, hits: &[SearchHit], top_k: usize) -> Vec<SearchHit>;
}

/// Reranks by query-term overlap: occurrence count normalized by document
/// length, plus a flat boost per distinct query term matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordOverlapReranker;

impl KeywordOverlapReranker {
    /// Creates a new keyword-overlap reranker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reranker for KeywordOverlapReranker {
    fn rerank(&self, query: &str, hits: &[SearchHit], top_k: usize) -> Vec<SearchHit> {
        if hits.is_empty() {
            return Vec::new();
        }

        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            let mut hits = hits.to_vec();
            hits.truncate(top_k);
            return hits;
        }

        let query_token_set: std::collections::HashSet<&str> =
            query_tokens.iter().map(String::as_str).collect();

        let mut scored: Vec<SearchHit> = hits
            .iter()
            .map(|hit| {
                let doc_tokens = tokenize(&hit.text);
                let score = if doc_tokens.is_empty() {
                    0.0
                } else {
                    let mut counts = std::collections::HashMap::new();
                    for token in &doc_tokens {
                        *counts.entry(token.as_str()).or_insert(0u32) += 1;
                    }
                    let overlap: u32 = query_tokens
                        .iter()
                        .map(|t| counts.get(t.as_str()).copied().unwrap_or(0))
                        .sum();

                    let doc_token_set: std::collections::HashSet<&str> =
                        doc_tokens.iter().map(String::as_str).collect();
                    let unique_matches =
                        query_token_set.intersection(&doc_token_set).count() as f32;

                    (overlap as f32 / doc_tokens.len() as f32) + unique_matches * 0.1
                };

                let mut rescored = hit.clone();
                rescored.score = score;
                rescored
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

/// A `(query, document text) -> relevance score` function, standing in
/// for a cross-encoder model's `predict` call.
pub type CrossEncoderScorer = Box<dyn Fn(&str, &str) -> f32 + Send + Sync>;

/// Reranker that delegates to an injected cross-encoder-shaped scorer,
/// falling back to [`KeywordOverlapReranker`] when none is supplied, so
/// callers without an ML runtime still get a working reranker.
pub struct CrossEncoderReranker {
    scorer: Option<CrossEncoderScorer>,
    fallback: KeywordOverlapReranker,
}

impl CrossEncoderReranker {
    /// Creates a reranker with no scorer attached; every call falls back
    /// to keyword overlap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scorer: None,
            fallback: KeywordOverlapReranker::new(),
        }
    }

    /// Creates a reranker that scores `(query, text)` pairs with `scorer`.
    #[must_use]
    pub fn with_scorer(scorer: CrossEncoderScorer) -> Self {
        Self {
            scorer: Some(scorer),
            fallback: KeywordOverlapReranker::new(),
        }
    }

    /// Whether this reranker is running the keyword-overlap fallback
    /// rather than a supplied scorer.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.scorer.is_none()
    }
}

impl Default for CrossEncoderReranker {
    fn default() -> Self {
        Self::new()
    }
}

impl Reranker for CrossEncoderReranker {
    fn rerank(&self, query: &str, hits: &[SearchHit], top_k: usize) -> Vec<SearchHit> {
        if hits.is_empty() {
            return Vec::new();
        }

        let Some(scorer) = &self.scorer else {
            return self.fallback.rerank(query, hits, top_k);
        };

        let mut scored: Vec<SearchHit> = hits
            .iter()
            .map(|hit| {
                let mut rescored = hit.clone();
                rescored.score = scorer(query, &hit.text);
                rescored
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::Document;

    #[test]
    fn test_empty_hits_returns_empty() {
        let reranker = KeywordOverlapReranker::new();
        assert!(reranker.rerank("query", &[], 10).is_empty());
    }

    #[test]
    fn test_rerank_prefers_more_overlap() {
        let strong = SearchHit::new(&Document::new("s", "rust rust async runtime"), 0.0);
        let weak = SearchHit::new(&Document::new("w", "a sentence about gardening"), 0.0);

        let reranker = KeywordOverlapReranker::new();
        let ranked = reranker.rerank("rust async", &[weak, strong], 10);

        assert_eq!(ranked[0].id, "s");
    }

    #[test]
    fn test_empty_query_preserves_input_order() {
        let a = SearchHit::new(&Document::new("a", "text"), 0.0);
        let b = SearchHit::new(&Document::new("b", "text"), 0.0);
        let reranker = KeywordOverlapReranker::new();
        let ranked = reranker.rerank("", &[a, b], 10);
        assert_eq!(ranked[0].id, "a");
        assert_eq!(ranked[1].id, "b");
    }

    #[test]
    fn test_cross_encoder_without_scorer_is_fallback() {
        let reranker = CrossEncoderReranker::new();
        assert!(reranker.is_fallback());

        let strong = SearchHit::new(&Document::new("s", "rust async runtime"), 0.0);
        let weak = SearchHit::new(&Document::new("w", "gardening"), 0.0);
        let ranked = reranker.rerank("rust async", &[weak, strong], 10);
        assert_eq!(ranked[0].id, "s");
    }

    #[test]
    fn test_cross_encoder_with_scorer_is_not_fallback() {
        let reranker = CrossEncoderReranker::with_scorer(Box::new(|query, text| {
            if text.contains(query) { 1.0 } else { 0.0 }
        }));
        assert!(!reranker.is_fallback());

        let a = SearchHit::new(&Document::new("a", "contains needle here"), 0.0);
        let b = SearchHit::new(&Document::new("b", "does not"), 0.0);
        let ranked = reranker.rerank("needle", &[b, a], 10);
        assert_eq!(ranked[0].id, "a");
    }
}
