//! Reciprocal Rank Fusion for merging ranked result lists.
//!
//! Shaped after the donor's `RrfFusion` (accumulation into a map keyed by
//! document id, `sort_unstable_by` plus `truncate`), generalized to accept
//! a weight per input list: the donor's own fusion treats every list
//! equally, but `HybridSearch._hybrid_search` in
//! `original_source/archived/mind_v3_full/src/v3/retrieval/search.py`
//! applies `vector_weight`/`keyword_weight` multipliers before summing.

use std::collections::HashMap;

use crate::models::document::SearchHit;

/// One ranked list to fuse, paired with the weight its ranks should
/// contribute with.
pub struct WeightedList<'a> {
    /// The ranked hits, best first.
    pub hits: &'a [SearchHit],
    /// Multiplier applied to this list's RRF contribution.
    pub weight: f32,
}

impl<'a> WeightedList<'a> {
    /// Pairs a ranked list with its fusion weight.
    #[must_use]
    pub const fn new(hits: &'a [SearchHit], weight: f32) -> Self {
        Self { hits, weight }
    }
}

/// Fuses any number of weighted, ranked lists using Reciprocal Rank
/// Fusion: `score(d) = sum over lists containing d of weight / (k + rank + 1)`.
///
/// Hits are merged by id; the returned hit's text/metadata come from
/// whichever list first contained that id. The result is sorted by fused
/// score descending and truncated to `limit`.
#[must_use]
pub fn fuse(lists: &[WeightedList<'_>], k: f32, limit: usize) -> Vec<SearchHit> {
    // Preserve first-encounter order across lists (list order, then rank
    // within a list) so that ties in fused score fall back to insertion
    // order rather than whatever order a hash map would yield.
    let mut order: Vec<&str> = Vec::new();
    let mut scores: HashMap<&str, f32> = HashMap::new();
    let mut representative: HashMap<&str, &SearchHit> = HashMap::new();

    for list in lists {
        for (rank, hit) in list.hits.iter().enumerate() {
            let contribution = list.weight / (k + rank as f32 + 1.0);
            if !scores.contains_key(hit.id.as_str()) {
                order.push(hit.id.as_str());
            }
            *scores.entry(hit.id.as_str()).or_insert(0.0) += contribution;
            representative.entry(hit.id.as_str()).or_insert(hit);
        }
    }

    let mut fused: Vec<SearchHit> = order
        .into_iter()
        .map(|id| {
            let score = scores[id];
            let source = representative[id];
            let mut hit = SearchHit {
                id: source.id.clone(),
                text: source.text.clone(),
                metadata: source.metadata.clone(),
                score,
                vector_score: None,
                bm25_score: None,
            };
            for list in lists {
                if let Some(original) = list.hits.iter().find(|h| h.id == id) {
                    hit.vector_score = hit.vector_score.or(original.vector_score);
                    hit.bm25_score = hit.bm25_score.or(original.bm25_score);
                }
            }
            hit
        })
        .collect();

    fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    fused.truncate(limit);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::Document;

    fn hit(id: &str, text: &str) -> SearchHit {
        SearchHit::new(&Document::new(id, text), 0.0)
    }

    #[test]
    fn test_fuse_empty_lists() {
        let result = fuse(&[], 60.0, 10);
        assert!(result.is_empty());
    }

    #[test]
    fn test_fuse_single_list_preserves_order() {
        let a = hit("a", "alpha");
        let b = hit("b", "beta");
        let list = [a, b];
        let weighted = [WeightedList::new(&list, 1.0)];

        let fused = fuse(&weighted, 60.0, 10);
        assert_eq!(fused[0].id, "a");
        assert_eq!(fused[1].id, "b");
    }

    #[test]
    fn test_fuse_boosts_overlap() {
        let vector_hits = [hit("x", "x"), hit("y", "y")];
        let keyword_hits = [hit("y", "y"), hit("x", "x")];

        let weighted = [
            WeightedList::new(&vector_hits, 0.7),
            WeightedList::new(&keyword_hits, 0.3),
        ];

        let fused = fuse(&weighted, 60.0, 10);
        assert_eq!(fused.len(), 2);
        // x ranks first in the higher-weighted vector list, so its fused
        // score should edge out y even though y ranks first in keyword.
        assert_eq!(fused[0].id, "x");
    }

    #[test]
    fn test_fuse_respects_limit() {
        let hits: Vec<SearchHit> = (0..5).map(|i| hit(&i.to_string(), "t")).collect();
        let weighted = [WeightedList::new(&hits, 1.0)];
        let fused = fuse(&weighted, 60.0, 2);
        assert_eq!(fused.len(), 2);
    }
}
