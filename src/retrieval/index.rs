//! The document index: single owner of the document table, document
//! frequencies, and average document length, plus the `search` dispatcher.
//!
//! Ported from `HybridSearch` in
//! `original_source/archived/mind_v3_full/src/v3/retrieval/search.py`.
//! Grounded on the donor's `IndexBackend`/`VectorBackend` trait shapes
//! (`src/storage/traits/{index,vector}.rs`) for the `add`/`remove`/
//! `search`/`clear` method names, adapted to own both the keyword and
//! vector sides of the index directly rather than delegating to separate
//! backends. Folding both into one struct keeps the document table, the
//! document-frequency table, and the average document length trivially
//! consistent with each other.

use std::collections::HashMap;

use crate::config::RetrievalConfig;
use crate::models::document::{Document, SearchHit, SearchMode, SearchResult};
use crate::retrieval::embedding::Embedder;
use crate::retrieval::rerank::Reranker as RerankerTrait;
use crate::retrieval::{bm25, rrf, vector};
use crate::retrieval::rrf::WeightedList;
use crate::Result;

/// An in-memory hybrid document index: keyword (BM25) plus dense-vector
/// search, fused with Reciprocal Rank Fusion.
pub struct DocumentIndex<E: Embedder> {
    config: RetrievalConfig,
    embedder: E,
    documents: HashMap<String, Document>,
    document_frequencies: HashMap<String, usize>,
    average_doc_length: f32,
    insertion_order: Vec<String>,
}

impl<E: Embedder> DocumentIndex<E> {
    /// Creates a new, empty index using `embedder` for vector search and
    /// `config` for its BM25/RRF parameters.
    #[must_use]
    pub fn new(embedder: E, config: RetrievalConfig) -> Self {
        Self {
            config,
            embedder,
            documents: HashMap::new(),
            document_frequencies: HashMap::new(),
            average_doc_length: 0.0,
            insertion_order: Vec::new(),
        }
    }

    /// Number of documents currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the index holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether `id` is currently present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Adds (or replaces) a document, deriving its tokens and embedding
    /// vector and updating the document-frequency table and average
    /// length as one atomic step.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the document's text fails.
    pub fn add(&mut self, id: impl Into<String>, text: impl Into<String>) -> Result<()> {
        self.add_with_metadata(id, text, HashMap::new())
    }

    /// As [`Self::add`], but attaches `metadata` to the stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the document's text fails.
    pub fn add_with_metadata(
        &mut self,
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let id = id.into();
        let text = text.into();

        if self.documents.contains_key(&id) {
            self.remove(&id);
        }

        let tokens = bm25::tokenize(&text);
        let vector = self.embedder.embed(&text)?;

        let mut unique_tokens: Vec<&String> = tokens.iter().collect();
        unique_tokens.sort_unstable();
        unique_tokens.dedup();
        for token in unique_tokens {
            *self.document_frequencies.entry(token.clone()).or_insert(0) += 1;
        }

        let document = Document {
            id: id.clone(),
            text,
            metadata,
            vector,
            tokens,
        };

        self.insertion_order.push(id.clone());
        self.documents.insert(id, document);
        self.update_average_doc_length();

        Ok(())
    }

    /// Removes a document by id, returning whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(document) = self.documents.remove(id) else {
            tracing::debug!(id, "remove: id not present");
            return false;
        };

        self.insertion_order.retain(|existing| existing != id);

        let mut unique_tokens: Vec<&String> = document.tokens.iter().collect();
        unique_tokens.sort_unstable();
        unique_tokens.dedup();
        for token in unique_tokens {
            if let Some(count) = self.document_frequencies.get_mut(token) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.document_frequencies.remove(token);
                }
            }
        }

        self.update_average_doc_length();
        true
    }

    /// Removes every document.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.document_frequencies.clear();
        self.insertion_order.clear();
        self.average_doc_length = 0.0;
    }

    fn update_average_doc_length(&mut self) {
        if self.documents.is_empty() {
            self.average_doc_length = 0.0;
            return;
        }
        let total: usize = self.documents.values().map(|d| d.tokens.len()).sum();
        self.average_doc_length = total as f32 / self.documents.len() as f32;
    }

    /// Searches the index, dispatching on `mode`.
    ///
    /// An empty or whitespace-only query returns the first `top_k`
    /// documents in insertion order at a flat score of `1.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the query fails (vector and hybrid
    /// modes only).
    #[tracing::instrument(skip(self, query), fields(mode = %mode, top_k, corpus_size = self.documents.len()))]
    pub fn search(&self, query: &str, mode: SearchMode, top_k: usize) -> Result<SearchResult> {
        if self.documents.is_empty() {
            return Ok(SearchResult { hits: Vec::new(), mode });
        }

        if query.trim().is_empty() {
            let hits = self.top_documents(top_k);
            return Ok(SearchResult { hits, mode });
        }

        let hits = match mode {
            SearchMode::VectorOnly => self.vector_search(query, top_k)?,
            SearchMode::KeywordOnly => self.keyword_search(query, top_k),
            SearchMode::Hybrid => self.hybrid_search(query, top_k)?,
        };

        Ok(SearchResult { hits, mode })
    }

    /// Reranks an already-computed [`SearchResult`] with `reranker`,
    /// returning at most `top_k` hits.
    #[must_use]
    pub fn rerank(
        &self,
        query: &str,
        result: &SearchResult,
        reranker: &impl RerankerTrait,
        top_k: usize,
    ) -> Vec<SearchHit> {
        reranker.rerank(query, &result.hits, top_k)
    }

    fn top_documents(&self, top_k: usize) -> Vec<SearchHit> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.documents.get(id))
            .take(top_k)
            .map(|doc| SearchHit::new(doc, 1.0))
            .collect()
    }

    /// Documents in insertion order, for callers that need a deterministic
    /// enumeration (search ranking ties fall back to this order).
    fn documents_in_insertion_order(&self) -> Vec<&Document> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.documents.get(id))
            .collect()
    }

    fn vector_search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let query_vector = self.embedder.embed(query)?;
        let docs = self.documents_in_insertion_order();
        Ok(vector::search(&docs, &query_vector, top_k))
    }

    fn keyword_search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let query_tokens = bm25::tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<SearchHit> = self
            .documents_in_insertion_order()
            .into_iter()
            .filter_map(|doc| {
                let score = bm25::score(
                    &query_tokens,
                    &doc.tokens,
                    &self.document_frequencies,
                    self.documents.len(),
                    self.average_doc_length,
                    self.config.bm25_k1,
                    self.config.bm25_b,
                );
                if score > 0.0 {
                    let mut hit = SearchHit::new(doc, score);
                    hit.bm25_score = Some(score);
                    Some(hit)
                } else {
                    None
                }
            })
            .collect();

        // Stable sort: ties keep insertion order rather than an arbitrary
        // hash-map-derived order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    fn hybrid_search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let fetch_k = (top_k * 3).min(self.documents.len());

        // Per spec §4.2 failure semantics: an embedding failure in the
        // vector leg degrades this query to keyword-only rather than
        // propagating the error.
        let Ok(vector_hits) = self.vector_search(query, fetch_k) else {
            tracing::debug!("vector search failed, falling through to keyword-only");
            let mut hits = self.keyword_search(query, fetch_k);
            hits.truncate(top_k);
            return Ok(hits);
        };
        let keyword_hits = self.keyword_search(query, fetch_k);

        let lists = [
            WeightedList::new(&vector_hits, self.config.vector_weight),
            WeightedList::new(&keyword_hits, self.config.keyword_weight),
        ];

        Ok(rrf::fuse(&lists, self.config.rrf_k, top_k))
    }
}
