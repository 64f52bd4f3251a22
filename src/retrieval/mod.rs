//! The hybrid retrieval engine: BM25 keyword search and dense-vector
//! search, fused with Reciprocal Rank Fusion, with optional reranking.
//!
//! Grounded on `HybridSearch`/`EmbeddingService`/`Reranker` in
//! `original_source/archived/mind_v3_full/src/v3/retrieval/search.py`,
//! `original_source/src/mind/v3/retrieval/embeddings.py`, and
//! `original_source/src/mind/v3/retrieval/reranker.py`.

pub mod bm25;
pub mod embedding;
pub mod index;
pub mod rerank;
pub mod rrf;
pub mod vector;

pub use embedding::{Embedder, HashEmbedder};
pub use index::DocumentIndex;
pub use rerank::{CrossEncoderReranker, KeywordOverlapReranker, Reranker};
