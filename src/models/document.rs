//! Document and search-result types used by the retrieval engine.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A document held by the retrieval engine's in-memory index.
///
/// Owned exclusively by the [`crate::retrieval::DocumentIndex`]; other
/// components only ever see copies of this data through [`SearchHit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, unique within the index.
    pub id: String,
    /// The document's raw text.
    pub text: String,
    /// Arbitrary caller-supplied metadata.
    pub metadata: HashMap<String, String>,
    /// Dense embedding vector, length equal to the embedder's dimension.
    pub vector: Vec<f32>,
    /// Normalized tokens (lowercased alphanumeric runs of length >= 2).
    pub tokens: Vec<String>,
}

impl Document {
    /// Creates a new document. `vector` and `tokens` are derived by the
    /// index at insertion time and are not expected to be supplied here.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: HashMap::new(),
            vector: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// Sets metadata, consuming and returning `self`.
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Which search strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Dense-vector cosine similarity only.
    VectorOnly,
    /// BM25 keyword search only.
    KeywordOnly,
    /// Vector and keyword search fused with Reciprocal Rank Fusion.
    Hybrid,
}

impl Default for SearchMode {
    fn default() -> Self {
        Self::Hybrid
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VectorOnly => "vector_only",
            Self::KeywordOnly => "keyword_only",
            Self::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

/// A single scored search result, carrying a copy of the matched
/// document's content rather than a reference into the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched document's id.
    pub id: String,
    /// A copy of the matched document's text.
    pub text: String,
    /// A copy of the matched document's metadata.
    pub metadata: HashMap<String, String>,
    /// The fused or mode-specific score used for ranking.
    pub score: f32,
    /// The raw vector-similarity score, when computed.
    pub vector_score: Option<f32>,
    /// The raw BM25 score, when computed.
    pub bm25_score: Option<f32>,
}

impl SearchHit {
    /// Creates a new search hit from a document and a score.
    #[must_use]
    pub fn new(document: &Document, score: f32) -> Self {
        Self {
            id: document.id.clone(),
            text: document.text.clone(),
            metadata: document.metadata.clone(),
            score,
            vector_score: None,
            bm25_score: None,
        }
    }
}

/// A complete response to a `search` call: the ranked hits plus the mode
/// that was used to produce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Ranked hits, descending by score.
    pub hits: Vec<SearchHit>,
    /// The mode that produced this result.
    pub mode: SearchMode,
}
