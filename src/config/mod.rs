//! Configuration for the retrieval engine and the primer scorer.
//!
//! The core never reads files or process environment variables on its own
//! (see `DESIGN.md`): these are plain structs with documented defaults,
//! constructed and overridden by the caller. [`expand_env_vars`] is kept as
//! a narrow opt-in helper for callers that want to source a single string
//! field (e.g. an embedding model name) from the environment, without
//! pulling a layered configuration system into the core.

use std::borrow::Cow;
use std::env;

/// Configuration for the hybrid retrieval engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Embedding dimension `D`. All vectors in the index must have this
    /// length.
    pub embedding_dimensions: usize,
    /// BM25 term-frequency saturation parameter.
    pub bm25_k1: f32,
    /// BM25 length-normalization parameter.
    pub bm25_b: f32,
    /// Reciprocal Rank Fusion constant `K`.
    pub rrf_k: f32,
    /// Weight given to the vector-search leg during hybrid fusion.
    pub vector_weight: f32,
    /// Weight given to the keyword-search leg during hybrid fusion.
    pub keyword_weight: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            embedding_dimensions: 384,
            bm25_k1: 1.5,
            bm25_b: 0.75,
            rrf_k: 60.0,
            vector_weight: 0.7,
            keyword_weight: 0.3,
        }
    }
}

impl RetrievalConfig {
    /// Creates a new configuration with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the embedding dimension, consuming and returning `self`.
    #[must_use]
    pub const fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = dimensions;
        self
    }
}

/// Configuration for the primer scorer's selection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimerConfig {
    /// Maximum number of issues surfaced in a primer.
    pub max_issues: usize,
    /// Maximum number of decisions surfaced in a primer.
    pub max_decisions: usize,
    /// Maximum number of sharp edges surfaced in a primer.
    pub max_edges: usize,
}

impl Default for PrimerConfig {
    fn default() -> Self {
        Self {
            max_issues: 3,
            max_decisions: 2,
            max_edges: 2,
        }
    }
}

impl PrimerConfig {
    /// Creates a new configuration with the documented defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_issues: 3,
            max_decisions: 2,
            max_edges: 2,
        }
    }
}

/// Expands `${VAR}` references in `input` using the current process
/// environment, leaving unrecognized or unset references untouched.
///
/// Returns a borrowed `Cow` when no expansion was needed, avoiding an
/// allocation for the common case of a plain string.
#[must_use]
pub fn expand_env_vars(input: &str) -> Cow<'_, str> {
    if !input.contains("${") {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            result.push_str(rest);
            return Cow::Owned(result);
        };
        let end = start + end;

        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..end];
        match env::var(var_name) {
            Ok(value) => result.push_str(&value),
            Err(_) => {
                result.push_str("${");
                result.push_str(var_name);
                result.push('}');
            }
        }
        rest = &rest[end + 1..];
    }
    result.push_str(rest);

    Cow::Owned(result)
}
