//! Okapi BM25 keyword scoring.
//!
//! Ported from `HybridSearch._bm25_score`/`_tokenize` in
//! `original_source/archived/mind_v3_full/src/v3/retrieval/search.py`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").unwrap_or_else(|e| unreachable!("static pattern must compile: {e}")));

/// Lowercases `text` and splits it into word tokens, dropping tokens of
/// length `< 2`.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|t| t.chars().count() > 1)
        .collect()
}

/// Scores a document's tokens against a query's tokens using the Okapi
/// BM25 formula.
///
/// `document_frequencies` maps each term to the number of documents (out
/// of `document_count`) that contain it at least once; `average_doc_len`
/// is the corpus's mean token count per document (treated as `1.0` when
/// the corpus is empty, to avoid division by zero).
#[must_use]
pub fn score(
    query_tokens: &[String],
    doc_tokens: &[String],
    document_frequencies: &HashMap<String, usize>,
    document_count: usize,
    average_doc_len: f32,
    k1: f32,
    b: f32,
) -> f32 {
    if query_tokens.is_empty() || doc_tokens.is_empty() {
        return 0.0;
    }

    let avg_dl = if average_doc_len > 0.0 { average_doc_len } else { 1.0 };
    let doc_len = doc_tokens.len() as f32;

    let mut doc_term_counts: HashMap<&str, u32> = HashMap::new();
    for token in doc_tokens {
        *doc_term_counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut total = 0.0;
    for token in query_tokens {
        let Some(&tf) = doc_term_counts.get(token.as_str()) else {
            continue;
        };
        let df = document_frequencies.get(token).copied().unwrap_or(0);
        if df == 0 {
            continue;
        }

        let n = document_count as f32;
        let df = df as f32;
        let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();

        let tf = tf as f32;
        let numerator = tf * (k1 + 1.0);
        let denominator = tf + k1 * (1.0 - b + b * (doc_len / avg_dl));
        total += idf * (numerator / denominator);
    }

    total
}
