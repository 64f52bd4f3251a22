//! Binary entry point for mind.
//!
//! Demonstrates the three components end to end: parse a small
//! `MEMORY.md`-style document, index the resulting entities for hybrid
//! search, and render a session primer from them.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![allow(clippy::print_stderr)]

use chrono::Utc;
use mind::models::primer::{IssueSeverity, Project};
use mind::primer::{NoAccessStats, PrimerGenerator};
use mind::retrieval::{DocumentIndex, HashEmbedder};
use mind::{EntityKind, Issue, LooseParser, PrimerConfig, RetrievalConfig, SearchMode};

const SAMPLE_MEMORY: &str = "\
## Project State
- Goal: ship hybrid search
- Stack: Rust, regex

## 2026-01-10
**Decided:** use BM25 plus vector search over a single dense retriever because recall matters more than latency here.
**Problem:** the reranker falls back to keyword overlap when no cross-encoder is configured, stuck on getting a real model wired in.
**Learned:** SHA-384 hashing gives a deterministic, normalize-friendly embedding fallback.

## Gotchas
- Regex character classes need literal Unicode glyphs, not escape codes -> match the Python original's raw characters exactly
";

fn main() {
    mind::observability::init_tracing();

    let parser = LooseParser::new();
    let parsed = parser.parse(SAMPLE_MEMORY, "MEMORY.md");

    eprintln!("parsed {} entities:", parsed.entities.len());
    for entity in &parsed.entities {
        eprintln!(
            "  [{:>8}] {:.2} {}",
            entity.kind, entity.confidence, entity.title
        );
    }

    let embedder = HashEmbedder::new(RetrievalConfig::default().embedding_dimensions);
    let mut index = DocumentIndex::new(embedder, RetrievalConfig::default());
    for (i, entity) in parsed.entities.iter().enumerate() {
        if let Err(err) = index.add(i.to_string(), entity.content.clone()) {
            eprintln!("failed to index entity {i}: {err}");
        }
    }

    match index.search("hybrid search reranker", SearchMode::Hybrid, 3) {
        Ok(result) => {
            eprintln!("top hybrid hits for \"hybrid search reranker\":");
            for hit in &result.hits {
                eprintln!("  {:.4} {}", hit.score, hit.text);
            }
        }
        Err(err) => eprintln!("search failed: {err}"),
    }

    let project = Project {
        current_goal: parsed.project_state.goal.clone(),
        stack: parsed.project_state.stack.clone(),
        ..Project::default()
    };

    let open_issues: Vec<Issue> = parsed
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Issue)
        .enumerate()
        .map(|(i, e)| Issue {
            id: format!("issue-{i}"),
            title: e.title.clone(),
            severity: IssueSeverity::Major,
            updated_at: Utc::now(),
        })
        .collect();

    let generator = PrimerGenerator::new(PrimerConfig::default());
    let primer = generator.generate(
        &project,
        None,
        &open_issues,
        &[],
        &[],
        &NoAccessStats,
        Utc::now(),
    );

    eprintln!("\n--- session primer ---\n{}", primer.text);
}
