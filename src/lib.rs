//! # Mind
//!
//! A file-based memory substrate for AI coding assistants.
//!
//! Mind turns a human-written project log into retrievable, ranked context
//! and re-injects that context at the start of every new coding session.
//! It is built around three tightly-coupled components:
//!
//! - [`parser`]: converts free-form Markdown into typed, confidence-scored
//!   entities.
//! - [`retrieval`]: an in-memory hybrid (vector + BM25) document index with
//!   Reciprocal Rank Fusion and optional reranking.
//! - [`primer`]: ranks open issues, decisions, and sharp edges for a
//!   new-session briefing.
//!
//! Persistence, the CLI, and any RPC/editor bridge are external
//! collaborators and are out of scope for this crate; see `DESIGN.md` for
//! the full rationale.
//!
//! ## Example
//!
//! ```rust
//! use mind::parser::Parser;
//!
//! let parser = Parser::new();
//! let result = parser.parse(
//!     "**Decided:** use SQLite over PostgreSQL because local-first",
//!     "MEMORY.md",
//! );
//! assert_eq!(result.entities.len(), 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// Hash-to-float embedding arithmetic intentionally loses precision and truncates.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod observability;
pub mod parser;
pub mod primer;
pub mod retrieval;

// Re-exports for convenience
pub use config::{PrimerConfig, RetrievalConfig};
pub use models::entity::{
    DetectionPattern, DetectionPatternKind, Edge, Entity, EntityKind, GlobalEdge, IssueStatus,
    ProjectState, Severity, SessionSummary,
};
pub use models::document::{Document, SearchHit, SearchMode, SearchResult};
pub use models::primer::{
    AccessStats, Decision, Issue, IssueSeverity, PrimerResult, Project, Session, SharpEdge,
};
pub use parser::{InlineScanner, ParseResult, Parser as LooseParser};
pub use primer::{AccessStatsProvider, PrimerGenerator, PrimerScorer};
pub use retrieval::{DocumentIndex, Embedder, HashEmbedder, Reranker};

/// Error type for mind operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait
/// implementations. Matches the three-tier taxonomy from the crate's error
/// handling design: malformed input at line granularity and missing input
/// at request granularity never raise (they degrade to empty results);
/// only a collaborator failure surfaces as an `Error`.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided by the caller (not malformed source
    /// content, which the parser and retrieval engine absorb silently).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal operation failed unexpectedly.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An external collaborator (storage, access-stats provider, embedding
    /// model) signalled a failure that could not be locally absorbed.
    #[error("collaborator '{collaborator}' unavailable: {cause}")]
    CollaboratorUnavailable {
        /// The collaborator that failed.
        collaborator: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for mind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Centralized to avoid duplicate implementations across the codebase.
/// Uses `SystemTime::now()` with a fallback to `0` if the system clock is
/// before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
