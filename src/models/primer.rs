//! Models consumed by the primer scorer: the project/session snapshot and
//! the candidate items it ranks.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::entity::DetectionPattern;

/// Severity classification for a primer-candidate issue.
///
/// Distinct from [`crate::models::entity::Severity`]: that one classifies
/// [`crate::models::entity::GlobalEdge`]s on a three-level info/warning/
/// critical scale, while issue severity uses this four-level scale so the
/// primer scorer's severity-base table (100/50/20/5) has a point for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// Actively breaks something; must be addressed before anything else.
    Blocking,
    /// Significant, but not actively blocking.
    Major,
    /// Worth noting, low urgency.
    Minor,
    /// Purely cosmetic.
    Cosmetic,
}

impl IssueSeverity {
    /// Returns the lowercase string form of this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocking => "blocking",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Cosmetic => "cosmetic",
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of a project's current state, as seen by the primer scorer.
///
/// The scorer never reads disk; this is supplied by the storage
/// collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// The project's current goal, if any.
    pub current_goal: Option<String>,
    /// Technology stack tags.
    pub stack: Vec<String>,
    /// Free-text open threads.
    pub open_threads: Vec<String>,
    /// Why the project is currently blocked, if at all.
    pub blocked_by: Vec<String>,
    /// When the last session ended, if there was one.
    pub last_session_date: Option<DateTime<Utc>>,
    /// What the last session's closing summary said.
    pub last_session_summary: Option<String>,
    /// The author's mood at the end of the last session.
    pub last_session_mood: Option<String>,
    /// The first next-step recorded at the end of the last session.
    pub last_session_next_step: Option<String>,
}

/// The prior session's closing notes, used for continuity scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Free-text next steps recorded at the end of the session.
    pub next_steps: Vec<String>,
}

/// A candidate issue for primer inclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable identifier.
    pub id: String,
    /// Short description.
    pub title: String,
    /// How severe the issue is.
    pub severity: IssueSeverity,
    /// When the issue was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A candidate decision for primer inclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Stable identifier.
    pub id: String,
    /// Short description of what was decided.
    pub title: String,
    /// Free-text predicate describing when to revisit this decision.
    pub revisit_if: Option<String>,
    /// Confidence in the decision, in `[0, 1]`.
    pub confidence: f32,
    /// When the decision was made.
    pub decided_at: DateTime<Utc>,
}

/// A candidate sharp edge (advisory warning) for primer inclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharpEdge {
    /// Stable identifier.
    pub id: String,
    /// Short description.
    pub title: String,
    /// Longer explanation, checked against the project stack.
    pub description: String,
    /// Patterns used to detect whether this edge might apply right now.
    pub detection_patterns: Vec<DetectionPattern>,
    /// Short trigger phrases checked as plain substrings.
    pub trigger_phrases: Vec<String>,
}

/// Access-frequency statistics keyed by entity id, as supplied by the
/// storage collaborator. Missing ids are treated as zero accesses.
pub type AccessStats = HashMap<String, u32>;

/// The result of a primer generation call: a pre-rendered textual
/// briefing plus the structured lists it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimerResult {
    /// The formatted briefing text.
    pub text: String,
    /// The selected issues, in descending score order.
    pub issues: Vec<Issue>,
    /// The selected decisions to revisit, in descending score order.
    pub decisions: Vec<Decision>,
    /// The selected sharp edges, in descending score order.
    pub edges: Vec<SharpEdge>,
}
