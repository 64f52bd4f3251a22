//! Entities extracted by the loose parser, and the project-level records
//! that accompany them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of entity a single line of prose was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A decision made by the author (`**Decided:**`, `chose`, `went with`, ...).
    Decision,
    /// A problem encountered by the author (`**Problem:**`, `stuck on`, ...).
    Issue,
    /// A learning or gotcha discovered along the way (`**Learned:**`, `TIL`, ...).
    Learning,
    /// An advisory warning about a known gotcha.
    Edge,
}

impl EntityKind {
    /// Returns the lowercase string form of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decision => "decision",
            Self::Issue => "issue",
            Self::Learning => "learning",
            Self::Edge => "edge",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolution status of an issue entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Not yet addressed.
    Open,
    /// Fixed, resolved, or solved, or checked off with `[x]`.
    Resolved,
    /// Blocked on, or waiting for, something else.
    Blocked,
}

impl IssueStatus {
    /// Returns the lowercase string form of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, confidence-scored record extracted from a single line of
/// Markdown prose.
///
/// Invariants: `0.0 <= confidence <= 1.0`; `status` is `Some` iff
/// `kind == EntityKind::Issue`; `days_ago` is `Some` only when `date` is
/// `Some`; `title` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// What kind of entity this is.
    pub kind: EntityKind,
    /// Short span extracted from the source text (at most 200 characters
    /// by construction of the recognizer patterns).
    pub title: String,
    /// The full originating line, trimmed.
    pub content: String,
    /// Path or identifier of the file this entity was extracted from.
    pub source_file: String,
    /// Zero-indexed line number within `source_file`.
    pub source_line: usize,
    /// Confidence in `[0, 1]` that this line really expresses the claimed
    /// entity kind.
    pub confidence: f32,
    /// The span following a reasoning marker (`because`, `since`, ...) on
    /// the same line, if any.
    pub reasoning: Option<String>,
    /// Ordered list of spans following an alternative marker (`over`,
    /// `instead of`, `rather than`) on the same line.
    pub alternatives: Vec<String>,
    /// Resolution status; only set for `EntityKind::Issue`.
    pub status: Option<IssueStatus>,
    /// The most recent date header preceding this line, if any.
    pub date: Option<NaiveDate>,
    /// `true` if the originating line was marked `KEY:`/`IMPORTANT:`; such
    /// entities always sort to the front regardless of age.
    pub is_key: bool,
    /// Days between `date` and "today", computed once at parse time.
    pub days_ago: Option<i64>,
}

impl Entity {
    /// Creates a new entity with the required fields; optional fields
    /// start at their empty/default state and are set with the `with_*`
    /// builder methods.
    #[must_use]
    pub fn new(
        kind: EntityKind,
        title: impl Into<String>,
        content: impl Into<String>,
        source_file: impl Into<String>,
        source_line: usize,
        confidence: f32,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
            source_file: source_file.into(),
            source_line,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: None,
            alternatives: Vec::new(),
            status: None,
            date: None,
            is_key: false,
            days_ago: None,
        }
    }

    /// Sets the reasoning span, consuming and returning `self`.
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: Option<String>) -> Self {
        self.reasoning = reasoning;
        self
    }

    /// Sets the alternatives list, consuming and returning `self`.
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Sets the issue status, consuming and returning `self`.
    #[must_use]
    pub const fn with_status(mut self, status: Option<IssueStatus>) -> Self {
        self.status = status;
        self
    }

    /// Sets the date context, consuming and returning `self`.
    #[must_use]
    pub const fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }
}

/// Header-extracted state from a `## Project State` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    /// The current goal, if stated.
    pub goal: Option<String>,
    /// Ordered list of technology tags.
    pub stack: Vec<String>,
    /// What the project is currently blocked by, if stated.
    pub blocked_by: Option<String>,
}

/// A project-local advisory warning extracted from a `## Gotchas` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Short description of the gotcha.
    pub title: String,
    /// How to work around it, if given.
    pub workaround: Option<String>,
}

impl Edge {
    /// Creates a new project-local edge.
    #[must_use]
    pub fn new(title: impl Into<String>, workaround: Option<String>) -> Self {
        Self {
            title: title.into(),
            workaround,
        }
    }
}

/// Severity classification for issues and global edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Worth knowing about but not urgent.
    Warning,
    /// Must be addressed; actively breaks something.
    Critical,
}

impl Severity {
    /// Returns the lowercase string form of this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a [`DetectionPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPatternKind {
    /// Matched against a free-text context string (goal + stack).
    Context,
    /// Matched against the assistant's inferred intent.
    Intent,
    /// Matched against code content.
    Code,
}

/// A pattern used to detect whether a global edge is relevant to the
/// current situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionPattern {
    /// What this pattern is matched against.
    pub kind: DetectionPatternKind,
    /// The regular-expression pattern string. Malformed patterns are
    /// treated as non-matching, never as errors.
    pub pattern: String,
}

impl DetectionPattern {
    /// Creates a new detection pattern.
    #[must_use]
    pub fn new(kind: DetectionPatternKind, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
        }
    }
}

/// A cross-project, process-wide gotcha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalEdge {
    /// Stable identifier.
    pub id: String,
    /// Short description of the gotcha.
    pub title: String,
    /// Longer explanation.
    pub description: String,
    /// How to work around it, if known.
    pub workaround: Option<String>,
    /// Patterns used to detect relevance to the current situation.
    pub detection_patterns: Vec<DetectionPattern>,
    /// Short trigger phrases checked as plain substrings of the context.
    pub trigger_phrases: Vec<String>,
    /// Technology tags this edge is associated with.
    pub stack_tags: Vec<String>,
    /// How severe this gotcha is.
    pub severity: Severity,
    /// When this edge was recorded.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A one-line session header: `## <date> | <summary> | mood: <mood>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The session's date.
    pub date: NaiveDate,
    /// What happened in the session, if stated.
    pub summary: Option<String>,
    /// The author's mood, if stated.
    pub mood: Option<String>,
}
