//! The loose parser: converts free-form Markdown prose into typed,
//! confidence-scored entities.
//!
//! Behavior is a line-for-line port of `original_source/src/mind/parser.py`,
//! expressed as a recognizer-pipeline (per-line predicate + extractor)
//! rather than a long `if/elif` chain.
//! Parsing is total: every input yields a [`ParseResult`], never an error.
//! Unrecognized lines are simply skipped.

mod inline;
mod patterns;

pub use inline::InlineScanner;

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::entity::{Edge, Entity, EntityKind, IssueStatus, ProjectState, SessionSummary};

/// The result of parsing a single Markdown document: every entity found,
/// plus the header-extracted project state, gotcha edges, and session
/// summaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    /// State extracted from the `## Project State` section, if present.
    pub project_state: ProjectState,
    /// Every entity recognized in source-file order.
    pub entities: Vec<Entity>,
    /// Project-local gotchas extracted from the `## Gotchas` section.
    pub project_edges: Vec<Edge>,
    /// One-line session headers (`## <date> | <summary> | mood: <mood>`).
    pub session_summaries: Vec<SessionSummary>,
}

impl ParseResult {
    /// Returns entities sorted by recency: every key entity first
    /// (regardless of age), then by ascending `days_ago` (entities with no
    /// date sort as if extremely old).
    #[must_use]
    pub fn entities_by_recency(&self) -> Vec<Entity> {
        let mut entities = self.entities.clone();
        entities.sort_by_key(|e| {
            let key_rank = i32::from(!e.is_key);
            let days = e.days_ago.unwrap_or(9999);
            (key_rank, days)
        });
        entities
    }
}

static PROJECT_STATE_HEADER: Lazy<Regex> =
    Lazy::new(|| build_ci(r"##\s*project\s*state\s*\n"));
static GOTCHAS_HEADER: Lazy<Regex> = Lazy::new(|| build_ci(r"##\s*gotchas?\s*\n"));
static NEXT_HEADER: Lazy<Regex> = Lazy::new(|| build_ci(r"\n##|\n---"));

static GOAL_LINE: Lazy<Regex> = Lazy::new(|| build_ci(r"^-\s*goal:?\s*(.+)$"));
static STACK_LINE: Lazy<Regex> = Lazy::new(|| build_ci(r"^-\s*stack:?\s*(.+)$"));
static BLOCKED_LINE: Lazy<Regex> = Lazy::new(|| build_ci(r"^-\s*blocked:?\s*(.+)$"));

static DATE_HEADER_ISO: Lazy<Regex> = Lazy::new(|| build_ci(r"^##\s*(\d{4}-\d{2}-\d{2})"));
static DATE_HEADER_US: Lazy<Regex> = Lazy::new(|| build_ci(r"^##\s*(\d{1,2}/\d{1,2}/\d{4})"));
static DATE_HEADER_NATURAL: Lazy<Regex> =
    Lazy::new(|| build_ci(r"^##\s*([A-Za-z]+\s+\d{1,2},?\s+\d{4})"));

static SESSION_SUMMARY_LINE: Lazy<Regex> = Lazy::new(|| {
    build_ci(r"^##\s*(\d{4}-\d{2}-\d{2}|[A-Za-z]+\s+\d{1,2},?\s+\d{4})\s*\|\s*(.+?)(?:\s*\|\s*mood:\s*(.+))?$")
});

static GOTCHA_SPLIT: Lazy<Regex> = Lazy::new(|| build_ci(r"\s*(?:->|\x{2192}|--)\s*"));

static BECAUSE_MARKER: Lazy<Regex> = Lazy::new(|| build_ci(r"\bbecause\b"));
static OVER_MARKER: Lazy<Regex> = Lazy::new(|| build_ci(r"\bover\b"));

fn build_ci(pattern: &str) -> Regex {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| unreachable!("static pattern `{pattern}` must compile: {e}"))
}

/// The recognized placeholder values that mean "no goal/stack/blocker was
/// actually filled in" and should be treated as absent.
const PLACEHOLDER_VALUES: &[&str] = &["(describe your goal)", "(add your stack)", "none", ""];

/// Loose parser for extracting entities from `MEMORY.md`-style content.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Creates a new parser. Stateless; safe to reuse across calls.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parses `content` (as read from `source_file`) into a [`ParseResult`].
    ///
    /// Total: malformed or unrecognized lines are silently skipped, never
    /// raised as errors.
    #[must_use]
    #[tracing::instrument(skip(self, content), fields(source_file, lines = content.lines().count()))]
    pub fn parse(&self, content: &str, source_file: &str) -> ParseResult {
        let date_context = Self::extract_date_context(content);
        let today = Local::now().date_naive();

        let mut entities = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if Self::should_skip(line) {
                continue;
            }
            let current_date = date_context.get(&line_num).copied();

            let entity = Self::try_parse_decision(line, line_num, source_file, current_date)
                .or_else(|| Self::try_parse_issue(line, line_num, source_file, current_date))
                .or_else(|| Self::try_parse_learning(line, line_num, source_file, current_date));

            if let Some(entity) = entity {
                entities.push(entity);
            }
        }

        for entity in &mut entities {
            entity.is_key = Self::is_key_item(&entity.content);
            if let Some(date) = entity.date {
                entity.days_ago = Some((today - date).num_days());
            }
        }

        tracing::debug!(entities = entities.len(), "parsed loose log");

        ParseResult {
            project_state: Self::extract_project_state(content),
            entities,
            project_edges: Self::extract_project_edges(content),
            session_summaries: Self::extract_session_summaries(content),
        }
    }

    fn is_key_item(content: &str) -> bool {
        let trimmed = content.trim();
        patterns::KEY_PATTERNS.iter().any(|p| p.is_match(trimmed))
    }

    fn should_skip(line: &str) -> bool {
        let stripped = line.trim();
        if stripped.is_empty() {
            return true;
        }
        if stripped.starts_with('#') && !stripped.starts_with("##") {
            return true;
        }
        if stripped.starts_with("<!--") {
            return true;
        }
        if stripped.contains("MIND MEMORY") {
            return true;
        }
        if stripped == "---" {
            return true;
        }
        if stripped.starts_with("- Goal:")
            || stripped.starts_with("- Stack:")
            || stripped.starts_with("- Blocked:")
        {
            return true;
        }
        if stripped.starts_with("Keywords:") {
            return true;
        }
        // Session summary lines (## DATE | summary | mood: X) are handled
        // separately, not as entity candidates.
        if stripped.starts_with("##") && stripped.contains('|') {
            return true;
        }
        false
    }

    fn is_false_positive(line: &str) -> bool {
        let lower = line.to_lowercase();
        patterns::FALSE_POSITIVE_PATTERNS
            .iter()
            .any(|p| p.is_match(&lower))
    }

    fn try_parse_decision(
        line: &str,
        line_num: usize,
        source_file: &str,
        date: Option<NaiveDate>,
    ) -> Option<Entity> {
        if Self::is_false_positive(line) {
            return None;
        }

        for (pattern, base_confidence) in patterns::DECISION_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let title = caps.get(1)?.as_str().trim();
            if title.chars().count() < 3 {
                continue;
            }

            let confidence = Self::score_confidence(line, *base_confidence);
            let reasoning = Self::find_reasoning(line);
            let alternatives = Self::find_alternatives(line);

            return Some(
                Entity::new(
                    EntityKind::Decision,
                    title,
                    line.trim(),
                    source_file,
                    line_num,
                    confidence,
                )
                .with_reasoning(reasoning)
                .with_alternatives(alternatives)
                .with_date(date),
            );
        }
        None
    }

    fn try_parse_issue(
        line: &str,
        line_num: usize,
        source_file: &str,
        date: Option<NaiveDate>,
    ) -> Option<Entity> {
        for (pattern, base_confidence) in patterns::ISSUE_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let title = caps.get(1)?.as_str().trim();
            if title.chars().count() < 3 {
                continue;
            }

            let confidence = Self::score_confidence(line, *base_confidence);
            let status = Self::detect_issue_status(line);
            let reasoning = Self::find_reasoning(line);

            return Some(
                Entity::new(
                    EntityKind::Issue,
                    title,
                    line.trim(),
                    source_file,
                    line_num,
                    confidence,
                )
                .with_reasoning(reasoning)
                .with_status(Some(status))
                .with_date(date),
            );
        }
        None
    }

    fn try_parse_learning(
        line: &str,
        line_num: usize,
        source_file: &str,
        date: Option<NaiveDate>,
    ) -> Option<Entity> {
        for (pattern, base_confidence) in patterns::LEARNING_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let title = caps.get(1)?.as_str().trim();
            if title.chars().count() < 3 {
                continue;
            }

            let confidence = Self::score_confidence(line, *base_confidence);

            return Some(
                Entity::new(
                    EntityKind::Learning,
                    title,
                    line.trim(),
                    source_file,
                    line_num,
                    confidence,
                )
                .with_date(date),
            );
        }
        None
    }

    /// Applies marker-based confidence adjustments, clamped to `[0, 1]`
    /// (the final clamp already happens in `Entity::new`).
    fn score_confidence(line: &str, base_confidence: f32) -> f32 {
        let mut confidence = base_confidence;

        if line.contains("**") {
            confidence += 0.2;
        }
        if BECAUSE_MARKER.is_match(line) {
            confidence += 0.15;
        }
        if OVER_MARKER.is_match(line) {
            confidence += 0.1;
        }
        if line.trim_start().starts_with("MEMORY:") {
            confidence += 0.1;
        }

        confidence.min(1.0)
    }

    fn find_reasoning(line: &str) -> Option<String> {
        for pattern in patterns::REASONING_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(line) {
                return Some(caps.get(1)?.as_str().trim().to_string());
            }
        }
        None
    }

    fn find_alternatives(line: &str) -> Vec<String> {
        patterns::ALTERNATIVE_PATTERNS
            .iter()
            .filter_map(|pattern| pattern.captures(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
            .collect()
    }

    fn detect_issue_status(line: &str) -> IssueStatus {
        if patterns::RESOLVED_PATTERNS.iter().any(|p| p.is_match(line)) {
            return IssueStatus::Resolved;
        }
        if patterns::BLOCKED_PATTERNS.iter().any(|p| p.is_match(line)) {
            return IssueStatus::Blocked;
        }
        IssueStatus::Open
    }

    /// Maps each 0-indexed line number to the most recent date header that
    /// precedes (or is) that line.
    fn extract_date_context(content: &str) -> HashMap<usize, NaiveDate> {
        let mut map = HashMap::new();
        let mut current: Option<NaiveDate> = None;

        for (line_num, line) in content.lines().enumerate() {
            if let Some(caps) = DATE_HEADER_ISO.captures(line) {
                current = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok().or(current);
            } else if let Some(caps) = DATE_HEADER_US.captures(line) {
                current = NaiveDate::parse_from_str(&caps[1], "%m/%d/%Y").ok().or(current);
            } else if let Some(caps) = DATE_HEADER_NATURAL.captures(line) {
                current = Self::parse_natural_date(&caps[1]).or(current);
            }

            if let Some(date) = current {
                map.insert(line_num, date);
            }
        }

        map
    }

    /// Parses `December 12, 2024`-style dates, trying full and abbreviated
    /// month names with and without a comma.
    fn parse_natural_date(date_str: &str) -> Option<NaiveDate> {
        const FORMATS: &[&str] = &["%B %d, %Y", "%B %d %Y", "%b %d, %Y", "%b %d %Y"];
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
    }

    fn extract_project_state(content: &str) -> ProjectState {
        let mut state = ProjectState::default();

        let Some(section) = Self::extract_section(content, &PROJECT_STATE_HEADER) else {
            return state;
        };

        for raw_line in section.lines() {
            let line = raw_line.trim();
            if let Some(caps) = GOAL_LINE.captures(line) {
                let goal = caps[1].trim();
                if !PLACEHOLDER_VALUES.contains(&goal.to_lowercase().as_str()) {
                    state.goal = Some(goal.to_string());
                }
            } else if let Some(caps) = STACK_LINE.captures(line) {
                let stack = caps[1].trim();
                if !PLACEHOLDER_VALUES.contains(&stack.to_lowercase().as_str()) {
                    state.stack = stack.split(',').map(|s| s.trim().to_string()).collect();
                }
            } else if let Some(caps) = BLOCKED_LINE.captures(line) {
                let blocked = caps[1].trim();
                if !PLACEHOLDER_VALUES.contains(&blocked.to_lowercase().as_str()) {
                    state.blocked_by = Some(blocked.to_string());
                }
            }
        }

        state
    }

    fn extract_project_edges(content: &str) -> Vec<Edge> {
        let Some(section) = Self::extract_section(content, &GOTCHAS_HEADER) else {
            return Vec::new();
        };

        let mut edges = Vec::new();
        for raw_line in section.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("<!--") {
                continue;
            }
            if !(line.starts_with('-') || line.starts_with('*')) {
                continue;
            }

            let text = line.trim_start_matches(['-', '*', ' ']).trim();
            if text.is_empty() {
                continue;
            }

            let mut parts = GOTCHA_SPLIT.splitn(text, 2);
            let title = parts.next().unwrap_or(text).trim();
            let workaround = parts.next().map(|s| s.trim().to_string());

            if !title.is_empty() {
                edges.push(Edge::new(title, workaround));
            }
        }

        edges
    }

    fn extract_section<'a>(content: &'a str, header: &Regex) -> Option<&'a str> {
        let start = header.find(content)?;
        let body_start = start.end();
        let rest = &content[body_start..];
        let end = NEXT_HEADER.find(rest).map_or(rest.len(), |m| m.start());
        Some(&rest[..end])
    }

    fn extract_session_summaries(content: &str) -> Vec<SessionSummary> {
        let mut summaries = Vec::new();

        for line in content.lines() {
            let Some(caps) = SESSION_SUMMARY_LINE.captures(line.trim()) else {
                continue;
            };
            let date_str = &caps[1];
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .ok()
                .or_else(|| Self::parse_natural_date(date_str));

            let Some(date) = date else { continue };

            let summary = caps.get(2).map(|m| m.as_str().trim().to_string());
            let mood = caps.get(3).map(|m| m.as_str().trim().to_string());

            summaries.push(SessionSummary { date, summary, mood });
        }

        summaries
    }
}
