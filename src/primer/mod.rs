//! The primer scorer: ranks open issues, decisions, and sharp edges for a
//! new-session briefing.
//!
//! Line-for-line port of `PrimerScorer`/`PrimerGenerator` in
//! `original_source/src/mind/engine/primer.py`, made synchronous: the
//! original's `async def generate` awaits an I/O-bound storage
//! collaborator for each list and for access stats; this crate takes
//! already-fetched issues/decisions/edges as plain arguments and reaches
//! for access-stats through the injected [`AccessStatsProvider`], so
//! there is nothing left to await.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use regex::RegexBuilder;

use crate::config::PrimerConfig;
use crate::models::entity::DetectionPatternKind;
use crate::models::primer::{
    AccessStats, Decision, Issue, IssueSeverity, PrimerResult, Project, Session, SharpEdge,
};

/// A collaborator supplying access-frequency counts for entity ids.
///
/// Defined and consumed at this crate's boundary; the storage layer that
/// implements it lives outside the core.
pub trait AccessStatsProvider {
    /// Returns access counts for the given ids. Ids absent from the
    /// result are treated as having zero accesses.
    fn get_access_stats(&self, ids: &[String]) -> AccessStats;
}

/// An `AccessStatsProvider` that always reports zero accesses, useful for
/// callers with no access-tracking storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccessStats;

impl AccessStatsProvider for NoAccessStats {
    fn get_access_stats(&self, _ids: &[String]) -> AccessStats {
        HashMap::new()
    }
}

const SEVERITY_EMOJI_BLOCKING: &str = "\u{1f534}"; // red circle
const SEVERITY_EMOJI_MAJOR: &str = "\u{1f7e0}"; // orange circle
const SEVERITY_EMOJI_MINOR: &str = "\u{1f7e1}"; // yellow circle
const SEVERITY_EMOJI_COSMETIC: &str = "\u{26aa}"; // white circle

fn severity_base(severity: IssueSeverity) -> f32 {
    match severity {
        IssueSeverity::Blocking => 100.0,
        IssueSeverity::Major => 50.0,
        IssueSeverity::Minor => 20.0,
        IssueSeverity::Cosmetic => 5.0,
    }
}

fn severity_emoji(severity: IssueSeverity) -> &'static str {
    match severity {
        IssueSeverity::Blocking => SEVERITY_EMOJI_BLOCKING,
        IssueSeverity::Major => SEVERITY_EMOJI_MAJOR,
        IssueSeverity::Minor => SEVERITY_EMOJI_MINOR,
        IssueSeverity::Cosmetic => SEVERITY_EMOJI_COSMETIC,
    }
}

/// Scores candidate issues, decisions, and sharp edges for primer
/// relevance, against a fixed `Project`/`Session`/`now` context.
pub struct PrimerScorer<'a> {
    project: &'a Project,
    next_steps_text: String,
    context_terms: Vec<String>,
    now: DateTime<Utc>,
}

impl<'a> PrimerScorer<'a> {
    /// Creates a scorer over `project`'s current state and `last_session`
    /// (if there was a prior session), evaluated as of `now`.
    #[must_use]
    pub fn new(project: &'a Project, last_session: Option<&Session>, now: DateTime<Utc>) -> Self {
        let next_steps_text = last_session
            .map(|s| s.next_steps.join(" ").to_lowercase())
            .unwrap_or_default();

        let context_terms = Self::build_context_terms(project, last_session);

        Self {
            project,
            next_steps_text,
            context_terms,
            now,
        }
    }

    fn build_context_terms(project: &Project, last_session: Option<&Session>) -> Vec<String> {
        let mut terms = Vec::new();

        if let Some(goal) = &project.current_goal {
            terms.extend(goal.to_lowercase().split_whitespace().map(str::to_string));
        }
        terms.extend(project.stack.iter().map(|t| t.to_lowercase()));
        terms.extend(project.open_threads.iter().map(|t| t.to_lowercase()));

        if let Some(session) = last_session {
            for step in &session.next_steps {
                terms.extend(step.to_lowercase().split_whitespace().map(str::to_string));
            }
        }

        terms.retain(|t| t.chars().count() > 3);
        terms
    }

    /// Scores an issue, returning its priority and an optional hint
    /// string for the rendered briefing.
    #[must_use]
    pub fn score_issue(&self, issue: &Issue, access_count: u32) -> (f32, Option<String>) {
        let mut score = severity_base(issue.severity);

        let mentioned = self.mentioned_in_next_steps(&issue.title);
        if mentioned {
            score += 80.0;
        }

        let goal_related = self.related_to_goal(&issue.title);
        if goal_related {
            score += 60.0;
        }

        score += self.recency_score(Some(issue.updated_at), 30.0);
        score += (5.0 * access_count as f32).min(30.0);

        let hint = if issue.severity == IssueSeverity::Blocking {
            None
        } else if mentioned {
            Some("from last session".to_string())
        } else if goal_related {
            Some("goal-related".to_string())
        } else {
            None
        };

        (score, hint)
    }

    /// Scores a decision, returning its priority and an optional hint
    /// string for the rendered briefing.
    #[must_use]
    pub fn score_decision(&self, decision: &Decision, access_count: u32) -> (f32, Option<String>) {
        let mut score = 0.0;
        let mut hint = None;

        if let Some(revisit_if) = &decision.revisit_if {
            if self.condition_might_apply(revisit_if) {
                score += 100.0;
                hint = Some(format!("condition triggered: \"{}\"", truncate(revisit_if, 30)));
            }
        }

        if decision.confidence < 0.5 {
            score += 40.0;
            hint.get_or_insert_with(|| "low confidence".to_string());
        } else if decision.confidence < 0.7 {
            score += 20.0;
        }

        if self.related_to_goal(&decision.title) {
            score += 50.0;
            hint.get_or_insert_with(|| "goal-related".to_string());
        }

        score += self.recency_score(Some(decision.decided_at), 15.0);
        score += (3.0 * access_count as f32).min(20.0);

        (score, hint)
    }

    /// Scores a sharp edge, returning its priority and an optional hint
    /// string for the rendered briefing.
    #[must_use]
    pub fn score_edge(&self, edge: &SharpEdge, access_count: u32) -> (f32, Option<String>) {
        let mut score = 0.0;
        let mut hint = None;

        if self.matches_stack(edge) {
            score += 80.0;
            hint = Some("matches stack".to_string());
        }

        if self.related_to_goal(&edge.title) {
            score += 60.0;
            hint.get_or_insert_with(|| "goal-related".to_string());
        }

        if access_count > 0 {
            score += 40.0;
            hint.get_or_insert_with(|| "seen before".to_string());
        }

        if self.detection_might_apply(edge) {
            score += 50.0;
        }

        (score, hint)
    }

    fn mentioned_in_next_steps(&self, title: &str) -> bool {
        if self.next_steps_text.is_empty() {
            return false;
        }
        self.next_steps_text.contains(&title.to_lowercase())
    }

    fn related_to_goal(&self, title: &str) -> bool {
        let Some(goal) = &self.project.current_goal else {
            return false;
        };

        let title_lower = title.to_lowercase();
        let goal_lower = goal.to_lowercase();

        if goal_lower.contains(&title_lower) || title_lower.contains(&goal_lower) {
            return true;
        }

        let title_words: std::collections::HashSet<&str> = title_lower
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .collect();
        let goal_words: std::collections::HashSet<&str> = goal_lower
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .collect();

        !title_words.is_disjoint(&goal_words)
    }

    fn condition_might_apply(&self, revisit_if: &str) -> bool {
        let lower = revisit_if.to_lowercase();
        self.context_terms.iter().any(|term| lower.contains(term.as_str()))
    }

    fn matches_stack(&self, edge: &SharpEdge) -> bool {
        if self.project.stack.is_empty() {
            return false;
        }
        let edge_text = format!("{} {}", edge.title, edge.description).to_lowercase();
        self.project
            .stack
            .iter()
            .any(|tech| edge_text.contains(&tech.to_lowercase()))
    }

    fn detection_might_apply(&self, edge: &SharpEdge) -> bool {
        let context = format!(
            "{} {}",
            self.project.current_goal.as_deref().unwrap_or(""),
            self.project.stack.join(" ")
        )
        .to_lowercase();

        let pattern_hit = edge.detection_patterns.iter().any(|pattern| {
            pattern.kind == DetectionPatternKind::Context
                && RegexBuilder::new(&pattern.pattern)
                    .case_insensitive(true)
                    .build()
                    .is_ok_and(|re| re.is_match(&context))
        });
        if pattern_hit {
            return true;
        }

        edge.trigger_phrases
            .iter()
            .any(|phrase| context.contains(&phrase.to_lowercase()))
    }

    fn recency_score(&self, at: Option<DateTime<Utc>>, max_points: f32) -> f32 {
        let Some(at) = at else {
            return 0.0;
        };
        let days_old = (self.now - at).num_days().max(0) as f32;
        (max_points - days_old).max(0.0)
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_len {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Humanizes the gap between `now` and `then` as a "time ago" phrase.
#[must_use]
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    let days = diff.num_days();

    if days == 0 {
        let seconds = diff.num_seconds().max(0);
        if seconds < 3600 {
            let minutes = seconds / 60;
            return format!("{minutes} minute{} ago", if minutes == 1 { "" } else { "s" });
        }
        let hours = seconds / 3600;
        return format!("{hours} hour{} ago", if hours == 1 { "" } else { "s" });
    }
    if days == 1 {
        return "Yesterday".to_string();
    }
    if days < 7 {
        return format!("{days} days ago");
    }
    if days < 30 {
        let weeks = days / 7;
        return format!("{weeks} week{} ago", if weeks == 1 { "" } else { "s" });
    }

    then.format("%B %d, %Y").to_string()
}

/// A scored candidate, kept alongside its score and hint until selection
/// and rendering.
struct Scored<T> {
    score: f32,
    hint: Option<String>,
    item: T,
}

fn top_n<T>(mut scored: Vec<Scored<T>>, n: usize) -> Vec<Scored<T>> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(n);
    scored
}

/// Generates session primers with smart prioritization.
pub struct PrimerGenerator {
    config: PrimerConfig,
}

impl PrimerGenerator {
    /// Creates a new generator using `config`'s selection limits.
    #[must_use]
    pub const fn new(config: PrimerConfig) -> Self {
        Self { config }
    }

    /// Scores and selects the most relevant issues, decisions, and sharp
    /// edges, and renders the full briefing text.
    #[must_use]
    #[tracing::instrument(
        skip(self, project, last_session, issues, decisions, edges, access_stats, now),
        fields(candidates = issues.len() + decisions.len() + edges.len())
    )]
    pub fn generate(
        &self,
        project: &Project,
        last_session: Option<&Session>,
        issues: &[Issue],
        decisions: &[Decision],
        edges: &[SharpEdge],
        access_stats: &dyn AccessStatsProvider,
        now: DateTime<Utc>,
    ) -> PrimerResult {
        let scorer = PrimerScorer::new(project, last_session, now);

        let top_issues = self.top_issues(&scorer, issues, access_stats);
        let top_decisions = self.top_decisions(&scorer, decisions, access_stats);
        let top_edges = self.top_edges(&scorer, edges, access_stats);

        tracing::debug!(
            selected_issues = top_issues.len(),
            selected_decisions = top_decisions.len(),
            selected_edges = top_edges.len(),
            "generated primer"
        );

        let text = self.build_primer_text(project, &top_issues, &top_decisions, &top_edges, now);

        PrimerResult {
            text,
            issues: top_issues.into_iter().map(|s| s.item).collect(),
            decisions: top_decisions.into_iter().map(|s| s.item).collect(),
            edges: top_edges.into_iter().map(|s| s.item).collect(),
        }
    }

    fn top_issues(
        &self,
        scorer: &PrimerScorer<'_>,
        issues: &[Issue],
        access_stats: &dyn AccessStatsProvider,
    ) -> Vec<Scored<Issue>> {
        if issues.is_empty() {
            return Vec::new();
        }
        let ids: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
        let stats = access_stats.get_access_stats(&ids);

        let scored = issues
            .iter()
            .map(|issue| {
                let access_count = stats.get(&issue.id).copied().unwrap_or(0);
                let (score, hint) = scorer.score_issue(issue, access_count);
                Scored { score, hint, item: issue.clone() }
            })
            .collect();

        top_n(scored, self.config.max_issues)
    }

    fn top_decisions(
        &self,
        scorer: &PrimerScorer<'_>,
        decisions: &[Decision],
        access_stats: &dyn AccessStatsProvider,
    ) -> Vec<Scored<Decision>> {
        let candidates: Vec<&Decision> = decisions
            .iter()
            .filter(|d| d.revisit_if.is_some() || d.confidence < 0.7)
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let ids: Vec<String> = candidates.iter().map(|d| d.id.clone()).collect();
        let stats = access_stats.get_access_stats(&ids);

        let scored = candidates
            .iter()
            .map(|decision| {
                let access_count = stats.get(&decision.id).copied().unwrap_or(0);
                let (score, hint) = scorer.score_decision(decision, access_count);
                Scored { score, hint, item: (*decision).clone() }
            })
            .collect();

        top_n(scored, self.config.max_decisions)
    }

    fn top_edges(
        &self,
        scorer: &PrimerScorer<'_>,
        edges: &[SharpEdge],
        access_stats: &dyn AccessStatsProvider,
    ) -> Vec<Scored<SharpEdge>> {
        if edges.is_empty() {
            return Vec::new();
        }
        let ids: Vec<String> = edges.iter().map(|e| e.id.clone()).collect();
        let stats = access_stats.get_access_stats(&ids);

        let scored = edges
            .iter()
            .map(|edge| {
                let access_count = stats.get(&edge.id).copied().unwrap_or(0);
                let (score, hint) = scorer.score_edge(edge, access_count);
                Scored { score, hint, item: edge.clone() }
            })
            .collect();

        top_n(scored, self.config.max_edges)
    }

    fn build_primer_text(
        &self,
        project: &Project,
        issues: &[Scored<Issue>],
        decisions: &[Scored<Decision>],
        edges: &[Scored<SharpEdge>],
        now: DateTime<Utc>,
    ) -> String {
        let mut lines: Vec<String> = Vec::new();

        if let Some(last_session_date) = project.last_session_date {
            lines.push(format!("Last session: {}", format_time_ago(last_session_date, now)));
            if let Some(summary) = &project.last_session_summary {
                lines.push(format!("Ended with: {summary}"));
            }
            if let Some(mood) = &project.last_session_mood {
                lines.push(format!("Mood: {mood}"));
            }
            if let Some(next_step) = &project.last_session_next_step {
                lines.push(format!("Next step was: {next_step}"));
            }
            lines.push(String::new());
        }

        if let Some(goal) = &project.current_goal {
            lines.push(format!("Current goal: {goal}"));
        }
        if !project.blocked_by.is_empty() {
            lines.push(format!("Blocked by: {}", project.blocked_by.join(", ")));
        }
        if !project.open_threads.is_empty() {
            lines.push(format!("Open threads: {}", project.open_threads.join(", ")));
        }

        if !lines.is_empty() && lines.last().is_some_and(|l| !l.is_empty()) {
            lines.push(String::new());
        }

        if !issues.is_empty() {
            lines.push(format!("Open issues ({}):", issues.len()));
            for scored in issues {
                let emoji = severity_emoji(scored.item.severity);
                let mut line = format!(
                    "  {emoji} {} ({})",
                    scored.item.title, scored.item.severity
                );
                if let Some(hint) = &scored.hint {
                    line.push_str(&format!(" \u{2190} {hint}"));
                }
                lines.push(line);
            }
            lines.push(String::new());
        }

        if !decisions.is_empty() {
            lines.push(format!("Decisions to revisit ({}):", decisions.len()));
            for scored in decisions {
                let mut line = format!("  - {}", scored.item.title);
                if let Some(hint) = &scored.hint {
                    line.push_str(&format!(" \u{2190} {hint}"));
                }
                lines.push(line);
            }
            lines.push(String::new());
        }

        if !edges.is_empty() {
            lines.push("Watch out for:".to_string());
            for scored in edges {
                let mut line = format!("  \u{26a0} {}", scored.item.title);
                if let Some(hint) = &scored.hint {
                    line.push_str(&format!(" \u{2190} {hint}"));
                }
                lines.push(line);
            }
            lines.push(String::new());
        }

        if lines.is_empty() {
            lines.push("No prior context. What are we working on?".to_string());
        } else {
            lines.push("What would you like to focus on?".to_string());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::{DetectionPattern, DetectionPatternKind};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-15T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn issue(id: &str, title: &str, severity: IssueSeverity, days_old: i64) -> Issue {
        Issue {
            id: id.to_string(),
            title: title.to_string(),
            severity,
            updated_at: now() - Duration::days(days_old),
        }
    }

    #[test]
    fn test_severity_monotonicity_when_isolated() {
        let project = Project::default();
        let scorer = PrimerScorer::new(&project, None, now());

        let blocking = issue("a", "x", IssueSeverity::Blocking, 100);
        let major = issue("b", "y", IssueSeverity::Major, 100);
        let minor = issue("c", "z", IssueSeverity::Minor, 100);
        let cosmetic = issue("d", "w", IssueSeverity::Cosmetic, 100);

        let (s_blocking, _) = scorer.score_issue(&blocking, 0);
        let (s_major, _) = scorer.score_issue(&major, 0);
        let (s_minor, _) = scorer.score_issue(&minor, 0);
        let (s_cosmetic, _) = scorer.score_issue(&cosmetic, 0);

        assert!(s_blocking > s_major);
        assert!(s_major > s_minor);
        assert!(s_minor > s_cosmetic);
    }

    #[test]
    fn test_blocking_hint_always_empty() {
        let mut project = Project::default();
        project.current_goal = Some("fix auth".to_string());
        let scorer = PrimerScorer::new(&project, None, now());

        let blocker = issue("a", "fix auth flow", IssueSeverity::Blocking, 0);
        let (_, hint) = scorer.score_issue(&blocker, 5);
        assert!(hint.is_none());
    }

    #[test]
    fn test_continuity_hint_from_last_session() {
        let project = Project::default();
        let session = Session { next_steps: vec!["fix the safari callback".to_string()] };
        let scorer = PrimerScorer::new(&project, Some(&session), now());

        let issue = issue("a", "safari callback", IssueSeverity::Major, 10);
        let (score, hint) = scorer.score_issue(&issue, 0);
        assert!(score >= 80.0);
        assert_eq!(hint.as_deref(), Some("from last session"));
    }

    #[test]
    fn test_decision_excluded_without_condition_or_low_confidence() {
        let generator = PrimerGenerator::new(PrimerConfig::default());
        let project = Project::default();
        let decisions = vec![Decision {
            id: "d1".to_string(),
            title: "use postgres".to_string(),
            revisit_if: None,
            confidence: 0.9,
            decided_at: now(),
        }];

        let result = generator.generate(
            &project,
            None,
            &[],
            &decisions,
            &[],
            &NoAccessStats,
            now(),
        );
        assert!(result.decisions.is_empty());
    }

    #[test]
    fn test_decision_condition_triggered_hint() {
        let mut project = Project::default();
        project.stack = vec!["redis".to_string()];
        let scorer = PrimerScorer::new(&project, None, now());

        let decision = Decision {
            id: "d1".to_string(),
            title: "cache layer".to_string(),
            revisit_if: Some("if redis becomes unavailable in production".to_string()),
            confidence: 0.9,
            decided_at: now(),
        };

        let (score, hint) = scorer.score_decision(&decision, 0);
        assert!(score >= 100.0);
        assert!(hint.unwrap().starts_with("condition triggered:"));
    }

    #[test]
    fn test_edge_stack_match_hint() {
        let mut project = Project::default();
        project.stack = vec!["Postgres".to_string()];
        let scorer = PrimerScorer::new(&project, None, now());

        let edge = SharpEdge {
            id: "e1".to_string(),
            title: "Postgres connection pooling".to_string(),
            description: "watch the pool size".to_string(),
            detection_patterns: Vec::new(),
            trigger_phrases: Vec::new(),
        };

        let (score, hint) = scorer.score_edge(&edge, 0);
        assert!(score >= 80.0);
        assert_eq!(hint.as_deref(), Some("matches stack"));
    }

    #[test]
    fn test_edge_detection_pattern_context_match() {
        let mut project = Project::default();
        project.current_goal = Some("ship the websocket gateway".to_string());
        let scorer = PrimerScorer::new(&project, None, now());

        let edge = SharpEdge {
            id: "e1".to_string(),
            title: "connection drops".to_string(),
            description: "edge case".to_string(),
            detection_patterns: vec![DetectionPattern::new(DetectionPatternKind::Context, "websocket")],
            trigger_phrases: Vec::new(),
        };

        let (score, _) = scorer.score_edge(&edge, 0);
        assert!(score >= 50.0);
    }

    #[test]
    fn test_malformed_detection_regex_is_non_matching() {
        let project = Project::default();
        let scorer = PrimerScorer::new(&project, None, now());

        let edge = SharpEdge {
            id: "e1".to_string(),
            title: "x".to_string(),
            description: "y".to_string(),
            detection_patterns: vec![DetectionPattern::new(DetectionPatternKind::Context, "(unclosed")],
            trigger_phrases: Vec::new(),
        };

        let (score, _) = scorer.score_edge(&edge, 0);
        assert!((score).abs() < f32::EPSILON);
    }

    #[test]
    fn test_format_time_ago_buckets() {
        let base = now();
        assert_eq!(format_time_ago(base - Duration::minutes(5), base), "5 minutes ago");
        assert_eq!(format_time_ago(base - Duration::hours(2), base), "2 hours ago");
        assert_eq!(format_time_ago(base - Duration::days(1), base), "Yesterday");
        assert_eq!(format_time_ago(base - Duration::days(3), base), "3 days ago");
        assert_eq!(format_time_ago(base - Duration::days(14), base), "2 weeks ago");
    }

    #[test]
    fn test_format_time_ago_falls_back_to_full_date_at_30_days() {
        let base = now();
        let result = format_time_ago(base - Duration::days(40), base);
        assert!(result.contains("2025"));
    }

    #[test]
    fn test_no_prior_context_message() {
        let generator = PrimerGenerator::new(PrimerConfig::default());
        let project = Project::default();
        let result = generator.generate(&project, None, &[], &[], &[], &NoAccessStats, now());
        assert_eq!(result.text, "No prior context. What are we working on?");
    }

    #[test]
    fn test_selection_limits_respected() {
        let generator = PrimerGenerator::new(PrimerConfig::default());
        let project = Project::default();
        let issues: Vec<Issue> = (0..10)
            .map(|i| issue(&i.to_string(), "issue", IssueSeverity::Minor, 0))
            .collect();

        let result = generator.generate(&project, None, &issues, &[], &[], &NoAccessStats, now());
        assert_eq!(result.issues.len(), 3);
    }

    #[test]
    fn test_scenario_blocking_beats_recent_major() {
        // From the end-to-end "iss_1 blocking vs iss_2 major" scenario.
        let generator = PrimerGenerator::new(PrimerConfig::default());
        let project = Project::default();
        let iss_1 = issue("iss_1", "Safari auth callback fails", IssueSeverity::Blocking, 1);
        let iss_2 = issue("iss_2", "Same-domain approach", IssueSeverity::Major, 2);

        let result = generator.generate(
            &project,
            None,
            &[iss_2, iss_1],
            &[],
            &[],
            &NoAccessStats,
            now(),
        );

        assert_eq!(result.issues[0].id, "iss_1");
    }
}
