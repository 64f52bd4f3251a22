//! Static pattern tables for the recognizer pipeline.
//!
//! One-to-one port of `DECISION_PATTERNS`/`ISSUE_PATTERNS`/
//! `LEARNING_PATTERNS`/`RESOLVED_PATTERNS`/`BLOCKED_PATTERNS`/
//! `REASONING_PATTERNS`/`ALTERNATIVE_PATTERNS`/`FALSE_POSITIVE_PATTERNS`/
//! `KEY_PATTERNS` from `original_source/src/mind/parser.py`. Every pattern
//! here is case-insensitive; base confidences are the values used by
//! [`crate::parser::Parser::score_confidence`] before adjustment.

use once_cell::sync::Lazy;
use regex::Regex;

fn ci(pattern: &str) -> Regex {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| unreachable!("static pattern `{pattern}` must compile: {e}"))
}

/// Decision recognizer patterns, tried in order; first match wins.
pub static DECISION_PATTERNS: Lazy<Vec<(Regex, f32)>> = Lazy::new(|| {
    vec![
        (
            ci(r"\*\*decided:?\*\*\s*(.+?)(?:\s+(?:over|because|since|due\s+to|so\s+that|instead\s+of|rather\s+than)\b.*)?$"),
            0.9,
        ),
        (ci(r"decided\s+(?:to\s+)?(.+?)(?:\.|$)"), 0.5),
        (ci(r"chose\s+(.+?)\s+(?:over|because|instead|\.|$)"), 0.6),
        (ci(r"going\s+with\s+(.+?)(?:\.|$)"), 0.5),
        (
            ci(r"using\s+(.+?)\s+(?:instead|over|because|rather|\.|$)"),
            0.5,
        ),
        (ci(r"went\s+with\s+(.+?)(?:\.|$)"), 0.5),
        (ci(r"settled\s+on\s+(.+?)(?:\.|$)"), 0.5),
        (ci(r"picked\s+(.+?)\s+(?:over|because|\.|$)"), 0.5),
        (ci(r"memory:\s*decided\s+(.+)"), 0.7),
    ]
});

/// Issue recognizer patterns, tried in order; first match wins.
pub static ISSUE_PATTERNS: Lazy<Vec<(Regex, f32)>> = Lazy::new(|| {
    vec![
        (ci(r"\*\*problem:?\*\*\s*(.+)"), 0.9),
        (ci(r"\*\*issue:?\*\*\s*(.+)"), 0.9),
        (ci(r"\*\*bug:?\*\*\s*(.+)"), 0.9),
        (ci(r"problem:?\s*[-–]?\s*(.+?)(?:\.|$)"), 0.6),
        (ci(r"issue:?\s*[-–]?\s*(.+?)(?:\.|$)"), 0.6),
        (ci(r"bug:?\s*[-–]?\s*(.+?)(?:\.|$)"), 0.6),
        (
            ci(r"hit\s+(?:a\s+)?(?:problem|issue|bug)\s+(?:with\s+)?(.+?)(?:\.|$)"),
            0.5,
        ),
        (ci(r"struggling\s+with\s+(.+?)(?:\.|$)"), 0.5),
        (ci(r"stuck\s+on\s+(.+?)(?:\.|$)"), 0.5),
        (
            ci(r"(.+?)\s+(?:doesn't|does not|won't|isn't|is not)\s+work"),
            0.4,
        ),
        (ci(r"(.+?)\s+(?:broken|failing|failed)"), 0.4),
        (ci(r"memory:\s*(?:problem|issue)\s+(.+)"), 0.7),
    ]
});

/// Learning recognizer patterns, tried in order; first match wins.
pub static LEARNING_PATTERNS: Lazy<Vec<(Regex, f32)>> = Lazy::new(|| {
    vec![
        (ci(r"\*\*learned:?\*\*\s*(.+)"), 0.9),
        (ci(r"\*\*til:?\*\*\s*(.+)"), 0.9),
        (ci(r"\*\*gotcha:?\*\*\s*(.+)"), 0.9),
        (ci(r"learned\s+(?:that\s+)?(.+?)(?:\.|$)"), 0.5),
        (ci(r"discovered\s+(?:that\s+)?(.+?)(?:\.|$)"), 0.5),
        (ci(r"realized\s+(?:that\s+)?(.+?)(?:\.|$)"), 0.5),
        (ci(r"turns\s+out\s+(?:that\s+)?(.+?)(?:\.|$)"), 0.5),
        (ci(r"found\s+out\s+(?:that\s+)?(.+?)(?:\.|$)"), 0.5),
        (ci(r"til:?\s*(.+?)(?:\.|$)"), 0.6),
        (ci(r"gotcha:?\s*(.+?)(?:\.|$)"), 0.6),
        (ci(r"memory:\s*(?:learned|til)\s+(.+)"), 0.7),
    ]
});

/// Patterns that mark an issue line as resolved; checked before
/// [`BLOCKED_PATTERNS`].
pub static RESOLVED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        ci(r"\*\*fixed:?\*\*"),
        ci(r"fixed:?\s"),
        ci(r"resolved:?\s"),
        ci(r"solved:?\s"),
        ci(r"\[x\]"),
    ]
});

/// Patterns that mark an issue line as blocked.
pub static BLOCKED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        ci(r"blocked\s+(?:by|on)"),
        ci(r"waiting\s+(?:for|on)"),
        ci(r"need(?:s)?\s+(?:to|more)"),
    ]
});

/// Patterns extracting the reasoning span from an entity line; the first
/// match wins.
pub static REASONING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        ci(r"\bbecause\s+(.+?)(?:\.|$)"),
        ci(r"\bsince\s+(.+?)(?:\.|$)"),
        ci(r"\bso\s+(?:that\s+)?(.+?)(?:\.|$)"),
        ci(r"\bdue\s+to\s+(.+?)(?:\.|$)"),
        ci(r"\breason:?\s*(.+?)(?:\.|$)"),
    ]
});

/// Patterns extracting alternative spans; every match is collected.
pub static ALTERNATIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        ci(r"\bover\s+(.+?)(?:\s+because|\.|$)"),
        ci(r"\binstead\s+of\s+(.+?)(?:\.|$)"),
        ci(r"\brather\s+than\s+(.+?)(?:\.|$)"),
    ]
});

/// Lines that, despite matching a recognizer pattern, must never yield a
/// decision entity (hedged or negated language).
pub static FALSE_POSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        ci(r"i\s+decided\s+not\s+to"),
        ci(r"haven't\s+decided"),
        ci(r"should\s+we\s+decide"),
        ci(r"if\s+we\s+decide"),
        ci(r"might\s+decide"),
        ci(r"need\s+to\s+decide"),
    ]
});

/// Patterns marking a line (after trim) as a key/important item that
/// never fades with age.
pub static KEY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        ci(r"^key:\s*"),
        ci(r"^\*\*key:?\*\*\s*"),
        ci(r"^important:\s*"),
        ci(r"^\*\*important:?\*\*\s*"),
    ]
});
