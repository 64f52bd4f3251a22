//! Scanner for `MEMORY:` comments embedded in source code files.
//!
//! Ported from `InlineScanner` in `original_source/src/mind/parser.py`: a
//! single `MEMORY:` comment is extracted per matching line and re-parsed
//! through [`Parser`] as if it were a standalone `MEMORY.md` line, so it
//! gets the same recognizer pipeline, confidence scoring, and entity
//! shape as anything written directly into the memory file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::entity::Entity;
use crate::parser::Parser;

struct ExtPattern {
    extension: &'static str,
    regex: Regex,
}

macro_rules! ext_pattern {
    ($ext:literal, $re:literal) => {
        ExtPattern {
            extension: $ext,
            regex: Regex::new($re).unwrap_or_else(|e| unreachable!("static pattern must compile: {e}")),
        }
    };
}

static PATTERNS: Lazy<Vec<ExtPattern>> = Lazy::new(|| {
    vec![
        ext_pattern!("py", r"#\s*MEMORY:\s*(.+)"),
        ext_pattern!("ts", r"//\s*MEMORY:\s*(.+)"),
        ext_pattern!("tsx", r"//\s*MEMORY:\s*(.+)"),
        ext_pattern!("js", r"//\s*MEMORY:\s*(.+)"),
        ext_pattern!("jsx", r"//\s*MEMORY:\s*(.+)"),
        ext_pattern!("svelte", r"<!--\s*MEMORY:\s*(.+?)\s*-->"),
        ext_pattern!("vue", r"<!--\s*MEMORY:\s*(.+?)\s*-->"),
        ext_pattern!("html", r"<!--\s*MEMORY:\s*(.+?)\s*-->"),
        ext_pattern!("css", r"/\*\s*MEMORY:\s*(.+?)\s*\*/"),
        ext_pattern!("rs", r"//\s*MEMORY:\s*(.+)"),
        ext_pattern!("go", r"//\s*MEMORY:\s*(.+)"),
    ]
});

/// Directory names skipped by [`InlineScanner::scan_directory`] by default.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".venv",
    "venv",
    "__pycache__",
    "dist",
    "build",
    ".mind",
];

fn pattern_for_extension(extension: &str) -> Option<&'static Regex> {
    PATTERNS.iter().find(|p| p.extension == extension).map(|p| &p.regex)
}

/// Scans source files for `MEMORY:` comments and parses them into entities.
#[derive(Debug, Default)]
pub struct InlineScanner {
    parser: Parser,
}

impl InlineScanner {
    /// Creates a new scanner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Scans a single file's contents for `MEMORY:` comments, returning
    /// every entity recognized in them.
    ///
    /// Returns an empty vector for extensions with no registered comment
    /// syntax, and silently skips files that cannot be read.
    #[must_use]
    pub fn scan_file(&self, path: &Path) -> Vec<Entity> {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return Vec::new();
        };
        let Some(pattern) = pattern_for_extension(extension) else {
            return Vec::new();
        };
        let Ok(content) = fs::read_to_string(path) else {
            return Vec::new();
        };

        let path_str = path.to_string_lossy();
        let mut entities = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let Some(memory_content) = caps.get(1) else {
                continue;
            };
            let memory_content = memory_content.as_str().trim();

            let result = self.parser.parse(memory_content, &path_str);
            for mut entity in result.entities {
                entity.source_line = line_num;
                entities.push(entity);
            }
        }

        entities
    }

    /// Recursively scans `directory` for `MEMORY:` comments, skipping
    /// `exclude_dirs` (or [`DEFAULT_EXCLUDED_DIRS`] if `None`).
    #[must_use]
    pub fn scan_directory(&self, directory: &Path, exclude_dirs: Option<&HashSet<String>>) -> Vec<Entity> {
        let default_excluded: HashSet<String> =
            DEFAULT_EXCLUDED_DIRS.iter().map(|s| (*s).to_string()).collect();
        let excluded = exclude_dirs.unwrap_or(&default_excluded);

        let mut entities = Vec::new();
        self.scan_directory_into(directory, excluded, &mut entities);
        entities
    }

    fn scan_directory_into(&self, directory: &Path, excluded: &HashSet<String>, out: &mut Vec<Entity>) {
        let Ok(read_dir) = fs::read_dir(directory) else {
            return;
        };

        for entry in read_dir.flatten() {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if excluded.contains(name.as_ref()) {
                continue;
            }

            if path.is_dir() {
                self.scan_directory_into(&path, excluded, out);
            } else if path.is_file() {
                out.extend(self.scan_file(&path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_scan_file_extracts_decision() {
        let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
        writeln!(file, "x = 1").unwrap();
        writeln!(file, "# MEMORY: decided to cache results because it's slow").unwrap();

        let scanner = InlineScanner::new();
        let entities = scanner.scan_file(file.path());

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].source_line, 1);
    }

    #[test]
    fn test_scan_file_unknown_extension_is_empty() {
        let mut file = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        writeln!(file, "# MEMORY: decided to use X").unwrap();

        let scanner = InlineScanner::new();
        assert!(scanner.scan_file(file.path()).is_empty());
    }

    #[test]
    fn test_scan_directory_skips_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("node_modules");
        fs::create_dir(&nested).unwrap();
        fs::write(
            nested.join("a.rs"),
            "// MEMORY: learned that this should never surface\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.rs"),
            "// MEMORY: learned that this should surface\n",
        )
        .unwrap();

        let scanner = InlineScanner::new();
        let entities = scanner.scan_directory(dir.path(), None);

        assert_eq!(entities.len(), 1);
        assert!(entities[0].content.contains("should surface"));
    }
}
