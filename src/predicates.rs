//! Pure comparisons between an expected value and a PR fact.

use regex::Regex;

use crate::error::ConfigError;

/// A compiled search pattern. Matching is unanchored: the pattern may hit
/// anywhere in the text unless it carries its own `^`/`$`.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(spec: &str) -> Result<Self, ConfigError> {
        Regex::new(spec)
            .map(Pattern)
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: spec.to_string(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

/// Exact, case-sensitive identity comparison.
pub fn matches_author(expected: &str, actual: &str) -> bool {
    expected == actual
}

/// Absent text never matches.
pub fn matches_pattern(text: Option<&str>, pattern: &Pattern) -> bool {
    text.is_some_and(|t| pattern.is_match(t))
}

/// Every changed path matches. A PR with no listed files does not match.
pub fn matches_all_paths(paths: &[String], pattern: &Pattern) -> bool {
    !paths.is_empty() && paths.iter().all(|p| pattern.is_match(p))
}
