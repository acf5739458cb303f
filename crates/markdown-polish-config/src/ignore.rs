use glob::{MatchOptions, Pattern};
use relative_path::RelativePath;

use crate::SettingsError;

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: Pattern,
    negated: bool,
}

/// Compiled ignore patterns for workspace-relative paths.
///
/// One glob pattern per line; blank lines and `#` comments are skipped, a
/// leading `!` re-includes paths a previous pattern ignored. Rules are
/// evaluated top to bottom and the last matching rule wins, so negations
/// belong after the patterns they carve exceptions out of.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    rules: Vec<IgnoreRule>,
}

impl IgnoreSet {
    pub fn parse(patterns: &str) -> Result<Self, SettingsError> {
        let mut rules = Vec::new();

        for line in patterns.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (negated, source) = match line.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, line),
            };

            let pattern =
                Pattern::new(source).map_err(|source_err| SettingsError::InvalidIgnorePattern {
                    pattern: line.to_owned(),
                    source: source_err,
                })?;

            rules.push(IgnoreRule { pattern, negated });
        }

        Ok(Self { rules })
    }

    /// Whether a workspace-relative path is excluded from formatting.
    pub fn is_ignored(&self, path: &RelativePath) -> bool {
        let options = MatchOptions {
            // `*` must not cross directory separators, gitignore-style.
            require_literal_separator: true,
            ..MatchOptions::default()
        };

        let mut ignored = false;
        for rule in &self.rules {
            if rule.pattern.matches_with(path.as_str(), options) {
                ignored = !rule.negated;
            }
        }

        ignored
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ignored(patterns: &str, path: &str) -> bool {
        IgnoreSet::parse(patterns)
            .unwrap()
            .is_ignored(RelativePath::new(path))
    }

    #[rstest]
    #[case("", "config/test.md", false)]
    #[case("!config/*", "config/test.md", false)]
    #[case("config/*", "config/test.md", true)]
    fn original_pattern_vectors(#[case] patterns: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(ignored(patterns, path), expected);
    }

    #[test]
    fn last_matching_rule_wins() {
        let patterns = "drafts/*\n!drafts/keep.md";

        assert!(ignored(patterns, "drafts/scratch.md"));
        assert!(!ignored(patterns, "drafts/keep.md"));
    }

    #[test]
    fn star_does_not_cross_directories() {
        assert!(ignored("config/*", "config/test.md"));
        assert!(!ignored("config/*", "config/nested/test.md"));
        assert!(ignored("config/**", "config/nested/test.md"));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let patterns = "# generated notes\n\narchive/*\n";

        assert!(ignored(patterns, "archive/old.md"));
        assert!(!ignored(patterns, "notes/new.md"));
    }

    #[test]
    fn negation_without_prior_match_means_not_ignored() {
        assert!(!ignored("!config/*", "config/test.md"));
        assert!(!ignored("!config/*", "elsewhere/test.md"));
    }

    #[test]
    fn invalid_pattern_is_reported_with_its_source_line() {
        let error = IgnoreSet::parse("notes/[").unwrap_err();

        assert!(matches!(
            error,
            SettingsError::InvalidIgnorePattern { ref pattern, .. } if pattern == "notes/["
        ));
    }

    #[test]
    fn empty_set_ignores_nothing() {
        let set = IgnoreSet::parse("").unwrap();

        assert!(set.is_empty());
        assert!(!set.is_ignored(RelativePath::new("any/path.md")));
    }
}
