//! Ignore rules
//!
//! `CVSignore.txt` holds one regular expression per line. A file or directory
//! whose name fully matches any of them is never tracked, at any depth. Blank
//! lines and lines starting with `#` are skipped.
//!
//! The control directory and the ignore file itself are only reserved at the
//! workspace root; deeper entries with those names are ordinary files.

use crate::errors::CvsError;
use anyhow::Context;
use regex::Regex;
use std::path::Path;

/// Name of the control directory at the working-tree root
pub const CONTROL_DIR: &str = ".cvs";

/// Name of the ignore file at the working-tree root
pub const IGNORE_FILE: &str = "CVSignore.txt";

#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    /// Load the rules from `path`; a missing file means nothing extra is ignored
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read ignore file {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                Regex::new(&format!("^(?:{line})$"))
                    .map_err(|_| anyhow::Error::from(CvsError::InvalidIgnorePattern(line.to_string())))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(IgnoreRules { patterns })
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }

    /// Whether the entry at `path` (relative to the workspace root) is left untracked
    pub fn excludes(&self, path: &Path) -> bool {
        path == Path::new(CONTROL_DIR)
            || path == Path::new(IGNORE_FILE)
            || path
                .file_name()
                .is_some_and(|name| self.is_ignored(&name.to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, error_kind};
    use rstest::rstest;

    #[rstest]
    #[case(".*\\.log", "build.log", true)]
    #[case(".*\\.log", "build.log.bak", false)]
    #[case("tmp", "tmp", true)]
    #[case("tmp", "tmp2", false)]
    #[case("a|b", "b", true)]
    fn patterns_must_match_the_whole_name(
        #[case] pattern: &str,
        #[case] name: &str,
        #[case] ignored: bool,
    ) {
        let rules = IgnoreRules::parse(pattern).unwrap();

        assert_eq!(rules.is_ignored(name), ignored);
    }

    #[test]
    fn control_entries_are_reserved_at_the_root_only() {
        let rules = IgnoreRules::default();

        assert!(rules.excludes(Path::new(CONTROL_DIR)));
        assert!(rules.excludes(Path::new(IGNORE_FILE)));
        assert!(!rules.excludes(Path::new("notes.txt")));
        assert!(!rules.excludes(&Path::new("vendor").join(CONTROL_DIR)));
        assert!(!rules.excludes(&Path::new("docs").join(IGNORE_FILE)));
    }

    #[test]
    fn patterns_apply_at_any_depth() {
        let rules = IgnoreRules::parse(r".*\.log").unwrap();

        assert!(rules.excludes(Path::new("build.log")));
        assert!(rules.excludes(Path::new("nested/deeper/trace.log")));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let rules = IgnoreRules::parse("# build output\n\n  target  \n").unwrap();

        assert!(rules.is_ignored("target"));
        assert!(!rules.is_ignored("# build output"));
        assert!(!rules.is_ignored(CONTROL_DIR));
    }

    #[test]
    fn invalid_pattern_is_a_repository_checking_error() {
        let error = IgnoreRules::parse("(unclosed").unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::RepositoryChecking));
        assert!(error.to_string().contains("(unclosed"));
    }
}
