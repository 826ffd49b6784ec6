use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::CvsError;
use anyhow::Context;

/// Name of the branch the root commit is created on
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(CvsError::InvalidBranchName(name).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(CvsError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    pub fn is_default_branch(&self) -> bool {
        self.0 == DEFAULT_BRANCH
    }
}

impl Default for BranchName {
    fn default() -> Self {
        BranchName(DEFAULT_BRANCH.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, error_kind};
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("main")]
    #[case("feature/login")]
    #[case("release-1.2")]
    #[case("fix_42")]
    fn accepts_valid_names(#[case] name: &str) {
        assert!(BranchName::try_parse(name.to_string()).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("a..b")]
    #[case("/leading")]
    #[case("trailing/")]
    #[case("name.lock")]
    #[case("has space")]
    #[case("star*")]
    #[case("at@{")]
    fn rejects_invalid_names_as_branch_errors(#[case] name: &str) {
        let error = BranchName::try_parse(name.to_string()).unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::Branch));
    }

    #[test]
    fn default_branch_is_main() {
        assert!(BranchName::default().is_default_branch());
        assert_eq!(BranchName::default().as_ref(), DEFAULT_BRANCH);
    }

    proptest! {
        #[test]
        fn alphanumeric_names_are_valid(name in "[a-zA-Z0-9][a-zA-Z0-9_-]{0,20}") {
            prop_assert!(BranchName::try_parse(name).is_ok());
        }

        #[test]
        fn names_with_control_characters_are_invalid(
            prefix in "[a-z]{1,5}",
            suffix in "[a-z]{0,5}",
            ch in prop::sample::select(vec![' ', '~', '^', ':', '?', '[', '\\'])
        ) {
            let name = format!("{prefix}{ch}{suffix}");
            prop_assert!(BranchName::try_parse(name).is_err());
        }
    }
}
