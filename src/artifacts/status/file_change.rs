use crate::artifacts::status::tree_comparer::{FileSet, TreeChanges};
use colored::Colorize;

const LABEL_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    Added,
    Deleted,
    Changed,
}

impl FileChangeType {
    pub const ALL: [FileChangeType; 3] = [
        FileChangeType::Added,
        FileChangeType::Deleted,
        FileChangeType::Changed,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            FileChangeType::Added => "Added files:",
            FileChangeType::Deleted => "Deleted files:",
            FileChangeType::Changed => "Changed files:",
        }
    }

    /// The paths of `changes` that fall under this change type
    pub fn select<'c>(&self, changes: &'c TreeChanges) -> &'c FileSet {
        match self {
            FileChangeType::Added => &changes.added,
            FileChangeType::Deleted => &changes.deleted,
            FileChangeType::Changed => &changes.changed,
        }
    }
}

impl From<&FileChangeType> for &str {
    fn from(change: &FileChangeType) -> Self {
        match change {
            FileChangeType::Added => "new file:   ",
            FileChangeType::Deleted => "deleted:    ",
            FileChangeType::Changed => "modified:   ",
        }
    }
}

impl std::fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        let colored_str = match self {
            FileChangeType::Added => label.green(),
            FileChangeType::Deleted => label.red(),
            FileChangeType::Changed => label.yellow(),
        };
        write!(f, "{:>width$}{}", "", colored_str, width = LABEL_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn labels_are_aligned() {
        colored::control::set_override(false);

        assert_eq!(FileChangeType::Added.to_string(), "    new file:   ");
        assert_eq!(FileChangeType::Deleted.to_string(), "    deleted:    ");
        assert_eq!(FileChangeType::Changed.to_string(), "    modified:   ");
    }

    #[test]
    fn selects_the_matching_set() {
        let changes = TreeChanges {
            added: FileSet::from([PathBuf::from("a.txt")]),
            deleted: FileSet::new(),
            changed: FileSet::from([PathBuf::from("c.txt")]),
        };

        assert_eq!(FileChangeType::Added.select(&changes).len(), 1);
        assert!(FileChangeType::Deleted.select(&changes).is_empty());
        assert!(
            FileChangeType::Changed
                .select(&changes)
                .contains(&PathBuf::from("c.txt"))
        );
    }
}
