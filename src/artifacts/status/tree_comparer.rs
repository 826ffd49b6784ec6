//! Working tree against last-state mirror comparison
//!
//! The comparison recurses over directories present on both sides. Entries
//! only in the working tree are added, expanded down to their files. Entries
//! only in the mirror are deleted and reported as a single path even when they
//! are directories. An entry whose kind differs on both sides is deleted and
//! then added.
//!
//! The path filter narrows additions and changes only; deletions are always
//! reported.

use crate::areas::workspace::{EntryKind, Workspace};
use crate::artifacts::status::ignore::IgnoreRules;
use crate::artifacts::status::path_filter::PathFilter;
use derive_new::new;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeChanges {
    pub added: FileSet,
    pub deleted: FileSet,
    pub changed: FileSet,
}

impl TreeChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.changed.is_empty()
    }
}

#[derive(new)]
pub struct TreeComparer<'w> {
    workspace: &'w Workspace,
    mirror: &'w Workspace,
    ignore: &'w IgnoreRules,
    filter: &'w PathFilter,
}

impl<'w> TreeComparer<'w> {
    pub fn compare(&self) -> anyhow::Result<TreeChanges> {
        let mut changes = TreeChanges::default();
        self.compare_dir(Path::new(""), &mut changes)?;

        Ok(changes)
    }

    fn compare_dir(&self, dir_path: &Path, changes: &mut TreeChanges) -> anyhow::Result<()> {
        let working = self.workspace.list_dir(dir_path, self.ignore)?;
        let mirrored = self.mirror.list_dir(dir_path, self.ignore)?;

        for (name, kind) in &mirrored {
            let path = dir_path.join(name);
            match working.get(name) {
                None => {
                    changes.deleted.insert(path);
                }
                Some(working_kind) if working_kind != kind => {
                    changes.deleted.insert(path.clone());
                    self.collect_added(&path, changes)?;
                }
                Some(EntryKind::Directory) => self.compare_dir(&path, changes)?,
                Some(EntryKind::File) => {
                    if self.filter.matches(&path)
                        && !self.workspace.same_content(self.mirror, &path)?
                    {
                        changes.changed.insert(path);
                    }
                }
            }
        }

        for name in working.keys().filter(|name| !mirrored.contains_key(*name)) {
            self.collect_added(&dir_path.join(name), changes)?;
        }

        Ok(())
    }

    fn collect_added(&self, path: &Path, changes: &mut TreeChanges) -> anyhow::Result<()> {
        changes.added.extend(
            self.workspace
                .list_files(path, self.ignore)?
                .into_iter()
                .filter(|file| self.filter.matches(file)),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Trees {
        _dir: TempDir,
        workspace: Workspace,
        mirror: Workspace,
    }

    impl Trees {
        fn write(&self, root: &Workspace, path: &str, content: &str) {
            let full = root.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, content).unwrap();
        }

        fn both(&self, path: &str, content: &str) {
            self.write(&self.workspace, path, content);
            self.write(&self.mirror, path, content);
        }

        fn compare(&self, ignore: &IgnoreRules, filter: &PathFilter) -> TreeChanges {
            TreeComparer::new(&self.workspace, &self.mirror, ignore, filter)
                .compare()
                .unwrap()
        }
    }

    #[fixture]
    fn trees() -> Trees {
        let dir = TempDir::new().unwrap();
        dir.child(".cvs/last_state").create_dir_all().unwrap();
        let workspace = Workspace::new(dir.path().into());
        let mirror = Workspace::new(dir.path().join(".cvs/last_state").into_boxed_path());

        Trees {
            _dir: dir,
            workspace,
            mirror,
        }
    }

    fn set(paths: &[&str]) -> FileSet {
        paths.iter().map(PathBuf::from).collect()
    }

    #[rstest]
    fn identical_trees_have_no_changes(trees: Trees) {
        trees.both("a.txt", "a\n");
        trees.both("dir/b.txt", "b\n");

        assert!(trees.compare(&IgnoreRules::default(), &PathFilter::empty()).is_empty());
    }

    #[rstest]
    fn reports_added_deleted_and_changed_files(trees: Trees) {
        trees.both("same.txt", "s\n");
        trees.both("edit.txt", "old\n");
        trees.write(&trees.workspace, "edit.txt", "new\n");
        trees.write(&trees.workspace, "fresh.txt", "f\n");
        trees.write(&trees.mirror, "gone.txt", "g\n");

        let changes = trees.compare(&IgnoreRules::default(), &PathFilter::empty());

        assert_eq!(changes.added, set(&["fresh.txt"]));
        assert_eq!(changes.deleted, set(&["gone.txt"]));
        assert_eq!(changes.changed, set(&["edit.txt"]));
    }

    #[rstest]
    fn new_directory_is_expanded_into_files(trees: Trees) {
        trees.write(&trees.workspace, "new/a.txt", "a");
        trees.write(&trees.workspace, "new/deeper/b.txt", "b");

        let changes = trees.compare(&IgnoreRules::default(), &PathFilter::empty());

        assert_eq!(changes.added, set(&["new/a.txt", "new/deeper/b.txt"]));
    }

    #[rstest]
    fn deleted_directory_is_a_single_entry(trees: Trees) {
        trees.write(&trees.mirror, "old/a.txt", "a");
        trees.write(&trees.mirror, "old/deeper/b.txt", "b");

        let changes = trees.compare(&IgnoreRules::default(), &PathFilter::empty());

        assert_eq!(changes.deleted, set(&["old"]));
    }

    #[rstest]
    fn kind_change_is_deletion_plus_addition(trees: Trees) {
        trees.write(&trees.mirror, "x", "file");
        trees.write(&trees.workspace, "x/inner.txt", "dir now");

        let changes = trees.compare(&IgnoreRules::default(), &PathFilter::empty());

        assert_eq!(changes.deleted, set(&["x"]));
        assert_eq!(changes.added, set(&["x/inner.txt"]));
    }

    #[rstest]
    fn ignored_names_are_skipped_at_every_level(trees: Trees) {
        trees.write(&trees.workspace, "build.log", "l");
        trees.write(&trees.workspace, "nested/trace.log", "l");
        trees.write(&trees.workspace, "nested/keep.txt", "k");
        trees.write(&trees.workspace, "CVSignore.txt", ".*\\.log");
        let ignore = IgnoreRules::parse(".*\\.log").unwrap();

        let changes = trees.compare(&ignore, &PathFilter::empty());

        assert_eq!(changes.added, set(&["nested/keep.txt"]));
    }

    #[rstest]
    fn control_names_below_the_root_are_tracked(trees: Trees) {
        trees.write(&trees.workspace, "CVSignore.txt", "");
        trees.write(&trees.workspace, "vendor/.cvs/entries", "e");
        trees.write(&trees.workspace, "docs/CVSignore.txt", "d");

        let changes = trees.compare(&IgnoreRules::default(), &PathFilter::empty());

        assert_eq!(
            changes.added,
            set(&["docs/CVSignore.txt", "vendor/.cvs/entries"])
        );
    }

    #[rstest]
    fn filter_limits_additions_and_changes_but_not_deletions(trees: Trees) {
        trees.both("docs/a.md", "a");
        trees.write(&trees.workspace, "docs/a.md", "a2");
        trees.both("src/b.rs", "b");
        trees.write(&trees.workspace, "src/b.rs", "b2");
        trees.write(&trees.workspace, "docs/new.md", "n");
        trees.write(&trees.workspace, "other.txt", "o");
        trees.write(&trees.mirror, "removed.txt", "r");
        let filter = PathFilter::new(vec![PathBuf::from("docs")]);

        let changes = trees.compare(&IgnoreRules::default(), &filter);

        assert_eq!(changes.added, set(&["docs/new.md"]));
        assert_eq!(changes.changed, set(&["docs/a.md"]));
        assert_eq!(changes.deleted, set(&["removed.txt"]));
    }
}
