use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::diff::patch::Patch;
use crate::artifacts::graph::path_resolver::Direction;
use crate::artifacts::objects::delta_bundle::{DeltaBundle, FileContents, FilePatches};
use crate::artifacts::status::ignore::IgnoreRules;
use crate::artifacts::status::path_filter::PathFilter;
use crate::artifacts::status::tree_comparer::TreeChanges;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

impl Repository {
    /// Stage the differences between the working tree and the mirror
    ///
    /// With `paths`, only additions and changes under them are staged;
    /// deletions are always staged in full.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        self.check_repository()?;

        let filter = PathFilter::new(
            paths
                .iter()
                .map(|path| self.relative_to_root(Path::new(path)))
                .collect(),
        );
        let changes = self.compare(&filter)?;

        if changes.is_empty() {
            writeln!(self.writer(), "Adding finished, no changes.")?;
            return Ok(());
        }

        self.print_changes(&changes)?;

        let bundle = self.capture_bundle(&changes)?;
        self.index().append(&bundle)?;

        // the mirror follows the working tree for everything just staged
        let mut migration = Migration::new(self);
        migration.plan_bundle(&bundle, Direction::Forward)?;
        migration.apply_to(self.mirror())?;

        info!(
            added = changes.added.len(),
            deleted = changes.deleted.len(),
            changed = changes.changed.len(),
            "changes staged"
        );
        writeln!(self.writer(), "Adding finished.")?;

        Ok(())
    }

    /// Paths resolve from the caller's directory first and fall back to the root
    fn relative_to_root(&self, path: &Path) -> PathBuf {
        let from_caller = match path.is_absolute() {
            true => Some(path.to_path_buf()),
            false => std::env::current_dir()
                .and_then(|cwd| cwd.canonicalize())
                .ok()
                .map(|cwd| cwd.join(path)),
        };

        from_caller
            .and_then(|full| full.strip_prefix(self.path()).ok().map(Path::to_path_buf))
            .unwrap_or_else(|| path.to_path_buf())
    }

    /// Full content of added and deleted files plus a patch per changed file
    fn capture_bundle(&self, changes: &TreeChanges) -> anyhow::Result<DeltaBundle> {
        let added = changes
            .added
            .iter()
            .map(|path| -> anyhow::Result<(PathBuf, Vec<String>)> {
                Ok((path.clone(), self.workspace().read_lines(path)?))
            })
            .collect::<anyhow::Result<FileContents>>()?;

        // a deleted directory is recorded file by file so it can be restored
        let mut deleted = FileContents::new();
        for path in &changes.deleted {
            for file in self.mirror().list_files(path, &IgnoreRules::default())? {
                let lines = self.mirror().read_lines(&file)?;
                deleted.insert(file, lines);
            }
        }

        let changed = changes
            .changed
            .iter()
            .map(|path| -> anyhow::Result<(PathBuf, Patch)> {
                let old = self.mirror().read_lines(path)?;
                let new = self.workspace().read_lines(path)?;
                Ok((path.clone(), Patch::diff(&old, &new)))
            })
            .collect::<anyhow::Result<FilePatches>>()?;

        Ok(DeltaBundle::new(added, deleted, changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::status::working_state::WorkingState;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repository =
            Repository::new(dir.path().to_str().unwrap(), Box::new(std::io::sink())).unwrap();
        repository.init().unwrap();

        (dir, repository)
    }

    #[rstest]
    fn staging_brings_the_mirror_in_line(repository: (TempDir, Repository)) {
        let (dir, repository) = repository;
        dir.child("f.txt").write_str("a\nb\n").unwrap();
        dir.child("docs/readme.md").write_str("# docs\n").unwrap();

        repository.add(&[]).unwrap();

        assert_eq!(repository.working_state().unwrap(), WorkingState::STAGED);
        assert_eq!(
            std::fs::read_to_string(dir.child(".cvs/last_state/docs/readme.md").path()).unwrap(),
            "# docs\n"
        );
        assert_eq!(repository.index().load().unwrap().len(), 1);
    }

    #[rstest]
    fn deleted_directories_are_captured_file_by_file(repository: (TempDir, Repository)) {
        let (dir, repository) = repository;
        dir.child("docs/a.md").write_str("a\n").unwrap();
        dir.child("docs/nested/b.md").write_str("b\n").unwrap();
        repository.add(&[]).unwrap();

        std::fs::remove_dir_all(dir.child("docs").path()).unwrap();
        repository.add(&[]).unwrap();

        let bundles = repository.index().load().unwrap();
        let deleted = bundles[1].deleted().keys().cloned().collect::<Vec<_>>();
        assert_eq!(
            deleted,
            vec![PathBuf::from("docs/a.md"), PathBuf::from("docs/nested/b.md")]
        );
        assert!(!dir.child(".cvs/last_state/docs").exists());
    }

    #[rstest]
    fn filtered_add_leaves_other_files_pending(repository: (TempDir, Repository)) {
        let (dir, repository) = repository;
        dir.child("keep.txt").write_str("k\n").unwrap();
        dir.child("later.txt").write_str("l\n").unwrap();

        repository.add(&["keep.txt".to_string()]).unwrap();

        let pending = repository.compare(&PathFilter::empty()).unwrap();
        assert_eq!(
            pending.added.into_iter().collect::<Vec<_>>(),
            vec![PathBuf::from("later.txt")]
        );
    }

    #[rstest]
    fn nothing_to_stage_leaves_the_index_empty(repository: (TempDir, Repository)) {
        let (_dir, repository) = repository;

        repository.add(&[]).unwrap();

        assert!(repository.index().is_empty().unwrap());
    }
}
