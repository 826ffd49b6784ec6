//! Filesystem accessor for a tracked tree
//!
//! The same type serves the working tree (rooted at the repository root) and the
//! last-state mirror (rooted at `.cvs/last_state`). All paths taken and returned
//! are relative to the workspace root.

use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::diff::patch::split_lines;
use crate::artifacts::status::ignore::IgnoreRules;
use crate::errors::CvsError;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Direct children of `dir_path` that are not ignored, by name
    pub fn list_dir(
        &self,
        dir_path: &Path,
        ignore: &IgnoreRules,
    ) -> anyhow::Result<BTreeMap<String, EntryKind>> {
        let full_path = self.path.join(dir_path);
        if !full_path.is_dir() {
            return Ok(BTreeMap::new());
        }

        let mut entries = BTreeMap::new();
        for entry in std::fs::read_dir(&full_path)
            .with_context(|| format!("Unable to list directory {}", full_path.display()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if ignore.excludes(&dir_path.join(&name)) {
                continue;
            }

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                entries.insert(name, EntryKind::Directory);
            } else if file_type.is_file() {
                entries.insert(name, EntryKind::File);
            }
        }

        Ok(entries)
    }

    /// Every non-ignored file under `root_path` (itself included when it is a file)
    pub fn list_files(&self, root_path: &Path, ignore: &IgnoreRules) -> anyhow::Result<Vec<PathBuf>> {
        let full_path = self.path.join(root_path);
        if full_path.is_file() {
            return Ok(vec![root_path.to_path_buf()]);
        }

        WalkDir::new(&full_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || entry
                        .path()
                        .strip_prefix(self.path.as_ref())
                        .map_or(true, |relative| !ignore.excludes(relative))
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .with_context(|| format!("Path {} escapes workspace", entry.path().display()))
            })
            .collect()
    }

    /// Tracked files are line-oriented text; anything else has to be ignored
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<String> {
        let full_path = self.path.join(file_path);
        let bytes = std::fs::read(&full_path)
            .with_context(|| format!("Unable to read file {}", full_path.display()))?;

        String::from_utf8(bytes).map_err(|_| CvsError::NotText(file_path.to_path_buf()).into())
    }

    pub fn read_lines(&self, file_path: &Path) -> anyhow::Result<Vec<String>> {
        Ok(split_lines(&self.read_file(file_path)?))
    }

    /// Byte-level comparison of the same relative file in two workspaces
    pub fn same_content(&self, other: &Workspace, file_path: &Path) -> anyhow::Result<bool> {
        let ours = self.path.join(file_path);
        let theirs = other.path.join(file_path);

        let our_len = std::fs::metadata(&ours)?.len();
        let their_len = std::fs::metadata(&theirs)?.len();
        if our_len != their_len {
            return Ok(false);
        }

        Ok(std::fs::read(&ours)? == std::fs::read(&theirs)?)
    }

    /// Replace whatever sits at `file_path` by a file holding `lines`
    pub fn write_lines(&self, file_path: &Path, lines: &[String]) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_dir() {
            self.remove(file_path)?;
        }

        if let Some(parent) = path.parent() {
            self.make_directory(parent)?;
        }

        std::fs::write(&path, lines.concat())
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    // The order of applying migrations is important: deletions go first so that emptied
    // directories are pruned before a file takes their place, and the other way around.
    pub fn apply_migration(&self, migration: &Migration<'_>) -> anyhow::Result<()> {
        migration
            .actions()
            .filter(|(action, _, _)| *action == ActionType::Delete)
            .try_for_each(|(_, file_path, _)| self.remove(file_path))?;

        migration
            .actions()
            .filter_map(|(action, file_path, lines)| match action {
                ActionType::Write => lines.map(|lines| (file_path, lines)),
                ActionType::Delete => None,
            })
            .try_for_each(|(file_path, lines)| self.write_lines(file_path, lines))
    }

    /// Delete a file or a whole directory, then prune parents left empty
    pub fn remove(&self, entry_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(entry_path);
        if !path.exists() {
            return Ok(());
        }

        Self::make_writable(&path)?;

        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove directory: {:?}", entry_path))?;
        } else {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", entry_path))?;
        }

        self.prune_empty_parent_dirs(&path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory at {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // a file standing where a directory is needed is replaced
    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        let mut current = PathBuf::from(self.path.as_ref());
        let relative = dir_path.strip_prefix(self.path.as_ref()).unwrap_or(dir_path);

        for component in relative.components() {
            current.push(component);
            if current.is_file() {
                Self::make_writable(&current)?;
                std::fs::remove_file(&current)
                    .with_context(|| format!("Failed to remove file: {:?}", current))?;
            }
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))
    }

    #[cfg(unix)]
    fn make_writable(path: &Path) -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        for entry in WalkDir::new(path).into_iter().filter_map(|entry| entry.ok()) {
            let metadata = entry.metadata()?;
            let mode = metadata.permissions().mode();
            if mode & 0o200 == 0 {
                std::fs::set_permissions(entry.path(), std::fs::Permissions::from_mode(mode | 0o200))
                    .with_context(|| {
                        format!("Failed to set permissions for file: {:?}", entry.path())
                    })?;
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn make_writable(path: &Path) -> anyhow::Result<()> {
        for entry in WalkDir::new(path).into_iter().filter_map(|entry| entry.ok()) {
            let mut permissions = entry.metadata()?.permissions();
            if permissions.readonly() {
                #[allow(clippy::permissions_set_readonly_false)]
                permissions.set_readonly(false);
                std::fs::set_permissions(entry.path(), permissions)?;
            }
        }

        Ok(())
    }
}
