//! Repository aggregate
//!
//! Owns every persisted area under the control directory and the writer that
//! commands print through. Commands are implemented as `impl Repository`
//! blocks under `commands::porcelain`.
//!
//! ```text
//! <root>/
//! ├── CVSignore.txt        optional ignore rules
//! └── .cvs/
//!     ├── objects/         one delta-bundle object per commit
//!     ├── last_state/      mirror of the tracked tree at HEAD
//!     ├── commits.dat
//!     ├── branches.dat
//!     ├── tags.dat
//!     ├── index.dat
//!     ├── head.txt
//!     └── logs.txt
//! ```

use crate::areas::database::Database;
use crate::areas::index::{INDEX_FILE, Index};
use crate::areas::journal::{JOURNAL_FILE, Journal};
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::graph::path_resolver::Route;
use crate::artifacts::status::ignore::{CONTROL_DIR, IGNORE_FILE, IgnoreRules};
use crate::artifacts::status::path_filter::PathFilter;
use crate::artifacts::status::tree_comparer::{TreeChanges, TreeComparer};
use crate::artifacts::status::working_state::WorkingState;
use crate::errors::CvsError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LAST_STATE_DIR: &str = "last_state";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    workspace: Workspace,
    mirror: Workspace,
    database: Database,
    refs: Refs,
    index: Index,
    journal: Journal,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Unable to create directory {}", path.display()))?;
        }

        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve path {}", path.display()))?;
        let control_path = path.join(CONTROL_DIR);

        Ok(Repository {
            workspace: Workspace::new(path.clone().into_boxed_path()),
            mirror: Workspace::new(control_path.join(LAST_STATE_DIR).into_boxed_path()),
            database: Database::new(control_path.clone().into_boxed_path()),
            refs: Refs::new(control_path.clone().into_boxed_path()),
            index: Index::new(control_path.join(INDEX_FILE).into_boxed_path()),
            journal: Journal::new(control_path.join(JOURNAL_FILE).into_boxed_path()),
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn control_path(&self) -> PathBuf {
        self.path.join(CONTROL_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Last-state mirror of the tracked tree at HEAD
    pub fn mirror(&self) -> &Workspace {
        &self.mirror
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn skeleton_dirs(&self) -> [PathBuf; 2] {
        [self.database.objects_path(), self.mirror.path().to_path_buf()]
    }

    fn skeleton_files(&self) -> [PathBuf; 6] {
        [
            self.refs.head_path(),
            self.index.path().to_path_buf(),
            self.journal.path().to_path_buf(),
            self.refs.branches_path(),
            self.database.commits_path(),
            self.refs.tags_path(),
        ]
    }

    /// Create the control directory with empty tables
    pub fn create_skeleton(&self) -> anyhow::Result<()> {
        for dir in self.skeleton_dirs() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        for file in self.skeleton_files() {
            std::fs::write(&file, b"")
                .with_context(|| format!("Failed to create file {}", file.display()))?;
        }

        Ok(())
    }

    pub fn check_repository(&self) -> anyhow::Result<()> {
        if !self.control_path().is_dir() {
            return Err(CvsError::NotInitialized.into());
        }

        let missing_dir = self.skeleton_dirs().into_iter().find(|dir| !dir.is_dir());
        let missing_file = self.skeleton_files().into_iter().find(|file| !file.is_file());

        match missing_dir.or(missing_file) {
            Some(missing) => {
                let name = missing.strip_prefix(self.path()).unwrap_or(&missing);
                Err(CvsError::damaged(format!("{} is missing", name.display())).into())
            }
            None => Ok(()),
        }
    }

    pub fn load_graph(&self) -> anyhow::Result<CommitGraph> {
        let commits = self.database.load_commits()?;
        let branches = self.refs.load_branches()?;
        let tags = self.refs.load_tags()?;
        let head = self.refs.read_head()?;

        if let Some(head) = head
            && !commits.contains_key(&head)
        {
            return Err(CvsError::damaged(format!("HEAD points at unknown commit {}", head)).into());
        }

        Ok(CommitGraph::new(commits, branches, tags, head))
    }

    /// Persist commit records and branch tips, moving HEAD last
    ///
    /// Tags are append-only and are written by the command that creates them.
    pub fn save_graph(&self, graph: &CommitGraph) -> anyhow::Result<()> {
        self.database.save_commits(graph.commits())?;
        self.refs.save_branches(graph.branches())?;
        self.refs.update_head(graph.head())?;

        debug!(head = ?graph.head(), commits = graph.commits().len(), "graph saved");
        Ok(())
    }

    pub fn ignore_rules(&self) -> anyhow::Result<IgnoreRules> {
        IgnoreRules::load(&self.path.join(IGNORE_FILE))
    }

    pub fn compare(&self, filter: &PathFilter) -> anyhow::Result<TreeChanges> {
        let ignore = self.ignore_rules()?;

        TreeComparer::new(&self.workspace, &self.mirror, &ignore, filter).compare()
    }

    pub fn working_state(&self) -> anyhow::Result<WorkingState> {
        let has_staged = !self.index.is_empty()?;
        let has_changes = !self.compare(&PathFilter::empty())?.is_empty();

        Ok(WorkingState::from_parts(has_staged, has_changes))
    }

    /// Moving HEAD is only allowed when nothing is staged or modified
    pub fn ensure_clean(&self) -> anyhow::Result<()> {
        if self.working_state()?.is_clean() {
            Ok(())
        } else {
            Err(CvsError::UncommittedChanges.into())
        }
    }

    /// Replay `route` against the working tree and the mirror
    ///
    /// Every object on the route is validated before any file is touched.
    pub fn migrate(&self, route: &Route) -> anyhow::Result<()> {
        let mut migration = Migration::new(self);
        migration.plan_route(route)?;
        migration.apply_changes()
    }
}
