//! Route replay
//!
//! Moving HEAD replays delta bundles against the tracked tree. The replay is
//! planned entirely in memory first: every commit object on the route is
//! loaded, every patch applied to the content it expects, and only once the
//! whole route is known to replay cleanly are files touched. A damaged object
//! therefore aborts the command before the working tree, the mirror or the
//! graph tables change.
//!
//! Within one bundle, forward replay deletes `deleted`, writes `added` and
//! patches `changed`; backward replay deletes `added`, restores `deleted` and
//! unpatches `changed`. Bundles of one commit replay in staging order going
//! forward and in reverse order going backward.

use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::graph::path_resolver::{Direction, Route};
use crate::artifacts::objects::delta_bundle::DeltaBundle;
use crate::errors::CvsError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Type of file system action a migration performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Delete,
    Write,
}

/// Planned content per touched path; `None` means the file goes away
pub type PlannedTree = BTreeMap<PathBuf, Option<Vec<String>>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    planned: PlannedTree,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository) -> Self {
        Self {
            repository,
            planned: BTreeMap::new(),
        }
    }

    pub fn plan_route(&mut self, route: &Route) -> anyhow::Result<()> {
        for run in route.runs() {
            debug!(steps = run.len(), direction = ?run[0].direction, "planning replay run");

            for step in run {
                let bundles = self.repository.database().load_bundles(step.commit)?;

                match step.direction {
                    Direction::Forward => {
                        for bundle in &bundles {
                            self.plan_bundle(bundle, Direction::Forward)?;
                        }
                    }
                    Direction::Backward => {
                        for bundle in bundles.iter().rev() {
                            self.plan_bundle(bundle, Direction::Backward)?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    pub fn plan_bundle(&mut self, bundle: &DeltaBundle, direction: Direction) -> anyhow::Result<()> {
        let (removed, restored) = match direction {
            Direction::Forward => (bundle.deleted(), bundle.added()),
            Direction::Backward => (bundle.added(), bundle.deleted()),
        };

        for path in removed.keys() {
            self.planned.insert(path.clone(), None);
        }

        for (path, lines) in restored {
            self.planned.insert(path.clone(), Some(lines.clone()));
        }

        for (path, patch) in bundle.changed() {
            let current = self.current_lines(path)?;
            let patched = match direction {
                Direction::Forward => patch.apply_forward(&current),
                Direction::Backward => patch.apply_backward(&current),
            }
            .map_err(|error| error.context(format!("while patching {}", path.display())))?;

            self.planned.insert(path.clone(), Some(patched));
        }

        Ok(())
    }

    fn current_lines(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        match self.planned.get(path) {
            Some(Some(lines)) => Ok(lines.clone()),
            Some(None) => Err(CvsError::patch_corruption(format!(
                "changed file {} was deleted earlier in the replay",
                path.display()
            ))
            .into()),
            None => {
                let mirror = self.repository.mirror();
                if !mirror.path().join(path).is_file() {
                    return Err(CvsError::patch_corruption(format!(
                        "changed file {} is missing from the last state",
                        path.display()
                    ))
                    .into());
                }
                mirror.read_lines(path)
            }
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionType, &Path, Option<&[String]>)> {
        self.planned.iter().map(|(path, content)| match content {
            Some(lines) => (ActionType::Write, path.as_path(), Some(lines.as_slice())),
            None => (ActionType::Delete, path.as_path(), None),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.planned.is_empty()
    }

    /// Bring both the working tree and the last-state mirror to the planned content
    pub fn apply_changes(&self) -> anyhow::Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        self.apply_to(self.repository.workspace())?;
        self.apply_to(self.repository.mirror())?;

        Ok(())
    }

    /// Deletions run first so a file can take the place of an emptied directory
    pub fn apply_to(&self, workspace: &Workspace) -> anyhow::Result<()> {
        workspace.apply_migration(self)
    }
}
