//! Commit objects and commit records
//!
//! ## Layout
//!
//! ```text
//! .cvs/objects/<id>.dat   one frame per delta bundle staged for the commit
//! .cvs/commits.dat        one frame: commit count, then every commit record
//! ```
//!
//! Objects are written once, when their commit is created, and only read
//! afterwards. The commit table is rewritten in full on every graph mutation.

use crate::artifacts::core::checksum::Checksum;
use crate::artifacts::core::codec;
use crate::artifacts::core::persist;
use crate::artifacts::graph::commit_graph::CommitTable;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::delta_bundle::DeltaBundle;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::CvsError;
use anyhow::Context;
use bytes::BytesMut;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const OBJECTS_DIR: &str = "objects";
pub const COMMITS_FILE: &str = "commits.dat";

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> PathBuf {
        self.path.join(OBJECTS_DIR)
    }

    pub fn commits_path(&self) -> PathBuf {
        self.path.join(COMMITS_FILE)
    }

    pub fn object_path(&self, id: CommitId) -> PathBuf {
        self.objects_path().join(id.to_path())
    }

    pub fn store_bundles(&self, id: CommitId, bundles: &[DeltaBundle]) -> anyhow::Result<()> {
        let mut content = BytesMut::new();
        for bundle in bundles {
            content.extend_from_slice(&bundle.sealed()?);
        }

        let object_path = self.object_path(id);
        debug!(commit = %id, bundles = bundles.len(), "storing commit object");

        persist::write_atomically(&object_path, &content)
            .with_context(|| format!("Unable to store commit object {}", object_path.display()))
    }

    pub fn load_bundles(&self, id: CommitId) -> anyhow::Result<Vec<DeltaBundle>> {
        let object_path = self.object_path(id);
        if !object_path.is_file() {
            return Err(CvsError::patch_corruption(format!(
                "object of commit {} is missing",
                id
            ))
            .into());
        }

        let content = persist::read_locked(&object_path)?;
        let frames = Checksum::open(&content).map_err(|error| {
            anyhow::Error::from(CvsError::patch_corruption(format!(
                "object of commit {}: {}",
                id, error
            )))
        })?;

        frames
            .iter()
            .map(|frame| DeltaBundle::deserialize(frame.as_ref()))
            .collect()
    }

    pub fn load_commits(&self) -> anyhow::Result<CommitTable> {
        let commits_path = self.commits_path();
        let content = persist::read_locked(&commits_path)?;

        let frames = Checksum::open(&content).map_err(|error| {
            anyhow::Error::from(CvsError::damaged(format!("{}: {}", COMMITS_FILE, error)))
        })?;
        let Some(frame) = frames.first() else {
            return Ok(BTreeMap::new());
        };

        let mut reader = Cursor::new(frame.as_ref());
        let count = codec::read_count(&mut reader)?;
        (0..count)
            .map(|_| -> anyhow::Result<(CommitId, Commit)> {
                let commit = Commit::deserialize(&mut reader)
                    .map_err(|error| CvsError::damaged(format!("{}: {}", COMMITS_FILE, error)))?;
                Ok((commit.id(), commit))
            })
            .collect()
    }

    pub fn save_commits(&self, commits: &CommitTable) -> anyhow::Result<()> {
        let mut payload = Vec::new();
        codec::write_count(&mut payload, commits.len())?;
        for commit in commits.values() {
            payload.extend_from_slice(&commit.serialize()?);
        }

        persist::write_atomically(&self.commits_path(), &Checksum::seal(&payload))
    }
}
