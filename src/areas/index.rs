//! Staging area
//!
//! The index holds the delta bundles produced by every `add` since the last
//! commit, one checksummed frame per bundle in `.cvs/index.dat`. A zero-length
//! file means nothing is staged. Committing moves the frames into the new
//! commit object and truncates the file.

use crate::artifacts::core::checksum::Checksum;
use crate::artifacts::core::persist;
use crate::artifacts::objects::delta_bundle::DeltaBundle;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::CvsError;
use anyhow::Context;
use std::path::Path;

pub const INDEX_FILE: &str = "index.dat";

#[derive(Debug)]
pub struct Index {
    /// Path to the index file (`.cvs/index.dat`)
    path: Box<Path>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> anyhow::Result<bool> {
        let metadata = std::fs::metadata(self.path())
            .with_context(|| format!("Unable to stat {}", self.path.display()))?;

        Ok(metadata.len() == 0)
    }

    /// Staged bundles, oldest first
    pub fn load(&self) -> anyhow::Result<Vec<DeltaBundle>> {
        let content = persist::read_locked(self.path())?;
        let frames = Checksum::open(&content).map_err(|error| {
            anyhow::Error::from(CvsError::patch_corruption(format!("{}: {}", INDEX_FILE, error)))
        })?;

        frames
            .iter()
            .map(|frame| DeltaBundle::deserialize(frame.as_ref()))
            .collect()
    }

    pub fn append(&self, bundle: &DeltaBundle) -> anyhow::Result<()> {
        persist::append_locked(self.path(), &bundle.sealed()?)
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        persist::truncate(self.path())
    }
}
