//! Commit identifier
//!
//! Commit ids are issued sequentially, starting at 0 for the root commit. An id
//! names both the commit record in `commits.dat` and its payload file
//! `objects/<id>.dat`.

use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct CommitId(u64);

impl CommitId {
    pub const ROOT: CommitId = CommitId(0);

    pub fn new(id: u64) -> Self {
        CommitId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id that follows this one in issue order
    pub fn successor(&self) -> Self {
        CommitId(self.0 + 1)
    }

    /// Payload file name relative to the objects directory
    pub fn to_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.dat", self.0))
    }

    pub fn try_parse(id: &str) -> anyhow::Result<Self> {
        let id = id.trim();

        id.parse::<u64>()
            .map(CommitId)
            .with_context(|| format!("invalid commit id '{id}'"))
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
