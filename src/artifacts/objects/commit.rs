//! Commit record
//!
//! A commit remembers the branch it was created on (`origin`), its predecessor
//! (`prev`) and one outgoing edge per branch that continues from it:
//!
//! ```text
//! edges: { main -> Some(4), feature -> Some(7), hotfix -> None }
//! ```
//!
//! A `None` edge marks a branch whose tip currently sits on this commit. The
//! `active` branch selects which edge is reported as `next_on_branch`; every
//! other edge is a branch fork.
//!
//! ## Format
//!
//! ```text
//! id       (u64)
//! origin   (string)
//! active   (string)
//! prev     (optional u64)
//! edges    (u32 count, then string + optional u64 per edge)
//! ```

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::codec;
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::CvsError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    id: CommitId,
    origin: BranchName,
    active: BranchName,
    prev: Option<CommitId>,
    edges: BTreeMap<BranchName, Option<CommitId>>,
}

impl Commit {
    /// A fresh commit on `branch`, created from `prev` (none for the root)
    pub fn new(id: CommitId, branch: BranchName, prev: Option<CommitId>) -> Self {
        Commit {
            id,
            origin: branch.clone(),
            active: branch.clone(),
            prev,
            edges: BTreeMap::from([(branch, None)]),
        }
    }

    pub fn id(&self) -> CommitId {
        self.id
    }

    #[cfg(test)]
    pub fn origin(&self) -> &BranchName {
        &self.origin
    }

    /// The branch whose continuation `next_on_branch` reports
    pub fn branch(&self) -> &BranchName {
        &self.active
    }

    pub fn prev(&self) -> Option<CommitId> {
        self.prev
    }

    pub fn next_on_branch(&self) -> Option<CommitId> {
        self.edges.get(&self.active).copied().flatten()
    }

    /// Edges of every branch other than the active one
    pub fn branch_forks(&self) -> BTreeMap<&BranchName, Option<CommitId>> {
        self.edges
            .iter()
            .filter(|(name, _)| **name != self.active)
            .map(|(name, next)| (name, *next))
            .collect()
    }

    /// Every commit directly reachable through a branch edge, in branch name order
    pub fn children(&self) -> impl Iterator<Item = CommitId> + '_ {
        self.edges.values().filter_map(|next| *next)
    }

    pub fn all_branches(&self) -> anyhow::Result<BTreeSet<BranchName>> {
        if !self.edges.contains_key(&self.active) {
            return Err(CvsError::UninitializedCommit(self.id).into());
        }

        Ok(self.edges.keys().cloned().collect())
    }

    /// Next commit along `branch`; an unknown branch has no next commit
    pub fn next_commit_on(&self, branch: &BranchName) -> Option<CommitId> {
        self.edges.get(branch).copied().flatten()
    }

    pub fn has_branch(&self, branch: &BranchName) -> bool {
        self.edges.contains_key(branch)
    }

    /// Attach the child committed directly on the active branch
    pub fn set_next_on_branch(&mut self, next: CommitId) -> anyhow::Result<()> {
        match self.edges.get_mut(&self.active) {
            Some(Some(_)) => Err(CvsError::BranchHasNextCommit(self.id).into()),
            Some(slot) => {
                *slot = Some(next);
                Ok(())
            }
            None => Err(CvsError::UninitializedCommit(self.id).into()),
        }
    }

    /// Fork `name` from this commit and make it the active branch
    ///
    /// The previous branch keeps its edge, so its continuation stays reachable as a fork.
    pub fn record_new_branch(&mut self, name: BranchName) {
        self.edges.insert(name.clone(), None);
        self.active = name;
    }

    /// Make an existing edge the active one
    pub fn activate(&mut self, name: &BranchName) -> anyhow::Result<()> {
        if !self.edges.contains_key(name) {
            return Err(CvsError::UnknownBranch(name.to_string()).into());
        }
        self.active = name.clone();

        Ok(())
    }

    /// Cut `name` at this commit: its edge is emptied and it becomes the active branch
    pub fn truncate_branch(&mut self, name: &BranchName) {
        self.edges.insert(name.clone(), None);
        self.active = name.clone();
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut buffer = Vec::new();

        codec::write_commit_id(&mut buffer, self.id)?;
        codec::write_str(&mut buffer, self.origin.as_ref())?;
        codec::write_str(&mut buffer, self.active.as_ref())?;
        codec::write_optional_commit_id(&mut buffer, self.prev)?;

        codec::write_count(&mut buffer, self.edges.len())?;
        for (name, next) in &self.edges {
            codec::write_str(&mut buffer, name.as_ref())?;
            codec::write_optional_commit_id(&mut buffer, *next)?;
        }

        Ok(Bytes::from(buffer))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let id = codec::read_commit_id(&mut reader)?;
        let origin = BranchName::try_parse(codec::read_str(&mut reader)?)?;
        let active = BranchName::try_parse(codec::read_str(&mut reader)?)?;
        let prev = codec::read_optional_commit_id(&mut reader)?;

        let edge_count = codec::read_count(&mut reader)?;
        let mut edges = BTreeMap::new();
        for _ in 0..edge_count {
            let name = BranchName::try_parse(codec::read_str(&mut reader)?)?;
            let next = codec::read_optional_commit_id(&mut reader)?;
            edges.insert(name, next);
        }

        Ok(Commit {
            id,
            origin,
            active,
            prev,
            edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, error_kind};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    #[fixture]
    fn linked_commit() -> Commit {
        let mut commit = Commit::new(CommitId::new(1), branch("main"), Some(CommitId::new(0)));
        commit.set_next_on_branch(CommitId::new(2)).unwrap();
        commit
    }

    #[rstest]
    fn new_commit_sits_on_its_branch() {
        let commit = Commit::new(CommitId::new(0), branch("main"), None);

        assert_eq!(commit.branch(), &branch("main"));
        assert_eq!(commit.origin(), &branch("main"));
        assert_eq!(commit.prev(), None);
        assert_eq!(commit.next_on_branch(), None);
        assert!(commit.branch_forks().is_empty());
    }

    #[rstest]
    fn second_child_on_same_branch_is_rejected(mut linked_commit: Commit) {
        let error = linked_commit.set_next_on_branch(CommitId::new(3)).unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::Commit));
        assert_eq!(linked_commit.next_on_branch(), Some(CommitId::new(2)));
    }

    #[rstest]
    fn recording_a_branch_moves_continuation_into_forks(mut linked_commit: Commit) {
        linked_commit.record_new_branch(branch("feature"));

        assert_eq!(linked_commit.branch(), &branch("feature"));
        assert_eq!(linked_commit.next_on_branch(), None);
        assert_eq!(
            linked_commit.branch_forks().get(&branch("main")).copied(),
            Some(Some(CommitId::new(2)))
        );
        assert_eq!(linked_commit.origin(), &branch("main"));
    }

    #[rstest]
    fn next_commit_on_reads_every_edge(mut linked_commit: Commit) {
        linked_commit.record_new_branch(branch("feature"));
        linked_commit.set_next_on_branch(CommitId::new(5)).unwrap();

        assert_eq!(linked_commit.next_commit_on(&branch("main")), Some(CommitId::new(2)));
        assert_eq!(linked_commit.next_commit_on(&branch("feature")), Some(CommitId::new(5)));
        assert_eq!(linked_commit.next_commit_on(&branch("missing")), None);
        assert_eq!(
            linked_commit.children().collect::<Vec<_>>(),
            vec![CommitId::new(5), CommitId::new(2)]
        );
    }

    #[rstest]
    fn all_branches_lists_every_edge(mut linked_commit: Commit) {
        linked_commit.record_new_branch(branch("feature"));

        assert_eq!(
            linked_commit.all_branches().unwrap(),
            BTreeSet::from([branch("feature"), branch("main")])
        );
    }

    #[rstest]
    fn activating_unknown_branch_fails(mut linked_commit: Commit) {
        let error = linked_commit.activate(&branch("ghost")).unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::Branch));
        assert_eq!(linked_commit.branch(), &branch("main"));
    }

    #[rstest]
    fn truncating_severs_the_branch(mut linked_commit: Commit) {
        linked_commit.truncate_branch(&branch("main"));

        assert_eq!(linked_commit.next_on_branch(), None);
    }

    #[test]
    fn commit_without_active_edge_is_uninitialized() {
        let bytes = {
            let mut buffer = Vec::new();
            codec::write_commit_id(&mut buffer, CommitId::new(9)).unwrap();
            codec::write_str(&mut buffer, "main").unwrap();
            codec::write_str(&mut buffer, "main").unwrap();
            codec::write_optional_commit_id(&mut buffer, None).unwrap();
            codec::write_count(&mut buffer, 0).unwrap();
            buffer
        };
        let commit = Commit::deserialize(bytes.as_slice()).unwrap();

        let error = commit.all_branches().unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::Graph));
    }

    #[rstest]
    fn packed_commit_unpacks_identically(mut linked_commit: Commit) {
        linked_commit.record_new_branch(branch("feature/x"));

        let bytes = linked_commit.serialize().unwrap();

        assert_eq!(Commit::deserialize(bytes.as_ref()).unwrap(), linked_commit);
    }
}
