//! Commit graph
//!
//! In-memory view of the persisted history: commit records, the branch table,
//! the tag table and HEAD. Commands load it, mutate it through the methods
//! below and hand it back to the repository to be saved as a whole.
//!
//! The branch table is the only authority on where a branch tip is; commit
//! records only describe how commits link to each other.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::tag::Tag;
use crate::errors::CvsError;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type CommitTable = BTreeMap<CommitId, Commit>;
pub type BranchTable = BTreeMap<BranchName, CommitId>;

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct CommitGraph {
    commits: CommitTable,
    branches: BranchTable,
    tags: Vec<Tag>,
    head: Option<CommitId>,
}

impl CommitGraph {
    pub fn commits(&self) -> &CommitTable {
        &self.commits
    }

    pub fn branches(&self) -> &BranchTable {
        &self.branches
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn head(&self) -> Option<CommitId> {
        self.head
    }

    pub fn commit_info(&self, id: CommitId) -> anyhow::Result<&Commit> {
        self.commits
            .get(&id)
            .ok_or_else(|| CvsError::UnknownCommit(id).into())
    }

    fn commit_info_mut(&mut self, id: CommitId) -> anyhow::Result<&mut Commit> {
        self.commits
            .get_mut(&id)
            .ok_or_else(|| CvsError::UnknownCommit(id).into())
    }

    pub fn head_commit_info(&self) -> anyhow::Result<Option<&Commit>> {
        self.head.map(|head| self.commit_info(head)).transpose()
    }

    /// Branch HEAD currently moves along, if there is any commit
    pub fn current_branch(&self) -> anyhow::Result<Option<BranchName>> {
        Ok(self.head_commit_info()?.map(|commit| commit.branch().clone()))
    }

    pub fn all_branches_of(&self, id: CommitId) -> anyhow::Result<BTreeSet<BranchName>> {
        self.commit_info(id)?.all_branches()
    }

    pub fn next_commit_on(
        &self,
        id: CommitId,
        branch: &BranchName,
    ) -> anyhow::Result<Option<CommitId>> {
        Ok(self.commit_info(id)?.next_commit_on(branch))
    }

    pub fn record_new_branch(&mut self, id: CommitId, name: BranchName) -> anyhow::Result<()> {
        self.commit_info_mut(id)?.record_new_branch(name);

        Ok(())
    }

    pub fn branch_tip(&self, name: &BranchName) -> anyhow::Result<CommitId> {
        self.branches
            .get(name)
            .copied()
            .ok_or_else(|| CvsError::UnknownBranch(name.to_string()).into())
    }

    pub fn find_tag(&self, name: &str) -> Option<CommitId> {
        self.tags
            .iter()
            .find(|tag| tag.name() == name)
            .map(Tag::commit)
    }

    pub fn resolve_tag(&self, name: &str) -> anyhow::Result<CommitId> {
        self.find_tag(name)
            .ok_or_else(|| CvsError::UnknownTag(name.to_string()).into())
    }

    /// Tags bound to `id`, in creation order
    pub fn tags_of(&self, id: CommitId) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter(move |tag| tag.commit() == id)
            .map(Tag::name)
    }

    pub fn next_id(&self) -> CommitId {
        self.commits
            .keys()
            .next_back()
            .map(CommitId::successor)
            .unwrap_or(CommitId::ROOT)
    }

    /// Validate that a commit with `tag` can be created on top of HEAD
    pub fn check_new_commit(&self, tag: Option<&str>) -> anyhow::Result<()> {
        if let Some(tag) = tag
            && self.find_tag(tag).is_some()
        {
            return Err(CvsError::TagAlreadyUsed(tag.to_string()).into());
        }

        if let Some(head) = self.head_commit_info()?
            && head.next_on_branch().is_some()
        {
            return Err(CvsError::BranchHasNextCommit(head.id()).into());
        }

        Ok(())
    }

    /// Create the next commit on top of HEAD, move HEAD and the branch tip to it
    ///
    /// The root commit lands on the default branch.
    pub fn add_commit(&mut self, tag: Option<String>) -> anyhow::Result<CommitId> {
        self.check_new_commit(tag.as_deref())?;

        let id = self.next_id();
        let commit = match self.head {
            Some(head) => {
                let parent = self.commit_info_mut(head)?;
                parent.set_next_on_branch(id)?;
                Commit::new(id, parent.branch().clone(), Some(head))
            }
            None => Commit::new(id, BranchName::default(), None),
        };

        self.branches.insert(commit.branch().clone(), id);
        self.commits.insert(id, commit);
        self.head = Some(id);

        if let Some(tag) = tag {
            self.tags.push(Tag::new(tag, id));
        }

        Ok(id)
    }

    /// Fork `name` from HEAD and register its tip
    pub fn create_branch(&mut self, name: BranchName) -> anyhow::Result<()> {
        let head = self.head.ok_or(CvsError::NoCommits)?;

        if self.branches.contains_key(&name) {
            return Err(CvsError::BranchAlreadyExists(name.to_string()).into());
        }

        self.record_new_branch(head, name.clone())?;
        self.branches.insert(name, head);

        Ok(())
    }

    /// Move HEAD after a reset: `branch` now ends at `target`, dropping what followed
    pub fn truncate_to(&mut self, target: CommitId, branch: &BranchName) -> anyhow::Result<()> {
        self.commit_info_mut(target)?.truncate_branch(branch);
        self.branches.insert(branch.clone(), target);
        self.head = Some(target);

        Ok(())
    }

    /// Move HEAD after a switch, keeping history intact
    ///
    /// `branch` stays active on the landing commit when it continues through it.
    pub fn move_head(&mut self, target: CommitId, branch: &BranchName) -> anyhow::Result<()> {
        let commit = self.commit_info_mut(target)?;
        if commit.has_branch(branch) {
            commit.activate(branch)?;
        }

        let landed_on = commit.branch().clone();
        self.branches.insert(landed_on, target);
        self.head = Some(target);

        Ok(())
    }

    /// Move HEAD to the tip of `branch` and make it the active branch there
    pub fn check_out(&mut self, branch: &BranchName) -> anyhow::Result<()> {
        let tip = self.branch_tip(branch)?;
        self.commit_info_mut(tip)?.activate(branch)?;
        self.head = Some(tip);

        Ok(())
    }
}
