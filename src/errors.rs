//! Repository error taxonomy
//!
//! Commands return `anyhow::Result` like the rest of the crate; domain failures are
//! raised as [`CvsError`] so callers can `downcast_ref` and inspect the variant.

use crate::artifacts::objects::commit_id::CommitId;
use std::path::PathBuf;

/// Failure classes surfaced to the command dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RepositoryChecking,
    Tag,
    Commit,
    Branch,
    Switching,
    PatchCorruption,
    Graph,
}

#[derive(Debug, thiserror::Error)]
pub enum CvsError {
    #[error("Repository checking error: repository is not initialized, call 'init' in an empty folder to do it")]
    NotInitialized,

    #[error("Repository checking error: repository is damaged ({0})")]
    Damaged(String),

    #[error("Repository checking error: to initialize a repository choose an empty folder")]
    DirectoryNotEmpty,

    #[error("Repository checking error: invalid ignore pattern '{0}' in CVSignore.txt")]
    InvalidIgnorePattern(String),

    #[error(
        "Repository checking error: file '{}' is not UTF-8 text, list it in CVSignore.txt to leave it untracked",
        .0.display()
    )]
    NotText(PathBuf),

    #[error("Tag error: tag '{0}' is already used, you can't give it to a new commit")]
    TagAlreadyUsed(String),

    #[error("Tag error: commit with tag '{0}' does not exist")]
    UnknownTag(String),

    #[error("Commit error: add changes before committing")]
    AddChangesFirst,

    #[error("Commit error: nothing to commit")]
    NothingToCommit,

    #[error("Commit error: your folder has uncommitted changes, commit them before switching state")]
    UncommittedChanges,

    #[error("Commit error: commit {0} already has a next one on this branch, create a branch to add")]
    BranchHasNextCommit(CommitId),

    #[error("Branch error: branch '{0}' already exists")]
    BranchAlreadyExists(String),

    #[error("Branch error: no such branch '{0}', call 'branch' to see repository's branches")]
    UnknownBranch(String),

    #[error("Branch error: invalid branch name '{0}'")]
    InvalidBranchName(String),

    #[error("Branch error: make your first commit to setup branches")]
    NoCommits,

    #[error(
        "Switching error: requested {requested} steps but only {available} are available in history"
    )]
    InsufficientHistory { requested: usize, available: usize },

    #[error("Switching error: no route from commit {from} to commit {to}")]
    NoRoute { from: CommitId, to: CommitId },

    #[error("Switching error: commit {target} is not an ancestor of HEAD ({head})")]
    NotAnAncestor { target: CommitId, head: CommitId },

    #[error("Switching error: put a tag or an amount of steps to switch")]
    MissingTarget,

    #[error("Patch corruption: {0}")]
    PatchCorruption(String),

    #[error("Graph error: unknown commit {0}")]
    UnknownCommit(CommitId),

    #[error("Graph error: commit {0} has no branch assigned")]
    UninitializedCommit(CommitId),
}

impl CvsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CvsError::NotInitialized
            | CvsError::Damaged(_)
            | CvsError::DirectoryNotEmpty
            | CvsError::InvalidIgnorePattern(_)
            | CvsError::NotText(_) => ErrorKind::RepositoryChecking,
            CvsError::TagAlreadyUsed(_) | CvsError::UnknownTag(_) => ErrorKind::Tag,
            CvsError::AddChangesFirst
            | CvsError::NothingToCommit
            | CvsError::UncommittedChanges
            | CvsError::BranchHasNextCommit(_) => ErrorKind::Commit,
            CvsError::BranchAlreadyExists(_)
            | CvsError::UnknownBranch(_)
            | CvsError::InvalidBranchName(_)
            | CvsError::NoCommits => ErrorKind::Branch,
            CvsError::InsufficientHistory { .. }
            | CvsError::NoRoute { .. }
            | CvsError::NotAnAncestor { .. }
            | CvsError::MissingTarget => ErrorKind::Switching,
            CvsError::PatchCorruption(_) => ErrorKind::PatchCorruption,
            CvsError::UnknownCommit(_) | CvsError::UninitializedCommit(_) => ErrorKind::Graph,
        }
    }

    pub fn patch_corruption(message: impl Into<String>) -> Self {
        CvsError::PatchCorruption(message.into())
    }

    pub fn damaged(message: impl Into<String>) -> Self {
        CvsError::Damaged(message.into())
    }
}

/// Returns the taxonomy class of an error raised anywhere in the crate, if it is one of ours
pub fn error_kind(error: &anyhow::Error) -> Option<ErrorKind> {
    error.downcast_ref::<CvsError>().map(CvsError::kind)
}
