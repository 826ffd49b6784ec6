//! HEAD, branch table and tag table
//!
//! ## Layout
//!
//! ```text
//! .cvs/head.txt       current commit id as text, empty before the first commit
//! .cvs/branches.dat   one frame: branch count, then (name, tip) per branch
//! .cvs/tags.dat       one frame per tag, appended as tags are created
//! ```
//!
//! HEAD and the branch table are replaced atomically; tags are only ever
//! appended under an exclusive lock.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::checksum::Checksum;
use crate::artifacts::core::codec;
use crate::artifacts::core::persist;
use crate::artifacts::graph::commit_graph::BranchTable;
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::tag::Tag;
use crate::errors::CvsError;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const HEAD_FILE: &str = "head.txt";
pub const BRANCHES_FILE: &str = "branches.dat";
pub const TAGS_FILE: &str = "tags.dat";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the control directory (`.cvs`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_FILE)
    }

    pub fn branches_path(&self) -> PathBuf {
        self.path.join(BRANCHES_FILE)
    }

    pub fn tags_path(&self) -> PathBuf {
        self.path.join(TAGS_FILE)
    }

    pub fn read_head(&self) -> anyhow::Result<Option<CommitId>> {
        let content = persist::read_locked(&self.head_path())?;
        let content = String::from_utf8_lossy(&content);
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        CommitId::try_parse(content)
            .map(Some)
            .map_err(|_| CvsError::damaged(format!("{} holds '{}'", HEAD_FILE, content)).into())
    }

    pub fn update_head(&self, head: Option<CommitId>) -> anyhow::Result<()> {
        let content = head.map(|id| id.to_string()).unwrap_or_default();

        persist::write_atomically(&self.head_path(), content.as_bytes())
    }

    pub fn load_branches(&self) -> anyhow::Result<BranchTable> {
        let content = persist::read_locked(&self.branches_path())?;
        let frames = Checksum::open(&content).map_err(|error| {
            anyhow::Error::from(CvsError::damaged(format!("{}: {}", BRANCHES_FILE, error)))
        })?;
        let Some(frame) = frames.first() else {
            return Ok(BTreeMap::new());
        };

        let mut reader = Cursor::new(frame.as_ref());
        let count = codec::read_count(&mut reader)?;
        (0..count)
            .map(|_| -> anyhow::Result<(BranchName, CommitId)> {
                let name = BranchName::try_parse(codec::read_str(&mut reader)?)?;
                let tip = codec::read_commit_id(&mut reader)?;
                Ok((name, tip))
            })
            .collect::<anyhow::Result<_>>()
            .map_err(|error| CvsError::damaged(format!("{}: {}", BRANCHES_FILE, error)).into())
    }

    pub fn save_branches(&self, branches: &BranchTable) -> anyhow::Result<()> {
        let mut payload = Vec::new();
        codec::write_count(&mut payload, branches.len())?;
        for (name, tip) in branches {
            codec::write_str(&mut payload, name.as_ref())?;
            codec::write_commit_id(&mut payload, *tip)?;
        }

        persist::write_atomically(&self.branches_path(), &Checksum::seal(&payload))
    }

    pub fn load_tags(&self) -> anyhow::Result<Vec<Tag>> {
        let content = persist::read_locked(&self.tags_path())?;
        let frames = Checksum::open(&content).map_err(|error| {
            anyhow::Error::from(CvsError::damaged(format!("{}: {}", TAGS_FILE, error)))
        })?;

        frames
            .iter()
            .map(|frame| {
                Tag::deserialize(frame.as_ref()).map_err(|error| {
                    anyhow::Error::from(CvsError::damaged(format!("{}: {}", TAGS_FILE, error)))
                })
            })
            .collect()
    }

    pub fn append_tag(&self, tag: &Tag) -> anyhow::Result<()> {
        persist::append_locked(&self.tags_path(), &tag.sealed()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, error_kind};
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn refs() -> (TempDir, Refs) {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().into());
        for file in [HEAD_FILE, BRANCHES_FILE, TAGS_FILE] {
            std::fs::write(dir.path().join(file), b"").unwrap();
        }

        (dir, refs)
    }

    #[rstest]
    fn head_is_empty_before_the_first_commit(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;

        assert_eq!(refs.read_head().unwrap(), None);

        refs.update_head(Some(CommitId::new(4))).unwrap();
        assert_eq!(refs.read_head().unwrap(), Some(CommitId::new(4)));
        assert_eq!(std::fs::read_to_string(refs.head_path()).unwrap(), "4");
    }

    #[rstest]
    fn garbage_in_head_is_damage(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        std::fs::write(refs.head_path(), "not-a-number").unwrap();

        let error = refs.read_head().unwrap_err();

        assert_eq!(error_kind(&error), Some(ErrorKind::RepositoryChecking));
    }

    #[rstest]
    fn branch_table_is_replaced_in_full(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        let feature = BranchName::try_parse("feature".to_string()).unwrap();
        let branches = BTreeMap::from([
            (BranchName::default(), CommitId::new(2)),
            (feature.clone(), CommitId::new(5)),
        ]);

        refs.save_branches(&branches).unwrap();
        assert_eq!(refs.load_branches().unwrap(), branches);

        refs.save_branches(&BTreeMap::from([(feature, CommitId::new(6))]))
            .unwrap();
        assert_eq!(refs.load_branches().unwrap().len(), 1);
    }

    #[rstest]
    fn tags_accumulate_in_creation_order(refs: (TempDir, Refs)) {
        let (_dir, refs) = refs;
        refs.append_tag(&Tag::new("v1".to_string(), CommitId::ROOT))
            .unwrap();
        refs.append_tag(&Tag::new("v2".to_string(), CommitId::new(1)))
            .unwrap();

        let names = refs
            .load_tags()
            .unwrap()
            .iter()
            .map(|tag| tag.name().to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["v1", "v2"]);
    }
}
