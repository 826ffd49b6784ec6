use crate::artifacts::core::codec;
use crate::artifacts::objects::commit_id::CommitId;
use crate::artifacts::objects::object::{Packable, Unpackable};
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// A tag bound once to a commit; one frame per tag in `tags.dat`
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Tag {
    name: String,
    commit: CommitId,
}

impl Tag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commit(&self) -> CommitId {
        self.commit
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut buffer = Vec::new();
        codec::write_str(&mut buffer, &self.name)?;
        codec::write_commit_id(&mut buffer, self.commit)?;

        Ok(Bytes::from(buffer))
    }
}

impl Unpackable for Tag {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let name = codec::read_str(&mut reader)?;
        let commit = codec::read_commit_id(&mut reader)?;

        Ok(Tag { name, commit })
    }
}
