//! Delta bundle
//!
//! The payload of one `add`: full content of added and deleted files plus a
//! zero-context patch per changed file. A commit object is the ordered list of
//! bundles staged before it.
//!
//! ## Format
//!
//! ```text
//! added    (u32 count, then path + lines per file)
//! deleted  (u32 count, then path + lines per file)
//! changed  (u32 count, then path + unified patch lines per file)
//! ```
//!
//! Paths are stored with `/` separators regardless of platform.

use crate::artifacts::core::codec;
use crate::artifacts::diff::patch::Patch;
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

pub type FileContents = BTreeMap<PathBuf, Vec<String>>;
pub type FilePatches = BTreeMap<PathBuf, Patch>;

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct DeltaBundle {
    added: FileContents,
    deleted: FileContents,
    changed: FilePatches,
}

impl DeltaBundle {
    pub fn added(&self) -> &FileContents {
        &self.added
    }

    pub fn deleted(&self) -> &FileContents {
        &self.deleted
    }

    pub fn changed(&self) -> &FilePatches {
        &self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.changed.is_empty()
    }

    fn write_path(writer: &mut impl Write, path: &Path) -> anyhow::Result<()> {
        let parts = path
            .components()
            .map(|component| {
                component
                    .as_os_str()
                    .to_str()
                    .with_context(|| format!("path {} is not valid UTF-8", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        codec::write_str(writer, &parts.join("/"))
    }

    fn read_path(reader: &mut impl Read) -> anyhow::Result<PathBuf> {
        Ok(codec::read_str(reader)?.split('/').collect())
    }

    fn write_contents(writer: &mut impl Write, contents: &FileContents) -> anyhow::Result<()> {
        codec::write_count(writer, contents.len())?;
        for (path, lines) in contents {
            Self::write_path(writer, path)?;
            codec::write_lines(writer, lines)?;
        }

        Ok(())
    }

    fn read_contents(reader: &mut impl Read) -> anyhow::Result<FileContents> {
        let count = codec::read_count(reader)?;
        (0..count)
            .map(|_| -> anyhow::Result<(PathBuf, Vec<String>)> {
                Ok((Self::read_path(reader)?, codec::read_lines(reader)?))
            })
            .collect()
    }
}

impl Packable for DeltaBundle {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut buffer = Vec::new();

        Self::write_contents(&mut buffer, &self.added)?;
        Self::write_contents(&mut buffer, &self.deleted)?;

        codec::write_count(&mut buffer, self.changed.len())?;
        for (path, patch) in &self.changed {
            Self::write_path(&mut buffer, path)?;
            codec::write_lines(&mut buffer, &patch.to_lines())?;
        }

        Ok(Bytes::from(buffer))
    }
}

impl Unpackable for DeltaBundle {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let added = Self::read_contents(&mut reader)?;
        let deleted = Self::read_contents(&mut reader)?;

        let count = codec::read_count(&mut reader)?;
        let mut changed = BTreeMap::new();
        for _ in 0..count {
            let path = Self::read_path(&mut reader)?;
            let patch = Patch::parse(&codec::read_lines(&mut reader)?)?;
            changed.insert(path, patch);
        }

        Ok(DeltaBundle {
            added,
            deleted,
            changed,
        })
    }
}
