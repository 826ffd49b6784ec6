//! Locked and atomic file writes used by the repository areas

use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use file_guard::Lock;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

/// Replace the file's content by writing a sibling temp file and renaming it over the target
pub fn write_atomically(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("Invalid file path {}", path.display()))?;
    let temp_path = dir.join(format!("tmp-{}", rand::random::<u32>()));

    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Unable to open temp file {}", temp_path.display()))?;
    let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;

    lock.deref_mut()
        .write_all(data)
        .with_context(|| format!("Unable to write temp file {}", temp_path.display()))?;
    drop(lock);

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Unable to rename temp file to {}", path.display()))?;

    Ok(())
}

pub fn append_locked(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Unable to open {} for appending", path.display()))?;
    let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;

    lock.deref_mut()
        .write_all(data)
        .with_context(|| format!("Unable to append to {}", path.display()))?;

    Ok(())
}

pub fn read_locked(path: &Path) -> anyhow::Result<Bytes> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("Unable to open {}", path.display()))?;
    let mut lock = file_guard::lock(&mut file, Lock::Shared, 0, 1)?;

    let mut content = Vec::new();
    lock.deref_mut()
        .read_to_end(&mut content)
        .with_context(|| format!("Unable to read {}", path.display()))?;

    Ok(content.into())
}

pub fn truncate(path: &Path) -> anyhow::Result<()> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Unable to truncate {}", path.display()))?;

    Ok(())
}
